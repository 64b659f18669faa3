// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `RankedIndex` and its rank buckets.

use alloc::collections::BTreeMap;
use alloc::collections::btree_map;
use alloc::vec::Vec;
use core::ops::{Bound, ControlFlow};

use crate::types::Order;

/// The set of keys that share one rank.
///
/// Members keep insertion order. A key appears at most once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket<K> {
    rank: i32,
    members: Vec<K>,
}

impl<K: Copy + Eq> Bucket<K> {
    fn new(rank: i32) -> Self {
        Self {
            rank,
            members: Vec::new(),
        }
    }

    /// The rank shared by every member of this bucket.
    #[inline]
    pub fn rank(&self) -> i32 {
        self.rank
    }

    /// Members in insertion order.
    #[inline]
    pub fn members(&self) -> &[K] {
        &self.members
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the bucket holds no members. Empty buckets are kept.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True if `key` is a member.
    pub fn contains(&self, key: &K) -> bool {
        self.members.contains(key)
    }

    /// Insert `key`. Returns `false` if an equal key was already present, in which
    /// case the existing entry is overwritten in place.
    pub fn insert(&mut self, key: K) -> bool {
        if let Some(slot) = self.members.iter_mut().find(|k| **k == key) {
            *slot = key;
            false
        } else {
            self.members.push(key);
            true
        }
    }

    /// Remove `key`. Returns `false` if it was not a member.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.members.iter().position(|k| k == key) {
            Some(pos) => {
                self.members.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop every member, keeping the bucket itself.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}

/// An ordered collection of rank buckets keyed by a signed z-order.
///
/// Buckets are created on demand and never removed, even when they become empty.
/// Re-adding a key at a previously used rank therefore reuses the same bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedIndex<K> {
    buckets: BTreeMap<i32, Bucket<K>>,
}

impl<K> Default for RankedIndex<K> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }
}

impl<K: Copy + Eq> RankedIndex<K> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the bucket for `rank`, creating it if absent.
    pub fn get_or_create(&mut self, rank: i32) -> &mut Bucket<K> {
        self.buckets
            .entry(rank)
            .or_insert_with(|| Bucket::new(rank))
    }

    /// The bucket for `rank`, if it was ever created.
    pub fn bucket(&self, rank: i32) -> Option<&Bucket<K>> {
        self.buckets.get(&rank)
    }

    /// Insert `key` into the bucket for `rank`.
    ///
    /// Returns `false` when the key was already in that bucket (the entry is overwritten).
    pub fn insert(&mut self, rank: i32, key: K) -> bool {
        self.get_or_create(rank).insert(key)
    }

    /// Remove `key` from the bucket for `rank`.
    ///
    /// A missing bucket or a missing key is not an error; both return `false`.
    pub fn remove(&mut self, rank: i32, key: &K) -> bool {
        self.buckets
            .get_mut(&rank)
            .is_some_and(|bucket| bucket.remove(key))
    }

    /// Move `key` from rank `from` to rank `to` as one step.
    ///
    /// The key ends up in exactly one bucket whether or not it was found under `from`.
    /// Returns whether it was found under `from`.
    pub fn move_key(&mut self, key: K, from: i32, to: i32) -> bool {
        let found = self.remove(from, &key);
        self.insert(to, key);
        found
    }

    /// True if `key` is a member of any bucket.
    pub fn contains(&self, key: &K) -> bool {
        self.buckets.values().any(|b| b.contains(key))
    }

    /// The rank of the bucket holding `key`.
    pub fn rank_of(&self, key: &K) -> Option<i32> {
        self.buckets
            .values()
            .find(|b| b.contains(key))
            .map(Bucket::rank)
    }

    /// Empty every bucket. The buckets themselves persist.
    pub fn clear_members(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
    }

    /// Total number of keys across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Bucket::len).sum()
    }

    /// True if no bucket holds a key.
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Bucket::is_empty)
    }

    /// Number of buckets ever created, empty ones included.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Ranks of all buckets in the given order.
    pub fn ranks(&self, order: Order) -> Ranks<'_, K> {
        Ranks {
            inner: self.buckets.keys(),
            order,
        }
    }

    /// All buckets in the given order.
    pub fn buckets(&self, order: Order) -> Buckets<'_, K> {
        Buckets {
            inner: self.buckets.values(),
            order,
        }
    }

    /// All keys, bucket by bucket, in the given order.
    pub fn iter(&self, order: Order) -> impl Iterator<Item = &K> + '_ {
        self.buckets(order).flat_map(|b| b.members.iter())
    }

    /// The first bucket strictly past `after` in `order`, or the first bucket overall
    /// when `after` is `None`.
    ///
    /// This is a cursor: callers that mutate the index between steps still make progress
    /// because the position is a rank, not a borrowed iterator.
    pub fn next_bucket(&self, after: Option<i32>, order: Order) -> Option<&Bucket<K>> {
        match (order, after) {
            (Order::Ascending, None) => self.buckets.values().next(),
            (Order::Ascending, Some(rank)) => self
                .buckets
                .range((Bound::Excluded(rank), Bound::Unbounded))
                .next()
                .map(|(_, b)| b),
            (Order::Descending, None) => self.buckets.values().next_back(),
            (Order::Descending, Some(rank)) => {
                self.buckets.range(..rank).next_back().map(|(_, b)| b)
            }
        }
    }

    /// Visit every key in `order` until `f` breaks.
    ///
    /// Returns [`ControlFlow::Break`] if the walk stopped early.
    pub fn for_each(
        &self,
        order: Order,
        mut f: impl FnMut(&K) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        for bucket in self.buckets(order) {
            for key in &bucket.members {
                f(key)?;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Iterator over bucket ranks, see [`RankedIndex::ranks`].
#[derive(Clone, Debug)]
pub struct Ranks<'a, K> {
    inner: btree_map::Keys<'a, i32, Bucket<K>>,
    order: Order,
}

impl<K> Iterator for Ranks<'_, K> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        match self.order {
            Order::Ascending => self.inner.next().copied(),
            Order::Descending => self.inner.next_back().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over buckets, see [`RankedIndex::buckets`].
#[derive(Clone, Debug)]
pub struct Buckets<'a, K> {
    inner: btree_map::Values<'a, i32, Bucket<K>>,
    order: Order,
}

impl<'a, K> Iterator for Buckets<'a, K> {
    type Item = &'a Bucket<K>;

    fn next(&mut self) -> Option<&'a Bucket<K>> {
        match self.order {
            Order::Ascending => self.inner.next(),
            Order::Descending => self.inner.next_back(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn collect(idx: &RankedIndex<u32>, order: Order) -> Vec<u32> {
        idx.iter(order).copied().collect()
    }

    #[test]
    fn ascending_and_descending_walks() {
        let mut idx = RankedIndex::new();
        idx.insert(2, 20);
        idx.insert(-1, 10);
        idx.insert(7, 70);
        assert_eq!(collect(&idx, Order::Ascending), vec![10, 20, 70]);
        assert_eq!(collect(&idx, Order::Descending), vec![70, 20, 10]);
        assert_eq!(
            idx.ranks(Order::Descending).collect::<Vec<_>>(),
            vec![7, 2, -1]
        );
    }

    #[test]
    fn for_each_stops_after_break() {
        let mut idx = RankedIndex::new();
        for k in 0..6_u32 {
            idx.insert(k as i32, k);
        }
        let mut calls = 0;
        let flow = idx.for_each(Order::Ascending, |k| {
            calls += 1;
            if *k == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(calls, 3, "exactly k callbacks before the break");
    }

    #[test]
    fn emptied_bucket_persists_and_is_reused() {
        let mut idx = RankedIndex::new();
        idx.insert(3, 1_u32);
        assert!(idx.remove(3, &1));
        assert!(idx.is_empty());
        assert_eq!(idx.bucket_count(), 1);
        assert!(idx.bucket(3).is_some_and(Bucket::is_empty));

        idx.insert(3, 2);
        assert_eq!(idx.bucket_count(), 1, "rank 3 must reuse its bucket");
        assert_eq!(idx.bucket(3).map(Bucket::members), Some(&[2][..]));
    }

    #[test]
    fn duplicate_insert_overwrites() {
        let mut idx = RankedIndex::new();
        assert!(idx.insert(0, 5_u32));
        assert!(!idx.insert(0, 5));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn remove_tolerates_missing_bucket_and_key() {
        let mut idx: RankedIndex<u32> = RankedIndex::new();
        assert!(!idx.remove(9, &1));
        idx.insert(0, 1);
        assert!(!idx.remove(0, &2));
        assert_eq!(idx.bucket_count(), 1, "remove never creates buckets");
    }

    #[test]
    fn move_key_keeps_exactly_one_copy() {
        let mut idx = RankedIndex::new();
        idx.insert(1, 1_u32);
        idx.insert(2, 2);
        assert!(idx.move_key(1, 1, 10));
        assert_eq!(collect(&idx, Order::Ascending), vec![2, 1]);
        assert_eq!(idx.rank_of(&1), Some(10));

        // A key missing from its claimed rank still lands once in the target.
        assert!(!idx.move_key(3, 99, 2));
        assert_eq!(idx.len(), 3);
        assert!(idx.bucket(99).is_none());
    }

    #[test]
    fn clear_members_keeps_buckets() {
        let mut idx = RankedIndex::new();
        idx.insert(1, 1_u32);
        idx.insert(5, 2);
        idx.clear_members();
        assert!(idx.is_empty());
        assert_eq!(idx.bucket_count(), 2);
    }

    #[test]
    fn cursor_sees_buckets_created_mid_walk() {
        let mut idx = RankedIndex::new();
        idx.insert(0, 0_u32);
        idx.insert(10, 10);

        let mut seen = Vec::new();
        let mut cursor = None;
        while let Some(bucket) = idx.next_bucket(cursor, Order::Ascending) {
            let rank = bucket.rank();
            seen.push(rank);
            cursor = Some(rank);
            if rank == 0 {
                idx.insert(5, 5);
            }
        }
        assert_eq!(seen, vec![0, 5, 10]);

        let mut cursor = None;
        let mut down = Vec::new();
        while let Some(bucket) = idx.next_bucket(cursor, Order::Descending) {
            down.push(bucket.rank());
            cursor = Some(bucket.rank());
        }
        assert_eq!(down, vec![10, 5, 0]);
    }
}
