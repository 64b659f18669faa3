// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Rank: z-ordered rank buckets.
//!
//! Strata Rank is the child store of a retained scene graph.
//!
//! - Keys are grouped into buckets by a signed rank (a z-index).
//! - Buckets are ordered by rank and walked in either [`Order`]:
//!   ascending for painting back-to-front, descending for hit testing front-to-back.
//! - Buckets are created on demand and are never removed once created, even when emptied.
//!
//! It does not know anything about nodes, geometry, or events.
//! Higher layers (like `strata_scene`) store their node ids here and decide what a visit means.
//!
//! # Example
//!
//! ```rust
//! use core::ops::ControlFlow;
//! use strata_rank::{Order, RankedIndex};
//!
//! let mut children: RankedIndex<u32> = RankedIndex::new();
//! children.insert(1, 100);
//! children.insert(2, 200);
//!
//! let painted: Vec<_> = children.iter(Order::Ascending).copied().collect();
//! assert_eq!(painted, [100, 200]);
//!
//! // Hit-test order stops at the first match.
//! let mut first = None;
//! let _ = children.for_each(Order::Descending, |k| {
//!     first = Some(*k);
//!     ControlFlow::Break(())
//! });
//! assert_eq!(first, Some(200));
//! ```
//!
//! ## Mutation during traversal
//!
//! [`RankedIndex::for_each`] borrows the index, so it cannot be mutated mid-walk.
//! Callers that need to mutate while walking step with [`RankedIndex::next_bucket`]
//! and copy each bucket's members before visiting them.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod ranked;
pub mod types;

pub use ranked::{Bucket, Buckets, RankedIndex, Ranks};
pub use types::Order;
