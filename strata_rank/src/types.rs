// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traversal direction shared by every ranked walk.

/// Direction of a ranked traversal.
///
/// Painting walks back-to-front ([`Order::Ascending`]); hit testing walks
/// front-to-back ([`Order::Descending`]) so the visually topmost node is asked first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Lowest rank first (painter's order).
    #[default]
    Ascending,
    /// Highest rank first (hit-test order).
    Descending,
}

impl Order {
    /// Map a `reverse` flag onto an order: `false` is ascending, `true` is descending.
    #[inline]
    pub const fn from_reverse(reverse: bool) -> Self {
        if reverse {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// The opposite direction.
    #[inline]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// True for [`Order::Descending`].
    #[inline]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::Descending)
    }
}
