// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, creation options, and pointer events.

use alloc::string::String;
use kurbo::{Point, Rect};

use crate::style::Style;

/// Identifier for a node in the scene.
///
/// This is a small, copyable handle that stays stable for the life of the node but becomes
/// invalid when the node is destroyed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On [`Scene::destroy`](crate::Scene::destroy), the slot is freed; any existing `NodeId`
///   that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Stale `NodeId`s never alias a different live node because the generation must match.
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (participates in repaint and hit testing).
        const VISIBLE  = 0b0000_0001;
        /// Node is pickable (a leaf without this flag never matches a hit test).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Degenerate bounds of a container with no content.
///
/// The rectangle is inverted (min > max) so that a union with any real bounds yields
/// those bounds unchanged.
pub const EMPTY_BOUNDS: Rect = Rect::new(180.0, 90.0, -180.0, -90.0);

/// Initial state for a newly created node.
#[derive(Debug, Default)]
pub struct NodeDesc {
    /// Rank among siblings. Higher is drawn on top and hit first.
    pub z_index: i32,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
    /// Style handed to the node's render step.
    pub style: Style,
    /// Optional human-readable label, used in logs.
    pub name: Option<String>,
}

impl NodeDesc {
    /// Options with the given z-index and defaults elsewhere.
    pub fn z(z_index: i32) -> Self {
        Self {
            z_index,
            ..Default::default()
        }
    }

    /// Set the label.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A pointer event after the host has projected it into domain coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Position in the domain coordinate space (for a map: longitude, latitude).
    pub position: Point,
    /// Position in surface pixels, when the host has it.
    pub pixel: Option<Point>,
    /// The leaf that consumed the event. Set once, by the first match.
    pub target: Option<NodeId>,
    /// The node whose listeners are currently running.
    pub current: Option<NodeId>,
}

impl PointerEvent {
    /// An event at `position` with no pixel information.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            pixel: None,
            target: None,
            current: None,
        }
    }

    /// Attach the surface pixel position.
    pub fn with_pixel(mut self, pixel: Point) -> Self {
        self.pixel = Some(pixel);
        self
    }
}
