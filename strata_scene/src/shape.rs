// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf geometry: the boundary between the scene and the code that knows how to draw.

use kurbo::{Point, Rect};

use crate::render::{RenderContext, RenderTask};
use crate::style::Style;

/// Geometry and drawing of a leaf node.
///
/// `D` is the host's drawing surface, see [`RenderContext::surface`].
pub trait Shape<D = ()> {
    /// Whether `position` (domain coordinates) hits this shape. `pixel` is the same
    /// point in surface pixels when the host supplies it.
    ///
    /// Must be pure and total: degenerate geometry returns `false`, never panics.
    fn contain(&self, position: Point, pixel: Option<Point>) -> bool;

    /// Bounds in domain coordinates.
    fn bounds(&self) -> Rect;

    /// Draw with a render copy of the node's style.
    ///
    /// Work that cannot finish synchronously (waiting on a decode, say) is returned as a
    /// [`RenderTask`]. The pass hands it to the host's spawner and moves on without
    /// awaiting it.
    fn render(&self, ctx: &mut RenderContext<'_, D>, style: &Style) -> Option<RenderTask> {
        let _ = (ctx, style);
        None
    }
}

/// Adapts any [`kurbo::Shape`] as leaf geometry.
///
/// Hit testing uses the shape's fill containment. Shapes whose bounding box has no area
/// (points, axis-aligned lines) never match.
#[derive(Clone, Debug)]
pub struct KurboShape<G> {
    /// The wrapped geometry, in domain coordinates.
    pub geometry: G,
}

impl<G> KurboShape<G> {
    /// Wrap `geometry`.
    pub fn new(geometry: G) -> Self {
        Self { geometry }
    }
}

impl<D, G: kurbo::Shape> Shape<D> for KurboShape<G> {
    fn contain(&self, position: Point, _pixel: Option<Point>) -> bool {
        let bbox = self.geometry.bounding_box();
        if !(bbox.width() > 0.0 && bbox.height() > 0.0) {
            return false;
        }
        self.geometry.contains(position)
    }

    fn bounds(&self) -> Rect {
        self.geometry.bounding_box()
    }
}
