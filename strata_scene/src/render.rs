// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The repaint pass.
//!
//! ## Overview
//!
//! A pass walks the scene from the root in painter's order (ascending z-index, back to
//! front). For every visible node it:
//!
//! 1) takes a [`render copy`](crate::Style::render_copy) of the node's style,
//! 2) runs the node's before-render hook, which may skip the node and its subtree,
//! 3) for a leaf, calls [`Shape::render`](crate::Shape::render) with the host's
//!    [`RenderContext`], then recurses into children for a container.
//!
//! ## Asynchronous leaves
//!
//! A leaf may return a [`RenderTask`]. The pass hands it to the host's [`Spawn`]
//! implementation and moves straight on to the next sibling. The pass never awaits these
//! tasks, and nothing cancels one that a later pass supersedes; a stalled task delays
//! only its own node's output.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::future::Future;
use core::ops::ControlFlow;
use core::pin::Pin;

use kurbo::Rect;
use strata_rank::Order;

use crate::error::RenderError;
use crate::tree::{NodeKind, Scene};
use crate::types::{NodeFlags, NodeId};

/// Deferred drawing work returned by a leaf.
pub type RenderTask = Pin<Box<dyn Future<Output = ()>>>;

/// Host executor that receives [`RenderTask`]s.
pub trait Spawn {
    /// Take ownership of `task`, produced while painting `node`.
    fn spawn(&mut self, node: NodeId, task: RenderTask);
}

/// Tasks collected for the host (or a test) to drive later.
pub type TaskQueue = Vec<(NodeId, RenderTask)>;

impl Spawn for TaskQueue {
    fn spawn(&mut self, node: NodeId, task: RenderTask) {
        self.push((node, task));
    }
}

/// Why a pass is running.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RenderCause {
    /// The host asked for it directly (a view change, say).
    #[default]
    Host,
    /// A coalesced repaint request came due.
    Scheduled,
}

/// What every render call in one pass receives.
pub struct RenderContext<'a, D> {
    /// The host's drawing handle.
    pub surface: &'a mut D,
    /// The currently visible region, in domain coordinates.
    pub visible_bounds: Rect,
    /// Device pixel ratio.
    pub scale: f64,
    /// Why the pass is running.
    pub cause: RenderCause,
}

impl<'a, D> RenderContext<'a, D> {
    /// A host-initiated context.
    pub fn new(surface: &'a mut D, visible_bounds: Rect, scale: f64) -> Self {
        Self {
            surface,
            visible_bounds,
            scale,
            cause: RenderCause::Host,
        }
    }
}

impl<D> fmt::Debug for RenderContext<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("visible_bounds", &self.visible_bounds)
            .field("scale", &self.scale)
            .field("cause", &self.cause)
            .finish_non_exhaustive()
    }
}

/// Counters for one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Nodes reached by the walk.
    pub visited: usize,
    /// Leaves whose render step ran.
    pub painted: usize,
    /// Hidden nodes skipped along with their subtrees.
    pub hidden: usize,
    /// Nodes skipped by their before-render hook.
    pub vetoed: usize,
    /// Tasks handed to the spawner.
    pub spawned: usize,
    /// Nodes that could not be prepared, skipped along with their subtrees.
    pub failed: Vec<RenderError>,
}

impl<D> Scene<D> {
    /// The deferred tick fired: repaint if a request is still owed.
    ///
    /// Discards the cached rendered image and sets `ctx.cause` to
    /// [`RenderCause::Scheduled`] before painting. Returns `None` when there was
    /// nothing to do.
    pub fn tick(
        &mut self,
        ctx: &mut RenderContext<'_, D>,
        spawner: &mut impl Spawn,
    ) -> Option<PassReport> {
        if !self.scheduler.take_tick() {
            return None;
        }
        self.rendered_image = None;
        ctx.cause = RenderCause::Scheduled;
        Some(self.run_pass(ctx, spawner))
    }

    /// Repaint now if a request is owed. The pending tick will then find nothing to do.
    ///
    /// Runs as a host pass: `ctx.cause` is reset to [`RenderCause::Host`].
    pub fn flush(
        &mut self,
        ctx: &mut RenderContext<'_, D>,
        spawner: &mut impl Spawn,
    ) -> Option<PassReport> {
        if !self.scheduler.flush() {
            return None;
        }
        ctx.cause = RenderCause::Host;
        Some(self.run_pass(ctx, spawner))
    }

    /// Run a pass unconditionally, as [`RenderCause::Host`]. Leaves the scheduler untouched.
    pub fn repaint(
        &mut self,
        ctx: &mut RenderContext<'_, D>,
        spawner: &mut impl Spawn,
    ) -> PassReport {
        ctx.cause = RenderCause::Host;
        self.run_pass(ctx, spawner)
    }

    fn run_pass(
        &mut self,
        ctx: &mut RenderContext<'_, D>,
        spawner: &mut impl Spawn,
    ) -> PassReport {
        self.scheduler.record_pass();
        let mut report = PassReport::default();
        let root = self.root();
        self.paint(root, ctx, spawner, &mut report);
        log::debug!(
            "repaint ({:?}): visited={} painted={} hidden={} vetoed={} spawned={} failed={}",
            ctx.cause,
            report.visited,
            report.painted,
            report.hidden,
            report.vetoed,
            report.spawned,
            report.failed.len()
        );
        report
    }

    fn paint(
        &mut self,
        id: NodeId,
        ctx: &mut RenderContext<'_, D>,
        spawner: &mut impl Spawn,
        report: &mut PassReport,
    ) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        report.visited += 1;
        if !node.flags.contains(NodeFlags::VISIBLE) {
            report.hidden += 1;
            return;
        }
        let mut style = match node.style.render_copy() {
            Ok(style) => style,
            Err(source) => {
                let err = RenderError::Style { node: id, source };
                log::warn!("skipping {id:?}: {err}");
                report.failed.push(err);
                return;
            }
        };
        if let Some(hook) = node.before_render.as_mut()
            && hook(&mut style).is_break()
        {
            log::trace!("{id:?} vetoed by before-render hook");
            report.vetoed += 1;
            return;
        }

        if let NodeKind::Leaf(shape) = &node.kind {
            report.painted += 1;
            if let Some(task) = shape.render(ctx, &style) {
                report.spawned += 1;
                spawner.spawn(id, task);
            }
            return;
        }

        let _ = self.each_children_mut(id, Order::Ascending, |scene, child| {
            scene.paint(child, &mut *ctx, &mut *spawner, &mut *report);
            ControlFlow::<()>::Continue(())
        });
    }
}
