// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint request coalescing.
//!
//! ## Overview
//!
//! [`RenderScheduler`] turns any number of repaint requests made within one scheduling
//! tick into a single repaint. It owns no timer. The host supplies the tick:
//!
//! 1) [`RenderScheduler::request_render`] marks the scene dirty. The first request since
//!    the last tick returns [`Request::Scheduled`] and runs the `on_schedule` hook; the
//!    host reacts by arming its deferred callback (next frame, next macrotask, a test's
//!    manual step). Later requests return [`Request::Coalesced`].
//! 2) When the deferred callback runs, the host calls [`RenderScheduler::take_tick`],
//!    which reports whether a repaint is still owed and clears the flag.
//! 3) [`RenderScheduler::flush`] takes the flag early; the pending tick then finds
//!    nothing to do.
//!
//! [`Scene::tick`](crate::Scene::tick) and [`Scene::flush`](crate::Scene::flush) wrap
//! these steps around an actual repaint pass.
//!
//! ```
//! use strata_scene::scheduler::{RenderScheduler, Request};
//!
//! let mut s = RenderScheduler::new();
//! assert_eq!(s.request_render(), Request::Scheduled);
//! for _ in 0..4 {
//!     assert_eq!(s.request_render(), Request::Coalesced);
//! }
//! assert!(s.take_tick(), "one repaint owed");
//! assert!(!s.take_tick(), "and only one");
//! ```

use alloc::boxed::Box;
use core::fmt;

/// Result of [`RenderScheduler::request_render`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// This request armed a new tick.
    Scheduled,
    /// A tick was already pending; this request folded into it.
    Coalesced,
}

/// Counters for tests and diagnostics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Calls to [`RenderScheduler::request_render`].
    pub requests: u64,
    /// Ticks that were armed.
    pub scheduled: u64,
    /// Repaint passes actually run by the owning scene.
    pub passes: u64,
}

/// Coalesces repaint requests into at most one repaint per tick.
#[derive(Default)]
pub struct RenderScheduler {
    dirty: bool,
    pending: bool,
    stats: SchedulerStats,
    on_schedule: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("dirty", &self.dirty)
            .field("pending", &self.pending)
            .field("stats", &self.stats)
            .field("on_schedule", &self.on_schedule.is_some())
            .finish()
    }
}

impl RenderScheduler {
    /// A clean scheduler with no hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` whenever a request arms a new tick.
    pub fn set_on_schedule(&mut self, hook: impl FnMut() + 'static) {
        self.on_schedule = Some(Box::new(hook));
    }

    /// Ask for a repaint at the next tick. Never repaints synchronously.
    pub fn request_render(&mut self) -> Request {
        self.stats.requests += 1;
        self.dirty = true;
        if self.pending {
            return Request::Coalesced;
        }
        self.pending = true;
        self.stats.scheduled += 1;
        log::trace!("repaint scheduled");
        if let Some(hook) = self.on_schedule.as_mut() {
            hook();
        }
        Request::Scheduled
    }

    /// The deferred tick fired. Returns `true` if a repaint is owed, clearing the flag.
    pub fn take_tick(&mut self) -> bool {
        self.pending = false;
        core::mem::take(&mut self.dirty)
    }

    /// Take the dirty flag ahead of the tick. Returns `true` if a repaint was owed.
    ///
    /// A pending tick stays armed and will find the scheduler clean.
    pub fn flush(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }

    /// True if a repaint is owed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True if a tick is armed and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Counters since creation.
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub(crate) fn record_pass(&mut self) {
        self.stats.passes += 1;
    }
}
