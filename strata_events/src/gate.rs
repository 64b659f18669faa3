// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input gating for hosts that pan a surface with the same button that clicks.
//!
//! The host feeds raw button transitions into a [`PointerGate`] and asks it whether a
//! named pointer event should reach the scene at all:
//!
//! - While a button is held, nothing is admitted (the user is dragging the surface).
//! - A `click` is admitted only if the press that produced it was short, at most
//!   [`PointerGate::click_threshold_ms`] (300 ms by default). Long presses are drags.
//! - A `click` with no recorded press is admitted.
//!
//! ```
//! use strata_events::PointerGate;
//!
//! let mut gate = PointerGate::new();
//! gate.on_down(1_000);
//! assert!(!gate.admit("mousemove", 1_050));
//! gate.on_up();
//! assert!(gate.admit("click", 1_100));
//!
//! gate.on_down(2_000);
//! gate.on_up();
//! assert!(!gate.admit("click", 2_900), "long press is a drag");
//! assert!(gate.admit("mousemove", 2_950));
//! ```

/// Longest press, in milliseconds, that still counts as a click.
pub const DEFAULT_CLICK_THRESHOLD_MS: u64 = 300;

/// Name of the event subject to the press-duration rule.
pub const CLICK: &str = "click";

/// Button-state filter in front of scene dispatch.
#[derive(Clone, Debug)]
pub struct PointerGate {
    pressed: bool,
    last_down_ms: Option<u64>,
    /// Longest press that still produces a click.
    pub click_threshold_ms: u64,
}

impl Default for PointerGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerGate {
    /// A gate with the default click threshold.
    pub const fn new() -> Self {
        Self::with_threshold(DEFAULT_CLICK_THRESHOLD_MS)
    }

    /// A gate with a custom click threshold in milliseconds.
    pub const fn with_threshold(click_threshold_ms: u64) -> Self {
        Self {
            pressed: false,
            last_down_ms: None,
            click_threshold_ms,
        }
    }

    /// Record a button press at `now_ms`.
    pub fn on_down(&mut self, now_ms: u64) {
        self.pressed = true;
        self.last_down_ms = Some(now_ms);
    }

    /// Record a button release.
    ///
    /// The press duration rule is measured from the press to the `click` passed to
    /// [`admit`](Self::admit), so the release itself carries no timestamp.
    pub fn on_up(&mut self) {
        self.pressed = false;
    }

    /// True while a button is held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Whether the pointer event `name` arriving at `now_ms` should be dispatched.
    pub fn admit(&self, name: &str, now_ms: u64) -> bool {
        if name == CLICK
            && let Some(down) = self.last_down_ms
            && now_ms.saturating_sub(down) > self.click_threshold_ms
        {
            return false;
        }
        !self.pressed
    }
}
