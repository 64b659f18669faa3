// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Events: listener tables and pointer gating for a retained scene.
//!
//! ## Overview
//!
//! This crate holds the event plumbing that a scene node owns.
//! It does not perform hit testing or decide which node receives an event;
//! `strata_scene` does that and calls into an [`EventRegistry`] once a node has matched.
//!
//! - [`EventRegistry`]: event name → subscribers in subscription order.
//!   Subscribing returns a [`SubscriptionId`]; unsubscribing an unknown id is a no-op.
//! - [`EventRegistry::fire`]: applies a stamp hook (for example "the originating node")
//!   once, then delivers the event to each subscriber.
//! - [`PointerGate`]: decides whether raw pointer input should be dispatched at all
//!   (drags suppress clicks and moves).
//!
//! ## Workflow
//!
//! 1) The host converts native input into an event value and asks the [`PointerGate`] to admit it.
//! 2) The scene hit-tests and, for each node on the winning path, calls
//!    [`EventRegistry::fire`] with a stamp that records the node.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod gate;
pub mod registry;

pub use gate::PointerGate;
pub use registry::{EventRegistry, Listener, SubscriptionId};
