// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Scene: a retained scene graph for overlays drawn on top of a host surface.
//!
//! - Represents a hierarchy of containers and leaves with z-ordered children, visibility,
//!   and style.
//! - Routes pointer events to the topmost leaf under the pointer and bubbles them back up
//!   through the containers on its path.
//! - Collapses bursts of repaint requests into one deferred repaint pass, painted back to
//!   front.
//!
//! ## Where this fits
//!
//! The host owns everything outside the graph: the drawing surface, projecting pointer
//! input into domain coordinates, and the timer behind "the next tick". This crate decides
//! which nodes exist, in what order they are visited, which one an event lands on, and
//! when a repaint is owed. How a leaf draws is up to its [`Shape`] implementation.
//!
//! ## API overview
//!
//! - [`Scene`]: the node arena. Its root container is the view.
//! - [`NodeId`]: generational handle of a node.
//! - [`NodeDesc`]: initial z-index, [`NodeFlags`], [`Style`], and label of a new node.
//! - [`Shape`]: leaf geometry and drawing; [`KurboShape`] adapts any `kurbo::Shape`.
//! - [`PointerEvent`]: an event in domain coordinates, stamped with target and current node.
//! - [`RenderScheduler`]: repaint request coalescing, driven by [`Scene::tick`].
//!
//! Key operations:
//! - [`Scene::add_child`], [`Scene::remove_child`], [`Scene::set_children`],
//!   [`Scene::clear`], [`Scene::set_z_index`].
//! - [`Scene::each_children`] and [`Scene::each_children_mut`] for ordered traversal with
//!   early exit.
//! - [`Scene::contain`], [`Scene::trigger`], and [`Scene::dispatch`] for hit testing and
//!   event routing.
//! - [`Scene::request_render`], [`Scene::tick`], [`Scene::flush`], and [`Scene::repaint`].
//!
//! ### Minimal usage
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::{Point, Rect};
//! use strata_scene::{KurboShape, NodeDesc, PointerEvent, RenderContext, Scene, TaskQueue};
//!
//! let mut scene: Scene = Scene::new();
//! let root = scene.root();
//! let layer = scene.create_container(NodeDesc::default().named("pins"));
//! let pin = scene.create_leaf(
//!     KurboShape::new(Rect::new(116.3, 39.9, 116.5, 40.1)),
//!     NodeDesc::z(1),
//! );
//! scene.add_child(layer, pin).unwrap();
//! scene.add_child(root, layer).unwrap();
//!
//! let clicked = Rc::new(Cell::new(false));
//! let flag = clicked.clone();
//! scene.on(layer, "click", move |ev| flag.set(ev.target == Some(pin)));
//!
//! assert!(scene.dispatch("click", &mut PointerEvent::new(Point::new(116.4, 40.0))));
//! assert!(clicked.get());
//!
//! // Every mutation above asked for a repaint; the tick runs exactly one.
//! let mut surface = ();
//! let mut ctx = RenderContext::new(&mut surface, Rect::new(-180.0, -90.0, 180.0, 90.0), 1.0);
//! let mut tasks = TaskQueue::new();
//! assert!(scene.tick(&mut ctx, &mut tasks).is_some());
//! assert!(scene.tick(&mut ctx, &mut tasks).is_none());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatch;
mod error;
pub mod render;
pub mod scheduler;
mod shape;
pub mod style;
mod tree;
mod types;

pub use error::{RenderError, SceneError, StyleError};
pub use render::{PassReport, RenderCause, RenderContext, RenderTask, Spawn, TaskQueue};
pub use scheduler::{RenderScheduler, Request, SchedulerStats};
pub use shape::{KurboShape, Shape};
pub use style::{FillImage, ImageHandle, Style, StyleValue};
pub use tree::{BeforeRender, Scene};
pub use types::{EMPTY_BOUNDS, NodeDesc, NodeFlags, NodeId, PointerEvent};

pub use strata_events::SubscriptionId;
pub use strata_rank::Order;
