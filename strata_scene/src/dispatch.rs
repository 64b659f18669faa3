// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing and pointer event dispatch.
//!
//! ## Routing
//!
//! [`Scene::trigger`] walks a subtree front to back (descending z-index) and stops at the
//! first leaf whose geometry contains the event position. That leaf fires its listeners
//! first. Every container on the path back to the starting node then fires its own
//! listeners for the same name, once each, innermost first. Containers whose children did
//! not match fire nothing.
//!
//! Hidden nodes take no part: a hidden container hides its subtree from hit testing, and a
//! leaf must be both [`VISIBLE`](crate::NodeFlags::VISIBLE) and
//! [`PICKABLE`](crate::NodeFlags::PICKABLE) to match.
//!
//! [`Scene::dispatch`] is the host entry point. It triggers on the root and, when nothing
//! consumed the event, fires the scene's *unhandled* listeners instead.

use core::ops::ControlFlow;

use kurbo::Point;
use strata_events::SubscriptionId;
use strata_rank::Order;

use crate::tree::{NodeKind, Scene};
use crate::types::{NodeFlags, NodeId, PointerEvent};

impl<D> Scene<D> {
    /// Subscribe `listener` to `name` events on `id`.
    ///
    /// Returns `None` if `id` is stale.
    pub fn on(
        &mut self,
        id: NodeId,
        name: &str,
        listener: impl FnMut(&PointerEvent) + 'static,
    ) -> Option<SubscriptionId> {
        Some(self.node_opt_mut(id)?.listeners.on(name, listener))
    }

    /// Unsubscribe `sub` from `id`. Unknown subscriptions are ignored.
    pub fn off(&mut self, id: NodeId, sub: SubscriptionId) -> bool {
        self.node_opt_mut(id)
            .is_some_and(|node| node.listeners.off(sub))
    }

    /// Unsubscribe every `name` listener of `id`. Returns how many were removed.
    pub fn off_all(&mut self, id: NodeId, name: &str) -> usize {
        self.node_opt_mut(id)
            .map_or(0, |node| node.listeners.off_all(name))
    }

    /// Number of `name` listeners on `id`.
    pub fn listener_count(&self, id: NodeId, name: &str) -> usize {
        self.node_opt(id)
            .map_or(0, |node| node.listeners.listener_count(name))
    }

    /// Subscribe to `name` events that no node consumed.
    pub fn on_unhandled(
        &mut self,
        name: &str,
        listener: impl FnMut(&PointerEvent) + 'static,
    ) -> SubscriptionId {
        self.unhandled.on(name, listener)
    }

    /// Remove an unhandled-event subscription.
    pub fn off_unhandled(&mut self, sub: SubscriptionId) -> bool {
        self.unhandled.off(sub)
    }

    /// Whether `position` hits `id`.
    ///
    /// A container hits iff any of its children does, checked front to back and stopping
    /// at the first match. A container with no children never hits. Stale ids never hit.
    pub fn contain(&self, id: NodeId, position: Point, pixel: Option<Point>) -> bool {
        let Some(node) = self.node_opt(id) else {
            return false;
        };
        if !node.flags.contains(NodeFlags::VISIBLE) {
            return false;
        }
        match &node.kind {
            NodeKind::Leaf(shape) => {
                node.flags.contains(NodeFlags::PICKABLE) && shape.contain(position, pixel)
            }
            NodeKind::Container => node
                .children
                .for_each(Order::Descending, |child| {
                    if self.contain(*child, position, pixel) {
                        ControlFlow::Break(())
                    } else {
                        ControlFlow::Continue(())
                    }
                })
                .is_break(),
        }
    }

    /// Route `event` into the subtree at `id`. Returns `true` if some leaf consumed it.
    ///
    /// See the [module docs](self) for the routing rules. The consuming leaf is recorded in
    /// [`PointerEvent::target`]; [`PointerEvent::current`] names the node whose listeners
    /// are running.
    pub fn trigger(&mut self, id: NodeId, name: &str, event: &mut PointerEvent) -> bool {
        let Some(node) = self.node_opt(id) else {
            return false;
        };
        let consumed = if node.is_container() {
            if !node.flags.contains(NodeFlags::VISIBLE) {
                return false;
            }
            self.each_children_mut(id, Order::Descending, |scene, child| {
                if scene.trigger(child, name, event) {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .is_break()
        } else {
            let hit = self.contain(id, event.position, event.pixel);
            if hit {
                event.target.get_or_insert(id);
            }
            hit
        };
        if !consumed {
            return false;
        }
        if let Some(node) = self.node_opt_mut(id) {
            let fired = node
                .listeners
                .fire(name, event, |event| event.current = Some(id));
            log::trace!("{name} on {id:?}: {fired} listener(s)");
        }
        true
    }

    /// Host entry point: route `event` from the root.
    ///
    /// When nothing consumed the event, the unhandled listeners fire with
    /// [`PointerEvent::current`] cleared. Returns whether a node consumed it.
    pub fn dispatch(&mut self, name: &str, event: &mut PointerEvent) -> bool {
        let root = self.root();
        if self.trigger(root, name, event) {
            return true;
        }
        let fired = self
            .unhandled
            .fire(name, event, |event| event.current = None);
        log::trace!("{name} unhandled: {fired} listener(s)");
        false
    }
}
