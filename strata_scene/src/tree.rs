// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: node arena, tree mutation, traversal, bounds.

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;
use core::ops::ControlFlow;

use kurbo::Rect;
use strata_events::EventRegistry;
use strata_rank::{Order, RankedIndex};

use crate::error::SceneError;
use crate::scheduler::{RenderScheduler, Request};
use crate::shape::Shape;
use crate::style::{ImageHandle, Style};
use crate::types::{EMPTY_BOUNDS, NodeDesc, NodeFlags, NodeId, PointerEvent};

/// Hook run with a node's render copy of its style before the node is drawn.
///
/// Returning [`ControlFlow::Break`] skips the node and its whole subtree for this pass.
pub type BeforeRender = Box<dyn FnMut(&mut Style) -> ControlFlow<()>>;

pub(crate) enum NodeKind<D> {
    Container,
    Leaf(Box<dyn Shape<D>>),
}

pub(crate) struct Node<D> {
    generation: u32,
    pub(crate) parent: Option<NodeId>,
    /// Root of the scene this node is attached to; `None` while detached.
    pub(crate) view: Option<NodeId>,
    pub(crate) z_index: i32,
    pub(crate) flags: NodeFlags,
    pub(crate) name: Option<String>,
    pub(crate) style: Style,
    pub(crate) kind: NodeKind<D>,
    pub(crate) children: RankedIndex<NodeId>,
    pub(crate) listeners: EventRegistry<PointerEvent>,
    pub(crate) before_render: Option<BeforeRender>,
    bounds: Cell<Option<Rect>>,
}

impl<D> Node<D> {
    fn new(generation: u32, kind: NodeKind<D>, desc: NodeDesc) -> Self {
        Self {
            generation,
            parent: None,
            view: None,
            z_index: desc.z_index,
            flags: desc.flags,
            name: desc.name,
            style: desc.style,
            kind,
            children: RankedIndex::new(),
            listeners: EventRegistry::new(),
            before_render: None,
            bounds: Cell::new(None),
        }
    }

    pub(crate) fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Container)
    }
}

/// A retained scene graph.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. Parent and child links are ids,
/// never ownership edges. Every scene has a root container created by [`Scene::new`];
/// the root is the scene's view, and nodes reachable from it are *attached*.
///
/// `D` is the host's drawing surface type passed to leaf [`Shape`]s at render time.
pub struct Scene<D = ()> {
    nodes: Vec<Option<Node<D>>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
    pub(crate) scheduler: RenderScheduler,
    pub(crate) unhandled: EventRegistry<PointerEvent>,
    pub(crate) rendered_image: Option<ImageHandle>,
}

impl<D> fmt::Debug for Scene<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("root", &self.root)
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl<D> Default for Scene<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Scene<D> {
    /// Create a scene holding only its root container.
    pub fn new() -> Self {
        let mut scene = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            scheduler: RenderScheduler::new(),
            unhandled: EventRegistry::new(),
            rendered_image: None,
        };
        let root = scene.alloc(NodeKind::Container, NodeDesc::default().named("root"));
        if let Some(node) = scene.node_opt_mut(root) {
            node.view = Some(root);
        }
        scene.root = root;
        scene
    }

    /// The root container (the view).
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached container.
    pub fn create_container(&mut self, desc: NodeDesc) -> NodeId {
        self.alloc(NodeKind::Container, desc)
    }

    /// Create a detached leaf with the given geometry.
    pub fn create_leaf(&mut self, shape: impl Shape<D> + 'static, desc: NodeDesc) -> NodeId {
        self.alloc(NodeKind::Leaf(Box::new(shape)), desc)
    }

    fn alloc(&mut self, kind: NodeKind<D>, desc: NodeDesc) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind, desc));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, kind, desc)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Destroy `id` and its whole subtree, freeing their slots.
    ///
    /// The root cannot be destroyed. Stale ids are ignored.
    pub fn destroy(&mut self, id: NodeId) {
        if id == self.root || !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.idx()).and_then(Option::take) else {
            return;
        };
        self.free_list.push(id.idx());
        for child in node.children.iter(Order::Ascending) {
            self.free_subtree(*child);
        }
    }

    // --- liveness and accessors ---

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// A scene always holds its root, so this is never true.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The parent of `id`, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// The view (scene root) `id` is attached to.
    pub fn view(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.view
    }

    /// True if `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.view(id).is_some()
    }

    /// True if `id` is a container.
    pub fn is_container(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(Node::is_container)
    }

    /// The z-index of `id`.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        Some(self.node_opt(id)?.z_index)
    }

    /// The label of `id`.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node_opt(id)?.name.as_deref()
    }

    /// Flags of `id`.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        Some(self.node_opt(id)?.flags)
    }

    /// True if `id` is live and visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(NodeFlags::VISIBLE))
    }

    /// Number of direct children of `id`.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.node_opt(id).map_or(0, |n| n.children.len())
    }

    /// Number of rank buckets ever created under `id`, empty ones included.
    pub fn rank_count(&self, id: NodeId) -> usize {
        self.node_opt(id).map_or(0, |n| n.children.bucket_count())
    }

    /// The canonical style of `id`.
    pub fn style(&self, id: NodeId) -> Option<&Style> {
        Some(&self.node_opt(id)?.style)
    }

    /// Mutable access to the canonical style. Does not request a repaint.
    pub fn style_mut(&mut self, id: NodeId) -> Option<&mut Style> {
        Some(&mut self.node_opt_mut(id)?.style)
    }

    /// Replace the style of `id` and request a repaint if it is attached.
    pub fn set_style(&mut self, id: NodeId, style: Style) {
        if let Some(node) = self.node_opt_mut(id) {
            node.style = style;
            self.request_render_from(id);
        }
    }

    /// Install or clear the before-render hook of `id`.
    pub fn set_before_render(&mut self, id: NodeId, hook: Option<BeforeRender>) {
        if let Some(node) = self.node_opt_mut(id) {
            node.before_render = hook;
        }
    }

    /// Replace the geometry of leaf `id`. Containers are left untouched.
    pub fn set_shape(&mut self, id: NodeId, shape: impl Shape<D> + 'static) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.is_container() {
            return;
        }
        node.kind = NodeKind::Leaf(Box::new(shape));
        self.invalidate_bounds(id);
        self.request_render_from(id);
    }

    // --- tree mutation ---

    /// Attach `child` under `parent` in the bucket for the child's z-index.
    ///
    /// A child that already has a different parent is detached from it first.
    /// Adding a child to the parent it already has leaves a single entry.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let Some(parent_node) = self.node_opt(parent) else {
            return Err(SceneError::StaleNode(parent));
        };
        if !parent_node.is_container() {
            return Err(SceneError::NotAContainer(parent));
        }
        let view = parent_node.view;
        let Some(child_node) = self.node_opt(child) else {
            return Err(SceneError::StaleNode(child));
        };
        if child == self.root || self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        let (z, previous) = (child_node.z_index, child_node.parent);
        if let Some(previous) = previous
            && previous != parent
        {
            self.remove_child(previous, child);
        }

        if let Some(node) = self.node_opt_mut(child) {
            node.parent = Some(parent);
        }
        self.set_view_subtree(child, view);
        if let Some(node) = self.node_opt_mut(parent) {
            node.children.insert(z, child);
        }
        self.invalidate_bounds(parent);
        log::trace!("added {child:?} under {parent:?} at z={z}");
        self.request_render_from(parent);
        Ok(())
    }

    /// Detach `child` from `parent`.
    ///
    /// Does nothing if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) != Some(parent) {
            return;
        }
        self.unlink(parent, child);
        self.invalidate_bounds(parent);
        log::trace!("removed {child:?} from {parent:?}");
        self.request_render_from(parent);
    }

    /// Replace the children of `parent` with `children`, in order.
    ///
    /// Rank buckets persist across the replacement. Former children are detached.
    /// On error, the children added before the failing one stay attached.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), SceneError> {
        if !self.is_alive(parent) {
            return Err(SceneError::StaleNode(parent));
        }
        if !self.is_container(parent) {
            return Err(SceneError::NotAContainer(parent));
        }
        self.detach_all(parent);
        for &child in children {
            self.add_child(parent, child)?;
        }
        self.request_render_from(parent);
        Ok(())
    }

    /// Detach every child of `parent`, keeping its rank buckets.
    ///
    /// Requests a repaint unless `repaint` is false.
    pub fn clear(&mut self, parent: NodeId, repaint: bool) {
        if !self.is_alive(parent) {
            return;
        }
        self.detach_all(parent);
        if repaint {
            self.request_render_from(parent);
        }
    }

    /// Move `id` to rank `z` among its siblings.
    ///
    /// Does nothing for a node without a parent.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        let (Some(parent), old) = (node.parent, node.z_index) else {
            return;
        };
        if let Some(parent_node) = self.node_opt_mut(parent) {
            parent_node.children.move_key(id, old, z);
        }
        if let Some(node) = self.node_opt_mut(id) {
            node.z_index = z;
        }
        log::trace!("moved {id:?} from z={old} to z={z}");
        self.request_render_from(parent);
    }

    /// Hide `id`. Requests a repaint only if it was visible.
    pub fn hide(&mut self, id: NodeId) {
        if self.is_visible(id) {
            if let Some(node) = self.node_opt_mut(id) {
                node.flags.remove(NodeFlags::VISIBLE);
            }
            self.request_render_from(id);
        }
    }

    /// Show `id`. Requests a repaint only if it was hidden.
    pub fn show(&mut self, id: NodeId) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if !node.flags.contains(NodeFlags::VISIBLE) {
            node.flags.insert(NodeFlags::VISIBLE);
            self.request_render_from(id);
        }
    }

    /// Replace the flags of `id`, requesting a repaint if they changed.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.flags != flags {
            node.flags = flags;
            self.request_render_from(id);
        }
    }

    // --- traversal ---

    /// Visit the children of `id` in rank `order` until `f` breaks.
    ///
    /// Returns [`ControlFlow::Break`] if the walk stopped early. A stale `id` has no children.
    pub fn each_children(
        &self,
        id: NodeId,
        order: Order,
        mut f: impl FnMut(NodeId) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        match self.node_opt(id) {
            Some(node) => node.children.for_each(order, |child| f(*child)),
            None => ControlFlow::Continue(()),
        }
    }

    /// Visit the children of `id` in rank `order` with mutable access to the scene.
    ///
    /// Each bucket's members are copied when the walk enters that bucket. Siblings removed
    /// or re-ranked after that are skipped. A sibling is never visited twice, even if it
    /// moves into a bucket the walk has not reached yet.
    /// Siblings added or moved mid-walk are visited only if they land in a bucket not yet
    /// entered; one moved behind the walk waits for the next walk.
    pub fn each_children_mut<B>(
        &mut self,
        id: NodeId,
        order: Order,
        mut f: impl FnMut(&mut Self, NodeId) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        let mut cursor = None;
        let mut visited = BTreeSet::new();
        loop {
            let Some(bucket) = self
                .node_opt(id)
                .and_then(|node| node.children.next_bucket(cursor, order))
            else {
                break;
            };
            let rank = bucket.rank();
            let snapshot: Vec<NodeId> = bucket.members().to_vec();
            cursor = Some(rank);
            for child in snapshot {
                let still_here = self
                    .node_opt(child)
                    .is_some_and(|n| n.parent == Some(id) && n.z_index == rank);
                if still_here && visited.insert(child) {
                    f(self, child)?;
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Children of `id` in rank `order`.
    pub fn children(&self, id: NodeId, order: Order) -> Vec<NodeId> {
        self.node_opt(id)
            .map(|node| node.children.iter(order).copied().collect())
            .unwrap_or_default()
    }

    /// Bounds of `id` in domain coordinates.
    ///
    /// Leaves report their shape's bounds. Containers report the union of their children's
    /// bounds, or [`EMPTY_BOUNDS`] when they have no content. Computed lazily and cached
    /// until the subtree changes.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        let node = self.node_opt(id)?;
        if let Some(cached) = node.bounds.get() {
            return Some(cached);
        }
        let bounds = match &node.kind {
            NodeKind::Leaf(shape) => shape.bounds(),
            NodeKind::Container => {
                let mut acc = EMPTY_BOUNDS;
                for child in node.children.iter(Order::Ascending) {
                    if let Some(b) = self.bounds(*child) {
                        acc = acc.union(b);
                    }
                }
                acc
            }
        };
        node.bounds.set(Some(bounds));
        Some(bounds)
    }

    // --- repaint requests and cached output ---

    /// Request a repaint at the next tick. Multiple requests within a tick coalesce.
    pub fn request_render(&mut self) -> Request {
        self.scheduler.request_render()
    }

    /// The scheduler, for inspecting state and counters.
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// The scheduler, for installing the `on_schedule` hook.
    pub fn scheduler_mut(&mut self) -> &mut RenderScheduler {
        &mut self.scheduler
    }

    /// Remember the image produced by the last pass. Discarded when the next scheduled
    /// repaint runs.
    pub fn set_rendered_image(&mut self, image: Option<ImageHandle>) {
        self.rendered_image = image;
    }

    /// The image produced by the last pass, if the host stored one.
    pub fn rendered_image(&self) -> Option<&ImageHandle> {
        self.rendered_image.as_ref()
    }

    // --- internals ---

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node<D>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node<D>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Request a repaint on behalf of `id`, if it is attached.
    pub(crate) fn request_render_from(&mut self, id: NodeId) {
        if self.is_attached(id) {
            self.scheduler.request_render();
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        let z = self.z_index(child).unwrap_or_default();
        if let Some(node) = self.node_opt_mut(parent) {
            node.children.remove(z, &child);
        }
        if let Some(node) = self.node_opt_mut(child) {
            node.parent = None;
        }
        self.set_view_subtree(child, None);
    }

    fn detach_all(&mut self, parent: NodeId) {
        let former = self.children(parent, Order::Ascending);
        if let Some(node) = self.node_opt_mut(parent) {
            node.children.clear_members();
        }
        for child in former {
            if let Some(node) = self.node_opt_mut(child) {
                node.parent = None;
            }
            self.set_view_subtree(child, None);
        }
        self.invalidate_bounds(parent);
    }

    fn set_view_subtree(&mut self, id: NodeId, view: Option<NodeId>) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.view = view;
        let children: Vec<NodeId> = node.children.iter(Order::Ascending).copied().collect();
        for child in children {
            self.set_view_subtree(child, view);
        }
    }

    fn invalidate_bounds(&self, mut id: NodeId) {
        while let Some(node) = self.node_opt(id) {
            node.bounds.set(None);
            match node.parent {
                Some(p) => id = p,
                None => break,
            }
        }
    }
}
