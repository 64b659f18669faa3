// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of a scene: ordering, dispatch, and scheduled repaint.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use core::ops::ControlFlow;

use kurbo::{Point, Rect};
use strata_scene::{
    EMPTY_BOUNDS, FillImage, ImageHandle, KurboShape, NodeDesc, NodeId, Order, PointerEvent,
    RenderContext, RenderError, RenderTask, Scene, Shape, Style, StyleError, StyleValue,
    TaskQueue,
};

fn unit_leaf(scene: &mut Scene, z: i32) -> NodeId {
    scene.create_leaf(
        KurboShape::new(Rect::new(0.0, 0.0, 1.0, 1.0)),
        NodeDesc::z(z),
    )
}

fn forward(scene: &Scene, id: NodeId) -> Vec<NodeId> {
    scene.children(id, Order::Ascending)
}

fn ctx(surface: &mut ()) -> RenderContext<'_, ()> {
    RenderContext::new(surface, Rect::new(-180.0, -90.0, 180.0, 90.0), 1.0)
}

#[test]
fn children_walk_in_both_orders() {
    let mut scene: Scene = Scene::new();
    let c = scene.create_container(NodeDesc::default());
    let a = unit_leaf(&mut scene, 1);
    let b = unit_leaf(&mut scene, 2);
    scene.add_child(c, a).unwrap();
    scene.add_child(c, b).unwrap();

    let mut seen = Vec::new();
    let _ = scene.each_children(c, Order::Ascending, |id| {
        seen.push(id);
        ControlFlow::Continue(())
    });
    assert_eq!(seen, [a, b]);
    assert_eq!(scene.children(c, Order::Descending), [b, a]);
}

#[test]
fn each_children_stops_on_break() {
    let mut scene: Scene = Scene::new();
    let c = scene.create_container(NodeDesc::default());
    for z in 0..5 {
        let id = unit_leaf(&mut scene, z);
        scene.add_child(c, id).unwrap();
    }
    let mut visits = 0;
    let flow = scene.each_children(c, Order::Descending, |_| {
        visits += 1;
        if visits == 2 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    assert!(flow.is_break());
    assert_eq!(visits, 2);
}

#[test]
fn removing_twice_is_a_no_op() {
    let mut scene: Scene = Scene::new();
    let c = scene.create_container(NodeDesc::default());
    let a = unit_leaf(&mut scene, 1);
    let b = unit_leaf(&mut scene, 2);
    scene.add_child(c, a).unwrap();
    scene.add_child(c, b).unwrap();

    scene.remove_child(c, a);
    assert_eq!(scene.child_count(c), 1);
    scene.remove_child(c, a);
    assert_eq!(scene.child_count(c), 1);
    assert_eq!(forward(&scene, c), [b]);
}

#[test]
fn click_bubbles_leaf_to_root() {
    let mut scene: Scene = Scene::new();
    let r = scene.root();
    let m = scene.create_container(NodeDesc::default());
    let g = scene.create_leaf(
        KurboShape::new(Rect::new(10.0, 10.0, 20.0, 20.0)),
        NodeDesc::default(),
    );
    let other = scene.create_leaf(
        KurboShape::new(Rect::new(50.0, 50.0, 60.0, 60.0)),
        NodeDesc::z(3),
    );
    scene.add_child(r, m).unwrap();
    scene.add_child(m, g).unwrap();
    scene.add_child(r, other).unwrap();

    let order = Rc::new(RefCell::new(Vec::new()));
    for (id, label) in [(r, "R"), (m, "M"), (g, "G"), (other, "other")] {
        let order = order.clone();
        scene.on(id, "click", move |_| order.borrow_mut().push(label));
    }

    let mut ev = PointerEvent::new(Point::new(15.0, 15.0)).with_pixel(Point::new(300.0, 200.0));
    assert!(scene.trigger(r, "click", &mut ev));
    assert_eq!(*order.borrow(), ["G", "M", "R"]);
    assert_eq!(ev.target, Some(g));
}

#[test]
fn five_requests_one_repaint() {
    let mut scene: Scene = Scene::new();
    let r = scene.root();
    let a = unit_leaf(&mut scene, 0);
    scene.add_child(r, a).unwrap();
    let mut surface = ();
    let mut tasks = TaskQueue::new();
    let _ = scene.tick(&mut ctx(&mut surface), &mut tasks);
    let before = scene.scheduler().stats();

    for _ in 0..5 {
        scene.request_render();
    }
    assert_eq!(scene.scheduler().stats().scheduled, before.scheduled + 1);
    let report = scene.tick(&mut ctx(&mut surface), &mut tasks);
    assert_eq!(report.map(|r| r.painted), Some(1));
    assert!(scene.tick(&mut ctx(&mut surface), &mut tasks).is_none());
    assert_eq!(scene.scheduler().stats().passes, before.passes + 1);
}

#[test]
fn mutation_burst_is_one_repaint() {
    let mut scene: Scene = Scene::new();
    let r = scene.root();
    let layer = scene.create_container(NodeDesc::default());
    scene.add_child(r, layer).unwrap();
    for z in 0..20 {
        let id = unit_leaf(&mut scene, z % 3);
        scene.add_child(layer, id).unwrap();
        scene.set_z_index(id, z);
    }
    assert!(scene.scheduler().stats().requests > 20);
    assert_eq!(scene.scheduler().stats().scheduled, 1);

    let mut surface = ();
    let report = scene
        .tick(&mut ctx(&mut surface), &mut TaskQueue::new())
        .unwrap();
    assert_eq!(report.painted, 20);
}

#[test]
fn z_move_reorders_without_duplicates() {
    let mut scene: Scene = Scene::new();
    let c = scene.create_container(NodeDesc::default());
    let a = unit_leaf(&mut scene, 1);
    let b = unit_leaf(&mut scene, 2);
    scene.add_child(c, a).unwrap();
    scene.add_child(c, b).unwrap();

    scene.set_z_index(a, 10);
    assert_eq!(forward(&scene, c), [b, a]);
    assert_eq!(scene.z_index(a), Some(10));
    assert_eq!(scene.rank_count(c), 3, "emptied rank 1 persists");
}

#[test]
fn empty_container_hits_nothing_and_has_degenerate_bounds() {
    let mut scene: Scene = Scene::new();
    let c = scene.create_container(NodeDesc::default());
    for p in [Point::ORIGIN, Point::new(180.0, 90.0), Point::new(-1e9, 1e9)] {
        assert!(!scene.contain(c, p, None));
    }
    let bounds = scene.bounds(c).unwrap();
    assert_eq!(bounds, EMPTY_BOUNDS);
    assert_eq!((bounds.x0, bounds.y0), (180.0, 90.0));
    assert_eq!((bounds.x1, bounds.y1), (-180.0, -90.0));
}

#[test]
fn container_hit_matches_any_descendant() {
    let mut scene: Scene = Scene::new();
    let r = scene.root();
    let inner = scene.create_container(NodeDesc::default());
    let a = scene.create_leaf(
        KurboShape::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
        NodeDesc::default(),
    );
    let b = scene.create_leaf(
        KurboShape::new(Rect::new(20.0, 0.0, 30.0, 10.0)),
        NodeDesc::default(),
    );
    scene.add_child(r, inner).unwrap();
    scene.add_child(inner, a).unwrap();
    scene.add_child(r, b).unwrap();

    for x in [-5.0, 5.0, 15.0, 25.0, 35.0] {
        let p = Point::new(x, 5.0);
        let expected = scene.contain(a, p, None) || scene.contain(b, p, None);
        assert_eq!(scene.contain(r, p, None), expected, "x = {x}");
    }
}

/// Leaf whose drawing never finishes.
struct Stalled;

impl Shape for Stalled {
    fn contain(&self, _: Point, _: Option<Point>) -> bool {
        false
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 1.0, 1.0)
    }

    fn render(&self, _: &mut RenderContext<'_, ()>, _: &Style) -> Option<RenderTask> {
        Some(Box::pin(core::future::pending::<()>()))
    }
}

#[test]
fn stalled_leaf_does_not_block_siblings() {
    let mut scene: Scene = Scene::new();
    let r = scene.root();
    let slow = scene.create_leaf(Stalled, NodeDesc::z(0));
    let fast = unit_leaf(&mut scene, 1);
    scene.add_child(r, slow).unwrap();
    scene.add_child(r, fast).unwrap();

    let mut surface = ();
    let mut tasks = TaskQueue::new();
    let report = scene.repaint(&mut ctx(&mut surface), &mut tasks);
    assert_eq!(report.painted, 2);
    assert_eq!(report.spawned, 1);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].0, slow);

    // A second pass starts new work on top of the stale task.
    let _ = scene.repaint(&mut ctx(&mut surface), &mut tasks);
    assert_eq!(tasks.len(), 2);
}

#[test]
fn hidden_subtree_is_not_painted() {
    let mut scene: Scene = Scene::new();
    let r = scene.root();
    let layer = scene.create_container(NodeDesc::default());
    let a = unit_leaf(&mut scene, 0);
    let b = unit_leaf(&mut scene, 0);
    scene.add_child(r, layer).unwrap();
    scene.add_child(layer, a).unwrap();
    scene.add_child(r, b).unwrap();
    scene.hide(layer);

    let mut surface = ();
    let report = scene.repaint(&mut ctx(&mut surface), &mut TaskQueue::new());
    assert_eq!(report.painted, 1);
    assert_eq!(report.hidden, 1);
}

/// Leaf that records its label on a shared log when drawn.
struct Logged(&'static str, Rc<RefCell<Vec<&'static str>>>);

impl Shape for Logged {
    fn contain(&self, _: Point, _: Option<Point>) -> bool {
        false
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 1.0, 1.0)
    }

    fn render(&self, _: &mut RenderContext<'_, ()>, _: &Style) -> Option<RenderTask> {
        self.1.borrow_mut().push(self.0);
        None
    }
}

#[test]
fn bad_style_skips_only_its_own_subtree() {
    let mut scene: Scene = Scene::new();
    let r = scene.root();
    let drawn = Rc::new(RefCell::new(Vec::new()));
    let broken = scene.create_container(NodeDesc::z(0));
    let hidden_by_error = scene.create_leaf(Logged("inner", drawn.clone()), NodeDesc::z(0));
    let healthy = scene.create_leaf(Logged("healthy", drawn.clone()), NodeDesc::z(1));
    scene.add_child(broken, hidden_by_error).unwrap();
    scene.add_child(r, broken).unwrap();
    scene.add_child(r, healthy).unwrap();

    let mut nested = BTreeMap::new();
    nested.insert(
        String::from("cache"),
        StyleValue::Handle(ImageHandle::new(())),
    );
    scene.set_style(
        broken,
        Style::default().with_extra("icons", StyleValue::Map(nested)),
    );

    let mut surface = ();
    let report = scene
        .tick(&mut ctx(&mut surface), &mut TaskQueue::new())
        .unwrap();
    assert_eq!(*drawn.borrow(), ["healthy"]);
    assert_eq!(report.painted, 1);
    assert_eq!(
        report.failed,
        [RenderError::Style {
            node: broken,
            source: StyleError::NotClonable {
                key: "icons.cache".into()
            }
        }]
    );
    assert!(!scene.scheduler().is_dirty());
}

#[test]
fn fill_image_survives_render_copy() {
    let mut scene: Scene = Scene::new();
    let r = scene.root();
    let a = unit_leaf(&mut scene, 0);
    scene.add_child(r, a).unwrap();
    let decoded = ImageHandle::new(vec![0_u8; 4]);
    scene.set_style(
        a,
        Style {
            fill_image: Some(FillImage {
                source: "marker.png".into(),
                image: Some(decoded.clone()),
            }),
            ..Style::default()
        },
    );

    let seen = Rc::new(RefCell::new(None));
    let sink = seen.clone();
    scene.set_before_render(
        a,
        Some(Box::new(move |style: &mut Style| {
            *sink.borrow_mut() = style.fill_image.as_ref().and_then(|f| f.image.clone());
            ControlFlow::Continue(())
        })),
    );
    let mut surface = ();
    let _ = scene.repaint(&mut ctx(&mut surface), &mut TaskQueue::new());
    let copied = seen.borrow_mut().take().unwrap();
    assert!(ImageHandle::ptr_eq(&copied, &decoded));
}
