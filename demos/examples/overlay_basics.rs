// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay basics.
//!
//! Builds a two-layer overlay (areas below, pins above), routes a few pointer events
//! through a pointer gate, and drives the repaint scheduler with a manual tick.
//! One pin draws asynchronously; its task is collected and not awaited by the pass.
//!
//! Run:
//! - `cargo run -p strata_demos --example overlay_basics`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use peniko::Color;
use strata_events::PointerGate;
use strata_scene::{
    KurboShape, NodeDesc, PointerEvent, RenderContext, RenderTask, Scene, Shape, Style,
    TaskQueue,
};

/// A text "surface": one line per drawn leaf.
type Log = Vec<String>;

/// A square pin centered on a coordinate.
struct Pin {
    label: &'static str,
    at: Point,
    slow: bool,
}

impl Pin {
    fn rect(&self) -> Rect {
        Rect::from_center_size(self.at, (0.2, 0.2))
    }
}

impl Shape<Log> for Pin {
    fn contain(&self, position: Point, _pixel: Option<Point>) -> bool {
        self.rect().contains(position)
    }

    fn bounds(&self) -> Rect {
        self.rect()
    }

    fn render(&self, ctx: &mut RenderContext<'_, Log>, style: &Style) -> Option<RenderTask> {
        ctx.surface.push(format!(
            "pin {} at {:?} stroke {:?}",
            self.label, self.at, style.stroke_color
        ));
        // Pretend the icon still has to be decoded.
        self.slow.then(|| -> RenderTask { Box::pin(async {}) })
    }
}

fn main() {
    let mut scene: Scene<Log> = Scene::new();
    let root = scene.root();

    let armed = Rc::new(Cell::new(0));
    let hook = armed.clone();
    scene
        .scheduler_mut()
        .set_on_schedule(move || hook.set(hook.get() + 1));

    let areas = scene.create_container(NodeDesc::z(0).named("areas"));
    let pins = scene.create_container(NodeDesc::z(1).named("pins"));
    let district = scene.create_leaf(
        KurboShape::new(Rect::new(116.0, 39.5, 117.0, 40.5)),
        NodeDesc::default().named("district"),
    );
    let depot = scene.create_leaf(
        Pin {
            label: "depot",
            at: Point::new(116.4, 40.0),
            slow: false,
        },
        NodeDesc::default(),
    );
    let store = scene.create_leaf(
        Pin {
            label: "store",
            at: Point::new(116.8, 39.7),
            slow: true,
        },
        NodeDesc::z(2),
    );
    if let Some(style) = scene.style_mut(store) {
        style.stroke_color = Color::from_rgba8(200, 30, 30, 255);
    }

    scene.add_child(areas, district).unwrap();
    scene.set_children(pins, &[depot, store]).unwrap();
    scene.set_children(root, &[areas, pins]).unwrap();
    println!("scheduled ticks after building: {}", armed.get());

    for id in [district, depot, store] {
        scene.on(id, "click", move |ev| {
            println!("  leaf {:?} clicked at {:?}", id, ev.position);
        });
    }
    scene.on(pins, "click", |ev| println!("  pins layer saw {:?}", ev.target));
    scene.on_unhandled("click", |ev| println!("  nothing at {:?}", ev.position));

    let mut gate = PointerGate::new();
    let presses = [
        (Point::new(116.4, 40.0), 0, 80),
        (Point::new(116.2, 40.3), 1_000, 1_050),
        (Point::new(116.8, 39.7), 2_000, 2_900),
        (Point::new(10.0, 10.0), 3_000, 3_010),
    ];
    for (position, down, up) in presses {
        gate.on_down(down);
        gate.on_up();
        println!("click at {position:?}, held {} ms", up - down);
        if !gate.admit("click", up) {
            println!("  suppressed (drag)");
            continue;
        }
        scene.dispatch("click", &mut PointerEvent::new(position));
    }

    let mut surface = Log::new();
    let mut tasks = TaskQueue::new();
    let view = Rect::new(116.0, 39.5, 117.0, 40.5);
    let mut ctx = RenderContext::new(&mut surface, view, 2.0);
    match scene.tick(&mut ctx, &mut tasks) {
        Some(report) => {
            println!("tick: {report:?}");
            for err in &report.failed {
                println!("  skipped: {err}");
            }
        }
        None => println!("tick: nothing to do"),
    }
    println!("{} task(s) left running", tasks.len());
    for line in &surface {
        println!("  {line}");
    }
}
