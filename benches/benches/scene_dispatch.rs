// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use strata_scene::{KurboShape, NodeDesc, PointerEvent, Scene};

/// `layers` containers, each holding an `n` by `n` grid of 10-unit squares.
fn build_grid(layers: usize, n: usize) -> Scene {
    let mut scene = Scene::new();
    let root = scene.root();
    for l in 0..layers {
        let layer = scene.create_container(NodeDesc::z(l as i32));
        scene.add_child(root, layer).unwrap();
        for y in 0..n {
            for x in 0..n {
                let x0 = x as f64 * 10.0;
                let y0 = y as f64 * 10.0;
                let leaf = scene.create_leaf(
                    KurboShape::new(Rect::new(x0, y0, x0 + 10.0, y0 + 10.0)),
                    NodeDesc::z(((x + y) % 4) as i32),
                );
                scene.add_child(layer, leaf).unwrap();
                let _ = scene.on(leaf, "click", |ev| {
                    black_box(ev.target);
                });
            }
        }
        let _ = scene.on(layer, "click", |ev| {
            black_box(ev.current);
        });
    }
    scene
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    for &n in &[16usize, 64] {
        let mut scene = build_grid(4, n);
        group.throughput(Throughput::Elements(1));
        group.bench_function(format!("hit_first_n{n}"), |b| {
            b.iter(|| {
                let mut ev = PointerEvent::new(Point::new(5.0, 5.0));
                black_box(scene.dispatch("click", &mut ev));
            })
        });
        let far = n as f64 * 10.0 + 50.0;
        group.bench_function(format!("miss_n{n}"), |b| {
            b.iter(|| {
                let mut ev = PointerEvent::new(Point::new(far, far));
                black_box(scene.dispatch("click", &mut ev));
            })
        });
        let root = scene.root();
        group.bench_function(format!("contain_last_n{n}"), |b| {
            let p = Point::new(n as f64 * 10.0 - 5.0, n as f64 * 10.0 - 5.0);
            b.iter(|| black_box(scene.contain(root, p, None)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
