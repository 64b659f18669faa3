// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::ControlFlow;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use strata_rank::{Order, RankedIndex};
use strata_scene::{KurboShape, NodeDesc, NodeId, RenderContext, Scene, TaskQueue};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 32) as u32
    }

    fn rank(&mut self, spread: u32) -> i32 {
        (self.next_u32() % spread) as i32
    }
}

/// One layer of `n` unit squares with z-indices drawn from `0..spread`.
fn build_scene(n: usize, spread: u32) -> (Scene, NodeId) {
    let mut scene = Scene::new();
    let root = scene.root();
    let layer = scene.create_container(NodeDesc::default());
    scene.add_child(root, layer).unwrap();
    let mut rng = Rng::new(0x5eed);
    for i in 0..n {
        let x = (i % 100) as f64;
        let y = (i / 100) as f64;
        let leaf = scene.create_leaf(
            KurboShape::new(Rect::new(x, y, x + 1.0, y + 1.0)),
            NodeDesc::z(rng.rank(spread)),
        );
        scene.add_child(layer, leaf).unwrap();
    }
    (scene, layer)
}

fn bench_ranked(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranked");
    for &n in &[1_000usize, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("insert_n{n}_spread16"), |b| {
            b.iter_batched(
                || Rng::new(7),
                |mut rng| {
                    let mut idx = RankedIndex::new();
                    for i in 0..n {
                        idx.insert(rng.rank(16), i);
                    }
                    black_box(idx.len());
                },
                BatchSize::SmallInput,
            )
        });

        let mut idx = RankedIndex::new();
        let mut rng = Rng::new(7);
        for i in 0..n {
            idx.insert(rng.rank(16), i);
        }
        group.bench_function(format!("walk_descending_n{n}"), |b| {
            b.iter(|| {
                let mut sum = 0usize;
                let _ = idx.for_each(Order::Descending, |k| {
                    sum += *k;
                    ControlFlow::Continue(())
                });
                black_box(sum);
            })
        });
    }
    group.finish();
}

fn bench_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene");
    for &n in &[1_000usize, 10_000] {
        let (mut scene, layer) = build_scene(n, 16);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("each_children_mut_n{n}"), |b| {
            b.iter(|| {
                let mut seen = 0usize;
                let _ = scene.each_children_mut(layer, Order::Ascending, |_, _| {
                    seen += 1;
                    ControlFlow::<()>::Continue(())
                });
                black_box(seen);
            })
        });
        group.bench_function(format!("repaint_n{n}"), |b| {
            let mut surface = ();
            let mut tasks = TaskQueue::new();
            b.iter(|| {
                let mut ctx =
                    RenderContext::new(&mut surface, Rect::new(-180.0, -90.0, 180.0, 90.0), 1.0);
                let report = scene.repaint(&mut ctx, &mut tasks);
                black_box(report.painted);
            })
        });
        group.bench_function(format!("bounds_cold_n{n}"), |b| {
            b.iter_batched(
                || build_scene(n, 16),
                |(scene, layer)| black_box(scene.bounds(layer)),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ranked, bench_scene);
criterion_main!(benches);
