// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Circle, Point, Rect, Size, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use understory_quadtree::{Body, Bounded, GrowBuffer, Overlaps, Quadtree};

const WORLD: Rect = Rect::new(0.0, 0.0, 1024.0, 1024.0);
const SEED: u64 = 0xCAFE_F00D_DEAD_BEEF;
const SIZES: [usize; 3] = [1_000, 5_000, 20_000];

fn gen_points(rng: &mut StdRng, count: usize) -> Vec<Point> {
    (0..count)
        .map(|_| {
            Point::new(
                rng.random_range(WORLD.x0..WORLD.x1),
                rng.random_range(WORLD.y0..WORLD.y1),
            )
        })
        .collect()
}

fn gen_rects(rng: &mut StdRng, count: usize) -> Vec<Rect> {
    gen_points(rng, count)
        .into_iter()
        .map(|c| Rect::from_center_size(c, Size::new(rng.random_range(2.0..12.0), 6.0)))
        .collect()
}

fn gen_circles(rng: &mut StdRng, count: usize) -> Vec<Circle> {
    gen_points(rng, count)
        .into_iter()
        .map(|c| Circle::new(c, rng.random_range(1.0..6.0)))
        .collect()
}

fn gen_bodies(rng: &mut StdRng, count: usize) -> Vec<Body<Circle>> {
    gen_circles(rng, count)
        .into_iter()
        .map(|c| {
            let v = Vec2::new(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0));
            Body::new(c, v)
        })
        .collect()
}

/// One frame: clear, insert everything, query every entity against the rest.
fn cycle<'a, E, Q>(
    tree: &mut Quadtree<'a, E>,
    items: &'a [E],
    probes: &[Q],
    out: &mut GrowBuffer<&'a E>,
) where
    E: Bounded,
    Q: Bounded + Overlaps<E>,
{
    tree.clear();
    tree.insert_batch(items).unwrap();
    let mut total = 0;
    for probe in probes {
        out.clear();
        tree.query(probe, out);
        total += out.len();
    }
    black_box(total);
}

fn bench_cycles<E, F>(c: &mut Criterion, name: &str, generate: F)
where
    E: Bounded + Overlaps<E>,
    F: Fn(&mut StdRng, usize) -> Vec<E>,
{
    let mut group = c.benchmark_group(name);
    for &n in &SIZES {
        let items = generate(&mut StdRng::seed_from_u64(SEED), n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("clear_insert_query_n{n}"), |b| {
            let mut tree: Quadtree<'_, E> = Quadtree::new(WORLD).unwrap();
            let mut out = GrowBuffer::new();
            b.iter(|| cycle(&mut tree, &items, &items, &mut out));
        });
        group.bench_function(format!("fresh_tree_n{n}"), |b| {
            b.iter_batched(
                || Quadtree::<'_, E>::new(WORLD).unwrap(),
                |mut tree| {
                    tree.insert_batch(&items).unwrap();
                    tree
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_points(c: &mut Criterion) {
    // Points never overlap each other in practice; probe them with small ranges.
    let mut group = c.benchmark_group("points");
    for &n in &SIZES {
        let mut rng = StdRng::seed_from_u64(SEED);
        let points = gen_points(&mut rng, n);
        let ranges: Vec<Rect> = points
            .iter()
            .map(|p| Rect::from_center_size(*p, (16.0, 16.0)))
            .collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("clear_insert_query_n{n}"), |b| {
            let mut tree: Quadtree<'_, Point> = Quadtree::new(WORLD).unwrap();
            let mut out = GrowBuffer::new();
            b.iter(|| cycle(&mut tree, &points, &ranges, &mut out));
        });
    }
    group.finish();
}

fn bench_rects(c: &mut Criterion) {
    bench_cycles(c, "rects", gen_rects);
}

fn bench_circles(c: &mut Criterion) {
    bench_cycles(c, "circles", gen_circles);
}

fn bench_bodies(c: &mut Criterion) {
    bench_cycles(c, "bodies", gen_bodies);
}

/// The all-pairs scan the tree replaces, at the smallest size only.
fn bench_brute_force(c: &mut Criterion) {
    let mut group = c.benchmark_group("brute_force");
    let n = SIZES[0];
    let circles = gen_circles(&mut StdRng::seed_from_u64(SEED), n);
    group.throughput(Throughput::Elements(n as u64));
    group.bench_function(format!("circles_n{n}"), |b| {
        b.iter(|| {
            let mut total = 0_usize;
            for (i, a) in circles.iter().enumerate() {
                for (j, other) in circles.iter().enumerate() {
                    if i != j && a.overlaps(other) {
                        total += 1;
                    }
                }
            }
            black_box(total)
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_points,
    bench_rects,
    bench_circles,
    bench_bodies,
    bench_brute_force
);
criterion_main!(benches);
