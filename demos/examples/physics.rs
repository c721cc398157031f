// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless circle physics on top of the quadtree.
//!
//! Every frame rebuilds the tree from the current bodies, then queries it from
//! several threads at once, each handling its own slice of bodies with its own
//! result buffer. Collision responses are written to a copy of the bodies so the
//! frozen tree never sees a mutation.
//!
//! Run:
//! - `cargo run -p understory_examples --example physics --release`
//!
//! Set `RUST_LOG=debug` to see node storage growth.

use std::thread;
use std::time::Instant;

use kurbo::{Circle, Point, Rect, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_quadtree::{Body, BodyTree, GrowBuffer, Quadtree, QuadtreeError};

const WORLD: Rect = Rect::new(0.0, 0.0, 800.0, 800.0);
const BODY_COUNT: usize = 5000;
const BODY_RADIUS: f64 = 2.5;
const VELOCITY_RANGE: f64 = 100.0;
const FRAMES: usize = 100;
const DT: f64 = 1.0 / 60.0;

fn spawn_bodies(rng: &mut StdRng) -> Vec<Body<Circle>> {
    (0..BODY_COUNT)
        .map(|_| {
            let center = Point::new(
                rng.random_range(WORLD.x0..WORLD.x1),
                rng.random_range(WORLD.y0..WORLD.y1),
            );
            let velocity = Vec2::new(
                (rng.random::<f64>() - 0.5) * VELOCITY_RANGE,
                (rng.random::<f64>() - 0.5) * VELOCITY_RANGE,
            );
            Body::new(Circle::new(center, BODY_RADIUS), velocity)
        })
        .collect()
}

/// Velocity change for `body` given everything it currently overlaps.
///
/// Contacts are averaged into one. If the body is closing on that contact, the
/// part of the relative velocity along the contact normal is added to its own.
fn collision_response(body: &Body<Circle>, contacts: &[&Body<Circle>]) -> Vec2 {
    if contacts.is_empty() {
        return Vec2::ZERO;
    }
    let n = contacts.len() as f64;
    let (position_sum, velocity_sum) = contacts.iter().fold(
        (Vec2::ZERO, Vec2::ZERO),
        |(p, v), other| (p + other.position().to_vec2(), v + (other.velocity - body.velocity)),
    );
    let relative_velocity = velocity_sum / n;
    let offset = position_sum / n - body.position().to_vec2();
    if offset.dot(relative_velocity) >= 0.0 {
        return Vec2::ZERO;
    }
    let tangent = Vec2::new(-offset.y, offset.x);
    let length = tangent.hypot();
    if length == 0.0 {
        return Vec2::ZERO;
    }
    let tangent = tangent / length;
    relative_velocity - tangent * relative_velocity.dot(tangent)
}

/// Query `current` against the tree and write the integrated result into `future`.
///
/// Returns the number of contacts seen.
fn step_slice<'a>(
    tree: &BodyTree<'a, Circle>,
    current: &'a [Body<Circle>],
    future: &mut [Body<Circle>],
) -> usize {
    let mut contacts = GrowBuffer::new();
    let mut total = 0;
    for (body, next) in current.iter().zip(future) {
        contacts.clear();
        tree.query(body, &mut contacts);
        total += contacts.len();
        next.velocity += collision_response(body, &contacts);
        next.advance(DT);
    }
    total
}

fn main() -> Result<(), QuadtreeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut rng = StdRng::seed_from_u64(0);
    let mut bodies = spawn_bodies(&mut rng);
    let mut future = bodies.clone();
    let workers = thread::available_parallelism().map_or(4, |n| n.get());
    let slice_len = BODY_COUNT.div_ceil(workers);
    info!(bodies = BODY_COUNT, workers, "starting simulation");

    let mut tree: BodyTree<'_, Circle> = Quadtree::new(WORLD)?;
    let run_start = Instant::now();
    for frame in 0..FRAMES {
        let frame_start = Instant::now();
        let mut tree_frame = tree.recycle();
        let inserted = tree_frame.insert_batch(&bodies)?;
        let build_time = frame_start.elapsed();

        let frozen = &tree_frame;
        let collisions: usize = thread::scope(|s| {
            let handles: Vec<_> = bodies
                .chunks(slice_len)
                .zip(future.chunks_mut(slice_len))
                .map(|(current, next)| s.spawn(move || step_slice(frozen, current, next)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .sum()
        });

        info!(
            frame,
            inserted,
            nodes = tree_frame.node_count(),
            collisions,
            build_us = build_time.as_micros() as u64,
            frame_us = frame_start.elapsed().as_micros() as u64,
            "frame done"
        );
        tree = tree_frame.recycle();
        bodies.copy_from_slice(&future);
    }
    info!(
        frames = FRAMES,
        total_ms = run_start.elapsed().as_millis() as u64,
        "simulation finished"
    );
    Ok(())
}
