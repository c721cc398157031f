// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Quadtree: an arena-backed 2D quadtree for broad-phase overlap queries.
//!
//! The tree indexes borrowed entities (points, rectangles, circles, moving bodies, or
//! your own types) inside a fixed world rectangle and answers "what overlaps this
//! shape?" without testing every pair.
//!
//! - Nodes live in one growable array and refer to their four children by index,
//!   so storage can double without invalidating any link.
//! - Each node holds up to `N` entity references inline. A full leaf splits on the
//!   next insertion that the split would separate from its residents; entities with
//!   extent go to every quadrant they overlap.
//! - Queries prune whole subtrees whose boundary the probe misses, and never report
//!   the probe itself (by identity, not by value).
//! - The intended rhythm is one rebuild per frame: clear, insert everything, then
//!   query as much as needed. Clearing keeps the allocated storage.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Circle, Point, Rect};
//! use understory_quadtree::{CircleTree, GrowBuffer, PointTree, Quadtree};
//!
//! let world = Rect::new(0.0, 0.0, 100.0, 100.0);
//!
//! let points = [Point::new(1.0, 1.0), Point::new(1.0, 1.0), Point::new(50.0, 50.0)];
//! let mut tree: PointTree<'_> = Quadtree::new(world).unwrap();
//! tree.insert_batch(&points).unwrap();
//!
//! let mut hits = GrowBuffer::new();
//! tree.query(&Rect::new(0.0, 0.0, 2.0, 2.0), &mut hits);
//! assert_eq!(hits.len(), 2);
//!
//! let circles = [
//!     Circle::new((10.0, 10.0), 5.0),
//!     Circle::new((13.0, 10.0), 3.0),
//!     Circle::new((20.0, 10.0), 3.0),
//! ];
//! let mut tree: CircleTree<'_> = Quadtree::new(world).unwrap();
//! tree.insert_batch(&circles).unwrap();
//!
//! // A stored circle used as the probe never reports itself.
//! let near: Vec<_> = tree.query_iter(&circles[0]).collect();
//! assert_eq!(near, [&circles[1]]);
//! ```
//!
//! ## Boundary rules
//!
//! Node boundaries are half-open: a point on a shared edge belongs to the node on the
//! right or below. A point on the far edge of the world is outside the tree and is
//! not inserted. Shape tests are strict and symmetric: circles that only touch, and
//! rectangles that only share an edge, do not overlap.
//!
//! Queries see node boundaries as closed, so a query shape reaching the world from
//! outside finds what it overlaps on the world edge. Overlaps lying entirely outside
//! the world are not searched for.
//!
//! ## Duplicates
//!
//! A rectangle or circle crossing a split line is stored in each node it overlaps.
//! [`Quadtree::query`] may report such an entity once per node the probe also
//! reaches; [`Quadtree::query_unique`] and [`Quadtree::query_iter`] report it once.
//!
//! ## Custom entities
//!
//! Implement [`Bounded`] for your entity type and [`Overlaps`] for each probe type
//! you want to query with. [`Body`] shows the pattern for a shape that carries extra
//! data.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod arena;
pub mod buffer;
pub mod config;
pub mod error;
pub mod geometry;
pub mod shape;
pub mod tree;

pub use buffer::GrowBuffer;
pub use config::QuadtreeConfig;
pub use error::QuadtreeError;
pub use shape::{Body, Bounded, Overlaps, Shape};
pub use tree::{BodyTree, CircleTree, DEFAULT_NODE_CAPACITY, PointTree, Quadtree, RectTree};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use kurbo::{Circle, Point, Rect, Vec2};

    const WORLD: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    #[test]
    fn frame_cycle_with_bodies() {
        let mut bodies: Vec<Body<Circle>> = (0..40)
            .map(|i| {
                let x = 12.0 + f64::from(i % 8) * 10.0;
                let y = 12.0 + f64::from(i / 8) * 15.0;
                Body::new(Circle::new((x, y), 2.0), Vec2::new(4.0, 0.0))
            })
            .collect();

        let mut tree: BodyTree<'_, Circle> = Quadtree::new(WORLD).unwrap();
        tree.insert_batch(&bodies).unwrap();
        let overlapping = bodies.iter().filter(|b| tree.query_iter(*b).next().is_some());
        assert_eq!(overlapping.count(), 0, "grid spacing keeps bodies apart");

        let mut tree = tree.recycle();
        for b in &mut bodies {
            b.advance(0.5);
        }
        tree.insert_batch(&bodies).unwrap();
        let probe = Rect::new(10.0, 10.0, 20.0, 20.0);
        let moved: Vec<Point> = tree.query_iter(&probe).map(|b| b.position()).collect();
        assert_eq!(moved, [Point::new(14.0, 12.0)]);
    }

    #[test]
    fn custom_node_capacity() {
        let points: Vec<Point> = (0..20)
            .map(|i| Point::new(5.0 + f64::from(i) * 4.0, 50.0))
            .collect();
        let mut small: Quadtree<'_, Point, 2> = Quadtree::new(WORLD).unwrap();
        let mut large: Quadtree<'_, Point, 64> = Quadtree::new(WORLD).unwrap();
        small.insert_batch(&points).unwrap();
        large.insert_batch(&points).unwrap();
        assert!(small.node_count() > 1);
        assert_eq!(large.node_count(), 1);
        let probe = Rect::new(0.0, 40.0, 30.0, 60.0);
        assert_eq!(small.query_iter(&probe).count(), 7);
        assert_eq!(large.query_iter(&probe).count(), 7);
    }
}
