// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree basics.
//!
//! Build point and circle trees over a 100×100 world and run a few overlap queries.
//!
//! Run:
//! - `cargo run -p understory_examples --example basics`

use kurbo::{Circle, Point, Rect};
use understory_quadtree::{CircleTree, GrowBuffer, PointTree, Quadtree, QuadtreeError};

fn main() -> Result<(), QuadtreeError> {
    let world = Rect::new(0.0, 0.0, 100.0, 100.0);

    // Two coincident points and one far away.
    let points = [
        Point::new(1.0, 1.0),
        Point::new(1.0, 1.0),
        Point::new(50.0, 50.0),
    ];
    let far_corner = Point::new(100.0, 100.0);
    let mut tree: PointTree<'_> = Quadtree::new(world)?;
    let inserted = tree.insert_batch(&points)?;
    println!("inserted {inserted} points");

    let range = Rect::new(0.0, 0.0, 2.0, 2.0);
    let mut hits = GrowBuffer::new();
    tree.query(&range, &mut hits);
    println!("points in {range:?}: {:?}", hits.as_slice());
    assert_eq!(hits.len(), 2);

    // A point on the far edge of the world is outside the half-open boundary.
    assert!(!tree.insert(&far_corner)?);

    let circles = [
        Circle::new((10.0, 10.0), 5.0),
        Circle::new((13.0, 10.0), 3.0),
        Circle::new((20.0, 10.0), 3.0),
    ];
    let mut tree: CircleTree<'_> = Quadtree::new(world)?;
    tree.insert_batch(&circles)?;
    for (i, circle) in circles.iter().enumerate() {
        let others: Vec<usize> = tree
            .query_iter(circle)
            .filter_map(|hit| circles.iter().position(|c| core::ptr::eq(c, hit)))
            .collect();
        println!("circle {i} overlaps {others:?}");
    }

    println!("{tree:?}");
    Ok(())
}
