// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry kernel: the intersection predicates every query and insertion is built on.
//!
//! Boxes are [`Rect`]s with `x0`/`y0` as the minimum corner and `x1`/`y1` as the
//! maximum corner. Membership is half-open: the minimum edge is inside, the maximum
//! edge is outside. Splitting a box at its center with [`quadrants`] therefore puts
//! every point of the parent in exactly one child.
//!
//! Distances are compared squared, so nothing here needs `sqrt`.

use kurbo::{Circle, Point, Rect};

/// Whether `point` lies inside `rect` under the half-open rule.
#[inline]
pub fn box_contains_point(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x < rect.x1 && point.y >= rect.y0 && point.y < rect.y1
}

/// Whether `a` and `b` overlap.
///
/// `a` is treated as half-open and `b` as closed: the boxes are disjoint when
/// `a.max < b.min` or `a.min >= b.max` on either axis. When `a` is a node boundary
/// this keeps every box accepted by a parent accepted by at least one of its
/// [`quadrants`], including boxes with zero extent lying on a split line.
#[inline]
pub fn box_intersects_box(a: Rect, b: Rect) -> bool {
    !(a.x1 < b.x0 || a.x0 >= b.x1 || a.y1 < b.y0 || a.y0 >= b.y1)
}

/// Whether two boxes share interior area.
///
/// Symmetric and strict: boxes that only share an edge or a corner do not overlap.
/// This is the box test between shapes; [`box_intersects_box`] is the one for
/// node boundaries.
#[inline]
pub fn box_overlaps_box(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Whether `a` and `b` touch, with both boxes closed.
///
/// Used to prune queries, where a node must be visited whenever the probe reaches
/// any of its edges.
#[inline]
pub fn box_touches_box(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Whether `point` lies inside `rect` or on any of its edges.
#[inline]
pub fn box_touches_point(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Whether `circle` overlaps `rect`.
///
/// The circle center is clamped into the box to find the closest point, and the
/// distance to it must be strictly less than the radius; a tangent circle does not
/// overlap.
#[inline]
pub fn box_intersects_circle(rect: Rect, circle: Circle) -> bool {
    let closest = Point::new(
        circle.center.x.clamp(rect.x0, rect.x1),
        circle.center.y.clamp(rect.y0, rect.y1),
    );
    (closest - circle.center).hypot2() < circle.radius * circle.radius
}

/// Whether two circles overlap: center distance strictly less than the sum of radii.
#[inline]
pub fn circle_intersects_circle(a: Circle, b: Circle) -> bool {
    let reach = a.radius + b.radius;
    (a.center - b.center).hypot2() < reach * reach
}

/// Whether `point` lies strictly inside `circle`.
#[inline]
pub fn circle_contains_point(circle: Circle, point: Point) -> bool {
    (point - circle.center).hypot2() < circle.radius * circle.radius
}

/// Midpoint of `rect`; the split point used by subdivision.
#[inline]
pub fn box_center(rect: Rect) -> Point {
    Point::new(
        rect.x0 + (rect.x1 - rect.x0) / 2.0,
        rect.y0 + (rect.y1 - rect.y0) / 2.0,
    )
}

/// Split `rect` at its center into four quadrants, ordered NW, NE, SW, SE.
///
/// With kurbo's y-down convention NW is the quadrant containing the minimum corner.
/// The quadrants share edges but, under the half-open rule, never a point.
pub fn quadrants(rect: Rect) -> [Rect; 4] {
    let c = box_center(rect);
    [
        Rect::new(rect.x0, rect.y0, c.x, c.y),
        Rect::new(c.x, rect.y0, rect.x1, c.y),
        Rect::new(rect.x0, c.y, c.x, rect.y1),
        Rect::new(c.x, c.y, rect.x1, rect.y1),
    ]
}

/// Whether `rect` can serve as a node boundary: finite, with `min < max` on both axes.
///
/// NaN coordinates fail the comparison and are rejected too.
#[inline]
pub fn is_valid_boundary(rect: Rect) -> bool {
    rect.is_finite() && rect.x0 < rect.x1 && rect.y0 < rect.y1
}

/// Whether splitting `rect` at its center yields four non-empty quadrants.
///
/// Fails once a box has shrunk to a couple of ulps, where the computed center
/// collapses onto an edge.
#[inline]
pub(crate) fn splits_cleanly(rect: Rect) -> bool {
    let c = box_center(rect);
    rect.x0 < c.x && c.x < rect.x1 && rect.y0 < c.y && c.y < rect.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_point_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(box_contains_point(r, Point::new(0.0, 0.0)));
        assert!(box_contains_point(r, Point::new(9.999, 5.0)));
        assert!(!box_contains_point(r, Point::new(10.0, 5.0)));
        assert!(!box_contains_point(r, Point::new(5.0, 10.0)));
        assert!(!box_contains_point(r, Point::new(-0.001, 5.0)));
    }

    #[test]
    fn quadrants_partition_every_point_exactly_once() {
        let r = Rect::new(-3.0, 2.0, 13.0, 9.0);
        let q = quadrants(r);
        // Sample a lattice that includes the split lines and the min edges.
        for i in 0..=32 {
            for j in 0..=14 {
                let p = Point::new(-3.0 + f64::from(i) * 0.5, 2.0 + f64::from(j) * 0.5);
                let inside_parent = box_contains_point(r, p);
                let hits = q.iter().filter(|c| box_contains_point(**c, p)).count();
                assert_eq!(hits, usize::from(inside_parent), "point {p:?}");
            }
        }
    }

    #[test]
    fn quadrant_order_is_nw_ne_sw_se() {
        let [nw, ne, sw, se] = quadrants(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(nw, Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(ne, Rect::new(50.0, 0.0, 100.0, 50.0));
        assert_eq!(sw, Rect::new(0.0, 50.0, 50.0, 100.0));
        assert_eq!(se, Rect::new(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn box_overlap_treats_first_box_as_half_open() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(box_intersects_box(a, Rect::new(5.0, 5.0, 15.0, 15.0)));
        assert!(!box_intersects_box(a, Rect::new(11.0, 0.0, 15.0, 10.0)));
        // A box starting on a's max edge counts as touching.
        assert!(box_intersects_box(a, Rect::new(10.0, 0.0, 15.0, 10.0)));
        // A box ending on a's min edge does not.
        assert!(!box_intersects_box(a, Rect::new(-5.0, 0.0, 0.0, 10.0)));
    }

    #[test]
    fn shape_box_overlap_is_symmetric_and_ignores_shared_edges() {
        let a = Rect::new(10.0, 10.0, 20.0, 20.0);
        let right = Rect::new(20.0, 10.0, 30.0, 20.0);
        let corner = Rect::new(20.0, 20.0, 30.0, 30.0);
        let inside = Rect::new(19.0, 19.0, 25.0, 25.0);
        for b in [right, corner] {
            assert!(!box_overlaps_box(a, b), "{b:?}");
            assert!(!box_overlaps_box(b, a), "{b:?}");
        }
        assert!(box_overlaps_box(a, inside) && box_overlaps_box(inside, a));
        // The node-boundary form keeps its one-sided rule.
        assert!(box_intersects_box(a, right));
        assert!(!box_intersects_box(right, Rect::new(10.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn touching_includes_every_edge() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(box_touches_box(r, Rect::new(-5.0, 0.0, 0.0, 10.0)));
        assert!(box_touches_box(r, Rect::new(10.0, 10.0, 12.0, 12.0)));
        assert!(!box_touches_box(r, Rect::new(10.5, 0.0, 12.0, 10.0)));
        assert!(box_touches_point(r, Point::new(10.0, 10.0)));
        assert!(box_touches_point(r, Point::new(0.0, 5.0)));
        assert!(!box_touches_point(r, Point::new(-0.1, 5.0)));
    }

    #[test]
    fn zero_width_box_on_split_line_lands_in_a_quadrant() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        let sliver = Rect::new(50.0, 10.0, 50.0, 20.0);
        assert!(box_intersects_box(r, sliver));
        assert!(quadrants(r).iter().any(|q| box_intersects_box(*q, sliver)));
    }

    #[test]
    fn circle_box_overlap_is_strict() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(box_intersects_circle(r, Circle::new((5.0, 5.0), 1.0)));
        assert!(box_intersects_circle(r, Circle::new((12.0, 5.0), 2.5)));
        // Tangent to the right edge.
        assert!(!box_intersects_circle(r, Circle::new((12.0, 5.0), 2.0)));
        // Near a corner but outside it.
        assert!(!box_intersects_circle(r, Circle::new((12.0, 12.0), 2.5)));
    }

    #[test]
    fn circle_circle_overlap_matches_reference_distances() {
        let a = Circle::new((10.0, 10.0), 5.0);
        assert!(circle_intersects_circle(a, Circle::new((13.0, 10.0), 3.0)));
        assert!(!circle_intersects_circle(a, Circle::new((20.0, 10.0), 3.0)));
        // Exactly touching.
        assert!(!circle_intersects_circle(a, Circle::new((18.0, 10.0), 3.0)));
    }

    #[test]
    fn boundary_validation_rejects_degenerate_boxes() {
        assert!(is_valid_boundary(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(!is_valid_boundary(Rect::new(0.0, 0.0, 0.0, 1.0)));
        assert!(!is_valid_boundary(Rect::new(1.0, 0.0, 0.0, 1.0)));
        assert!(!is_valid_boundary(Rect::new(0.0, 0.0, f64::NAN, 1.0)));
        assert!(!is_valid_boundary(Rect::new(
            0.0,
            0.0,
            f64::INFINITY,
            1.0
        )));
    }

    #[test]
    fn tiny_boxes_stop_splitting() {
        assert!(splits_cleanly(Rect::new(0.0, 0.0, 1.0, 1.0)));
        let x = 1.0_f64;
        let next = f64::from_bits(x.to_bits() + 1);
        assert!(!splits_cleanly(Rect::new(x, x, next, next)));
    }
}
