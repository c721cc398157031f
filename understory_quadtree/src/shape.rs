// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape capabilities and the entity kinds the tree can store.
//!
//! The tree is generic over the stored entity type `E` and the probe type `Q`, and
//! needs exactly two things from them:
//!
//! - [`Bounded`]: whether a shape overlaps a node boundary. Insertion uses it on the
//!   entity to pick nodes; queries use its closed form on the probe to prune subtrees.
//! - [`Overlaps`]: whether a probe intersects a stored entity. Every pair is
//!   symmetric: `a.overlaps(&b) == b.overlaps(&a)`.
//!
//! `Rect` has an inherent `overlaps(Rect)` in kurbo with a different rule, so calls
//! on a `Rect` receiver go through the trait path.
//!
//! Both are implemented for every pair of [`Point`], [`Rect`] and [`Circle`], for
//! [`Body`] (a shape with a velocity), and for the closed [`Shape`] enum.

use core::ops::Add;

use kurbo::{Circle, Point, Rect, Size, Vec2};

use crate::geometry::{
    box_contains_point, box_intersects_box, box_intersects_circle, box_overlaps_box,
    box_touches_box, box_touches_point, circle_contains_point, circle_intersects_circle,
};

/// A shape that can be tested against a node boundary.
pub trait Bounded {
    /// Whether this shape overlaps `boundary`.
    ///
    /// Must be consistent with [`quadrants`](crate::geometry::quadrants): a shape
    /// overlapping a boundary overlaps at least one of its quadrants.
    fn overlaps_boundary(&self, boundary: Rect) -> bool;

    /// Whether this shape reaches `boundary` with every edge of `boundary` closed.
    ///
    /// Queries prune with this. It must hold wherever
    /// [`overlaps_boundary`](Self::overlaps_boundary) holds, and also for a query
    /// shape that only reaches the minimum edges, where an overlapping neighbor may
    /// be stored.
    #[inline]
    fn touches_boundary(&self, boundary: Rect) -> bool {
        self.overlaps_boundary(boundary)
    }
}

/// A shape that can be tested against a stored `T`.
pub trait Overlaps<T: ?Sized> {
    /// Whether this shape intersects `other`.
    fn overlaps(&self, other: &T) -> bool;
}

impl Bounded for Point {
    #[inline]
    fn overlaps_boundary(&self, boundary: Rect) -> bool {
        box_contains_point(boundary, *self)
    }

    #[inline]
    fn touches_boundary(&self, boundary: Rect) -> bool {
        box_touches_point(boundary, *self)
    }
}

impl Bounded for Rect {
    #[inline]
    fn overlaps_boundary(&self, boundary: Rect) -> bool {
        box_intersects_box(boundary, *self)
    }

    #[inline]
    fn touches_boundary(&self, boundary: Rect) -> bool {
        box_touches_box(boundary, *self)
    }
}

impl Bounded for Circle {
    #[inline]
    fn overlaps_boundary(&self, boundary: Rect) -> bool {
        box_intersects_circle(boundary, *self)
    }
}

impl Overlaps<Self> for Point {
    #[inline]
    fn overlaps(&self, other: &Self) -> bool {
        self == other
    }
}

impl Overlaps<Rect> for Point {
    #[inline]
    fn overlaps(&self, other: &Rect) -> bool {
        box_contains_point(*other, *self)
    }
}

impl Overlaps<Circle> for Point {
    #[inline]
    fn overlaps(&self, other: &Circle) -> bool {
        circle_contains_point(*other, *self)
    }
}

impl Overlaps<Point> for Rect {
    #[inline]
    fn overlaps(&self, other: &Point) -> bool {
        box_contains_point(*self, *other)
    }
}

impl Overlaps<Self> for Rect {
    #[inline]
    fn overlaps(&self, other: &Self) -> bool {
        box_overlaps_box(*self, *other)
    }
}

impl Overlaps<Circle> for Rect {
    #[inline]
    fn overlaps(&self, other: &Circle) -> bool {
        box_intersects_circle(*self, *other)
    }
}

impl Overlaps<Point> for Circle {
    #[inline]
    fn overlaps(&self, other: &Point) -> bool {
        circle_contains_point(*self, *other)
    }
}

impl Overlaps<Rect> for Circle {
    #[inline]
    fn overlaps(&self, other: &Rect) -> bool {
        box_intersects_circle(*other, *self)
    }
}

impl Overlaps<Self> for Circle {
    #[inline]
    fn overlaps(&self, other: &Self) -> bool {
        circle_intersects_circle(*self, *other)
    }
}

/// A moving entity: a shape plus a velocity.
///
/// The tree only looks at `shape`; `velocity` is carried for the caller's
/// collision response and integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body<S> {
    /// Current shape in world space.
    pub shape: S,
    /// Velocity in units per second.
    pub velocity: Vec2,
}

impl<S> Body<S> {
    /// Create a body from a shape and a velocity.
    pub const fn new(shape: S, velocity: Vec2) -> Self {
        Self { shape, velocity }
    }
}

impl<S: Add<Vec2, Output = S> + Copy> Body<S> {
    /// Move the shape by `velocity * dt`.
    pub fn advance(&mut self, dt: f64) {
        self.shape = self.shape + self.velocity * dt;
    }
}

impl Body<Rect> {
    /// Rectangle body centered on `center`.
    pub fn from_center_size(center: Point, size: Size, velocity: Vec2) -> Self {
        Self::new(Rect::from_center_size(center, size), velocity)
    }

    /// Center of the rectangle.
    pub fn position(&self) -> Point {
        self.shape.center()
    }
}

impl Body<Circle> {
    /// Center of the circle.
    pub fn position(&self) -> Point {
        self.shape.center
    }
}

impl<S: Bounded> Bounded for Body<S> {
    #[inline]
    fn overlaps_boundary(&self, boundary: Rect) -> bool {
        self.shape.overlaps_boundary(boundary)
    }

    #[inline]
    fn touches_boundary(&self, boundary: Rect) -> bool {
        self.shape.touches_boundary(boundary)
    }
}

impl<S: Overlaps<T>, T> Overlaps<Body<T>> for Body<S> {
    #[inline]
    fn overlaps(&self, other: &Body<T>) -> bool {
        self.shape.overlaps(&other.shape)
    }
}

// Bare shapes probing bodies and bodies probing bare shapes.
macro_rules! body_overlaps {
    ($($bare:ty),*) => {
        $(
            impl<T> Overlaps<Body<T>> for $bare
            where
                $bare: Overlaps<T>,
            {
                #[inline]
                fn overlaps(&self, other: &Body<T>) -> bool {
                    Overlaps::overlaps(self, &other.shape)
                }
            }

            impl<S: Overlaps<$bare>> Overlaps<$bare> for Body<S> {
                #[inline]
                fn overlaps(&self, other: &$bare) -> bool {
                    self.shape.overlaps(other)
                }
            }
        )*
    };
}

body_overlaps!(Point, Rect, Circle);

/// Any of the bare shape kinds, for callers that store mixed entities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// A point.
    Point(Point),
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A circle.
    Circle(Circle),
}

impl From<Point> for Shape {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<Rect> for Shape {
    fn from(r: Rect) -> Self {
        Self::Rect(r)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Self::Circle(c)
    }
}

impl Bounded for Shape {
    #[inline]
    fn overlaps_boundary(&self, boundary: Rect) -> bool {
        match self {
            Self::Point(p) => p.overlaps_boundary(boundary),
            Self::Rect(r) => r.overlaps_boundary(boundary),
            Self::Circle(c) => c.overlaps_boundary(boundary),
        }
    }

    #[inline]
    fn touches_boundary(&self, boundary: Rect) -> bool {
        match self {
            Self::Point(p) => p.touches_boundary(boundary),
            Self::Rect(r) => r.touches_boundary(boundary),
            Self::Circle(c) => c.touches_boundary(boundary),
        }
    }
}

impl<T> Overlaps<T> for Shape
where
    Point: Overlaps<T>,
    Rect: Overlaps<T>,
    Circle: Overlaps<T>,
{
    #[inline]
    fn overlaps(&self, other: &T) -> bool {
        match self {
            Self::Point(p) => p.overlaps(other),
            Self::Rect(r) => Overlaps::overlaps(r, other),
            Self::Circle(c) => c.overlaps(other),
        }
    }
}

impl Overlaps<Shape> for Point {
    #[inline]
    fn overlaps(&self, other: &Shape) -> bool {
        other.overlaps(self)
    }
}

impl Overlaps<Shape> for Rect {
    #[inline]
    fn overlaps(&self, other: &Shape) -> bool {
        match other {
            Shape::Point(p) => Overlaps::overlaps(self, p),
            Shape::Rect(r) => Overlaps::<Rect>::overlaps(self, r),
            Shape::Circle(c) => Overlaps::overlaps(self, c),
        }
    }
}

impl Overlaps<Shape> for Circle {
    #[inline]
    fn overlaps(&self, other: &Shape) -> bool {
        other.overlaps(self)
    }
}
