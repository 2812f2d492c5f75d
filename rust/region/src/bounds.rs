// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding rectangles.

use nalgebra::Point2;

/// Axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Bounds {
    /// Create bounds from two corners, in any order
    pub fn new(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Bounds of a rectangle given its lower-left corner and size
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point2::new(x, y), Point2::new(x + width, y + height))
    }

    /// Compute bounds of a point set, `None` when the set is empty
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2<f64>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = *first;
        let mut max = *first;

        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        Some(Self { min, max })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center of the rectangle
    #[inline]
    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Length of the diagonal
    #[inline]
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).norm()
    }

    /// Check if two bounding boxes overlap (touching counts)
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Check if `other` lies entirely within these bounds
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    pub fn contains_point(&self, point: &Point2<f64>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Smallest bounds enclosing both
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grow the bounds by `margin` on every side
    pub fn expand(&self, margin: f64) -> Bounds {
        Bounds {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Split at a vertical line, returning the (left, right) halves.
    ///
    /// Returns `None` when `x` does not lie strictly inside the bounds.
    pub fn split_at_x(&self, x: f64) -> Option<(Bounds, Bounds)> {
        if !(x > self.min.x && x < self.max.x) {
            return None;
        }
        Some((
            Bounds::new(self.min, Point2::new(x, self.max.y)),
            Bounds::new(Point2::new(x, self.min.y), self.max),
        ))
    }

    /// Split at a horizontal line, returning the (bottom, top) halves.
    pub fn split_at_y(&self, y: f64) -> Option<(Bounds, Bounds)> {
        if !(y > self.min.y && y < self.max.y) {
            return None;
        }
        Some((
            Bounds::new(self.min, Point2::new(self.max.x, y)),
            Bounds::new(Point2::new(self.min.x, y), self.max),
        ))
    }

    /// Corners in counter-clockwise order starting at `min`
    pub fn corners(&self) -> [Point2<f64>; 4] {
        [
            self.min,
            Point2::new(self.max.x, self.min.y),
            self.max,
            Point2::new(self.min.x, self.max.y),
        ]
    }
}
