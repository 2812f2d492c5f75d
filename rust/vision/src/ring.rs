// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed boundary loops stored as index-addressed point rings.

use nalgebra::Point2;
use vtt_fog_region::{Bounds, PathSegment, Region};

use crate::error::{check_finite, Error, Result};
use crate::geometry::{angle_between, angle_delta};

/// A closed loop of distinct consecutive points.
///
/// The closing edge from the last point back to the first is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRing {
    points: Vec<Point2<f64>>,
}

impl PointRing {
    /// Build a ring, dropping zero-length edges and a repeated closing point
    pub fn new<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = Point2<f64>>,
    {
        let mut ring: Vec<Point2<f64>> = Vec::new();
        for p in points {
            check_finite(&p)?;
            if ring.last() != Some(&p) {
                ring.push(p);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(Error::DegenerateLoop(ring.len()));
        }
        Ok(Self { points: ring })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Rings always hold at least three points
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Point at `index`, wrapping around the ring
    #[inline]
    pub fn get(&self, index: usize) -> Point2<f64> {
        self.points[index % self.points.len()]
    }

    #[inline]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.points.len()
    }

    #[inline]
    pub fn prev_index(&self, index: usize) -> usize {
        (index + self.points.len() - 1) % self.points.len()
    }

    /// Sum of the signed turning angles at every vertex, in degrees.
    ///
    /// +360 for a counter-clockwise loop, -360 for a clockwise one.
    pub fn turning_angle(&self) -> f64 {
        (0..self.len())
            .map(|i| {
                let prev = self.get(self.prev_index(i));
                let cur = self.get(i);
                let next = self.get(self.next_index(i));
                angle_delta(angle_between(&prev, &cur), angle_between(&cur, &next))
            })
            .sum()
    }

    /// Clockwise loops bound holes in the region they were walked from
    pub fn is_hole(&self) -> bool {
        self.turning_angle() < 0.0
    }

    /// Same loop walked the other way round
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Edges in order, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        (0..self.len()).map(move |i| (self.get(i), self.get(self.next_index(i))))
    }

    pub fn bounds(&self) -> Bounds {
        let first = self.points[0];
        self.points
            .iter()
            .fold(Bounds::new(first, first), |b, p| b.union(&Bounds::new(*p, *p)))
    }

    /// Area enclosed by the loop as a solid region
    pub fn to_region(&self) -> Result<Region> {
        Ok(Region::from_contour(&self.points)?)
    }
}

/// Split a boundary walk into rings, one per `Close` marker.
///
/// A `MoveTo` while a loop is still open, or an open loop at the end of the
/// walk, is rejected as unclosed.
pub fn collect_rings<I>(segments: I) -> Result<Vec<PointRing>>
where
    I: IntoIterator<Item = PathSegment>,
{
    let mut rings = Vec::new();
    let mut current: Option<Vec<Point2<f64>>> = None;

    for segment in segments {
        match segment {
            PathSegment::MoveTo(p) => {
                if current.is_some() {
                    return Err(Error::UnclosedLoop);
                }
                current = Some(vec![p]);
            }
            PathSegment::LineTo(p) => match current.as_mut() {
                Some(points) => points.push(p),
                None => return Err(Error::MissingMoveTo),
            },
            PathSegment::Close => match current.take() {
                Some(points) => rings.push(PointRing::new(points)?),
                None => return Err(Error::MissingMoveTo),
            },
        }
    }

    if current.is_some() {
        return Err(Error::UnclosedLoop);
    }
    Ok(rings)
}
