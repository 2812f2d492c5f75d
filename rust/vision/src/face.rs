// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Oriented boundary edges.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use vtt_fog_region::Bounds;

use crate::geometry::{
    angle_between, angle_delta, closest_point_on_segment, distance, project_point,
};

/// One boundary edge of a simple region.
///
/// `facing` is the direction of the right-hand normal of `a -> b`, in
/// degrees. Counter-clockwise solid loops and clockwise hole loops both put
/// open space on that side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub a: Point2<f64>,
    pub b: Point2<f64>,
    pub facing: f64,
}

impl Face {
    pub fn new(a: Point2<f64>, b: Point2<f64>) -> Self {
        let facing = angle_delta(0.0, angle_between(&a, &b) - 90.0);
        Self { a, b, facing }
    }

    #[inline]
    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.a, &self.b)
    }

    /// True when the face turns towards `origin` (or is seen edge-on)
    pub fn is_front_facing(&self, origin: &Point2<f64>) -> bool {
        let towards = angle_between(origin, &self.midpoint());
        angle_delta(towards, self.facing).abs() >= 90.0
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.a, self.b)
    }

    pub fn length(&self) -> f64 {
        distance(&self.a, &self.b)
    }

    /// Distance from `origin` to the nearest point of the face
    pub fn distance_from(&self, origin: &Point2<f64>) -> f64 {
        distance(origin, &closest_point_on_segment(origin, &self.a, &self.b))
    }

    /// Quad covering everything hidden behind this face, seen from `origin`.
    ///
    /// The far edge lies `reach` away from `origin`.
    pub fn shadow(&self, origin: &Point2<f64>, reach: f64) -> Vec<Point2<f64>> {
        vec![
            self.a,
            self.b,
            project_point(origin, &self.b, reach),
            project_point(origin, &self.a, reach),
        ]
    }
}
