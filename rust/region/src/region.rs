// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon region with boolean set operations backed by the i_overlay crate.
//!
//! Every value is normalised on construction: contours are open (no repeated
//! closing point), outer contours are counter-clockwise, holes clockwise, and
//! slivers below [`MIN_CONTOUR_AREA`] are dropped. Operations never mutate
//! their inputs.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::error::{RegionError, Result};

/// Contours with less area than this are treated as degenerate
pub const MIN_CONTOUR_AREA: f64 = 1e-10;

/// Distance under which a point counts as lying on the boundary
const BOUNDARY_EPSILON: f64 = 1e-9;

type Contour = Vec<[f64; 2]>;
type Shape = Vec<Contour>;

/// A set of points in the plane bounded by closed loops
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRegion")]
pub struct Region {
    /// Shapes: first contour is the outer boundary, the rest are holes
    shapes: Vec<Shape>,
}

/// Wire form of a region before normalisation
#[derive(Deserialize)]
struct RawRegion {
    shapes: Vec<Shape>,
}

impl TryFrom<RawRegion> for Region {
    type Error = RegionError;

    /// Stored data is not trusted: coordinates must be finite and every
    /// contour is re-oriented and re-validated like overlay output.
    fn try_from(raw: RawRegion) -> Result<Self> {
        for point in raw.shapes.iter().flatten().flatten() {
            if !point[0].is_finite() || !point[1].is_finite() {
                return Err(RegionError::NonFiniteCoordinate {
                    x: point[0],
                    y: point[1],
                });
            }
        }
        Ok(Self::from_overlay(raw.shapes))
    }
}

impl Region {
    /// The empty region
    pub fn empty() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Build a region from a single closed contour (in either winding)
    pub fn from_contour(points: &[Point2<f64>]) -> Result<Self> {
        Self::from_contours(std::slice::from_ref(&points.to_vec()))
    }

    /// Build a region from several contours combined with the even-odd rule.
    ///
    /// A contour nested inside another becomes a hole, matching the way
    /// outline-plus-holes profiles are usually supplied.
    pub fn from_contours(contours: &[Vec<Point2<f64>>]) -> Result<Self> {
        let mut subject = Vec::with_capacity(contours.len());
        for contour in contours {
            subject.push(validated_path(contour)?);
        }

        let clip: Vec<Contour> = Vec::new();
        let result = subject.overlay(&clip, OverlayRule::Union, FillRule::EvenOdd);

        Ok(Self::from_overlay(result))
    }

    /// Union of contours under the non-zero rule after orienting each one
    /// counter-clockwise, so overlapping contours never cancel out.
    pub fn union_of_contours(contours: &[Vec<Point2<f64>>]) -> Self {
        let subject = oriented_paths(contours);
        if subject.is_empty() {
            return Self::empty();
        }

        let clip: Vec<Contour> = Vec::new();
        let result = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);

        Self::from_overlay(result)
    }

    /// Axis-aligned rectangle with lower-left corner `(x, y)`
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        if !(width > 0.0 && height > 0.0) {
            return Self::empty();
        }
        Self::from_bounds(&Bounds::from_rect(x, y, width, height))
    }

    /// Region covering exactly the given bounds
    pub fn from_bounds(bounds: &Bounds) -> Self {
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return Self::empty();
        }
        let outer: Contour = bounds.corners().iter().map(|p| [p.x, p.y]).collect();
        Self {
            shapes: vec![vec![outer]],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of disjoint pieces
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Number of boundary loops (outer boundaries and holes)
    pub fn loop_count(&self) -> usize {
        self.shapes.iter().map(|s| s.len()).sum()
    }

    /// Number of holes across all shapes
    pub fn hole_count(&self) -> usize {
        self.shapes.iter().map(|s| s.len().saturating_sub(1)).sum()
    }

    /// Total number of boundary points across every loop
    pub fn point_count(&self) -> usize {
        self.shapes
            .iter()
            .flat_map(|s| s.iter())
            .map(|c| c.len())
            .sum()
    }

    /// Enclosed area (holes subtracted)
    pub fn area(&self) -> f64 {
        self.shapes
            .iter()
            .flat_map(|s| s.iter())
            .map(|c| signed_area(c))
            .sum()
    }

    /// Bounding box, `None` for the empty region
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for shape in &self.shapes {
            let Some(outer) = shape.first() else {
                continue;
            };
            for p in outer {
                let point = Point2::new(p[0], p[1]);
                bounds = Some(match bounds {
                    Some(b) => b.union(&Bounds::new(point, point)),
                    None => Bounds::new(point, point),
                });
            }
        }
        bounds
    }

    /// Union of two regions
    pub fn union(&self, other: &Region) -> Region {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        self.overlay(other, OverlayRule::Union)
    }

    /// Points in `self` that are not in `other`
    pub fn subtract(&self, other: &Region) -> Region {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        if let (Some(a), Some(b)) = (self.bounds(), other.bounds()) {
            if !a.intersects(&b) {
                return self.clone();
            }
        }
        self.overlay(other, OverlayRule::Difference)
    }

    /// Points in both regions
    pub fn intersect(&self, other: &Region) -> Region {
        if self.is_empty() || other.is_empty() {
            return Region::empty();
        }
        if let (Some(a), Some(b)) = (self.bounds(), other.bounds()) {
            if !a.intersects(&b) {
                return Region::empty();
            }
        }
        self.overlay(other, OverlayRule::Intersect)
    }

    /// Subtract many contours in a single overlay pass.
    ///
    /// Each contour is oriented counter-clockwise first so that overlapping
    /// contours add up under the non-zero rule instead of cancelling.
    pub fn subtract_contours(&self, contours: &[Vec<Point2<f64>>]) -> Region {
        if self.is_empty() {
            return Region::empty();
        }
        let clip = oriented_paths(contours);
        if clip.is_empty() {
            return self.clone();
        }

        let result = self
            .paths()
            .overlay(&clip, OverlayRule::Difference, FillRule::NonZero);

        Self::from_overlay(result)
    }

    /// Union of every region in the iterator in one overlay pass
    pub fn union_all<'a, I>(regions: I) -> Region
    where
        I: IntoIterator<Item = &'a Region>,
    {
        let subject: Vec<Contour> = regions
            .into_iter()
            .flat_map(|r| r.shapes.iter().flat_map(|s| s.iter().cloned()))
            .collect();

        if subject.is_empty() {
            return Region::empty();
        }

        // Normalised regions contribute winding 0 or 1 everywhere, so the
        // non-zero rule yields their union.
        let clip: Vec<Contour> = Vec::new();
        let result = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);

        Self::from_overlay(result)
    }

    /// Area of the symmetric difference, used for tolerance comparisons
    pub fn symmetric_difference_area(&self, other: &Region) -> f64 {
        self.subtract(other).area() + other.subtract(self).area()
    }

    /// Check if a point lies strictly inside the region.
    ///
    /// Points on the boundary are reported as outside.
    pub fn contains_point(&self, point: &Point2<f64>) -> bool {
        let Some(bounds) = self.bounds() else {
            return false;
        };
        if !bounds.contains_point(point) {
            return false;
        }

        let mut inside = false;
        for contour in self.shapes.iter().flat_map(|s| s.iter()) {
            if point_on_contour(point, contour) {
                return false;
            }
            if point_in_contour(point, contour) {
                inside = !inside;
            }
        }
        inside
    }

    /// Check if the regions share any area (touching edges do not count)
    pub fn intersects(&self, other: &Region) -> bool {
        match (self.bounds(), other.bounds()) {
            (Some(a), Some(b)) if a.intersects(&b) => !self.intersect(other).is_empty(),
            _ => false,
        }
    }

    /// Check if the rectangle is entirely covered by the region
    pub fn contains_bounds(&self, bounds: &Bounds) -> bool {
        let Some(own) = self.bounds() else {
            return false;
        };
        if !own.contains_bounds(bounds) {
            return false;
        }
        let uncovered = Region::from_bounds(bounds).subtract(self);
        uncovered.area() <= MIN_CONTOUR_AREA * bounds.area().max(1.0)
    }

    /// Translated copy
    pub fn translate(&self, dx: f64, dy: f64) -> Region {
        self.map_points(|p| [p[0] + dx, p[1] + dy])
    }

    /// Copy rotated counter-clockwise about the origin
    pub fn rotate(&self, degrees: f64) -> Region {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.map_points(|p| [p[0] * cos - p[1] * sin, p[0] * sin + p[1] * cos])
    }

    /// Raw shapes: per shape, the outer contour followed by its holes
    pub fn raw_shapes(&self) -> &[Vec<Vec<[f64; 2]>>] {
        &self.shapes
    }

    /// Iterate over every contour (outer boundaries and holes)
    pub fn contours(&self) -> impl Iterator<Item = &[[f64; 2]]> + '_ {
        self.shapes
            .iter()
            .flat_map(|s| s.iter())
            .map(|c| c.as_slice())
    }

    // ========================================================================
    // Internal Helper Functions
    // ========================================================================

    fn overlay(&self, other: &Region, rule: OverlayRule) -> Region {
        let subject = self.paths();
        let clip = other.paths();
        let result = subject.overlay(&clip, rule, FillRule::NonZero);
        Self::from_overlay(result)
    }

    fn paths(&self) -> Vec<Contour> {
        self.shapes.iter().flat_map(|s| s.iter().cloned()).collect()
    }

    fn map_points<F>(&self, f: F) -> Region
    where
        F: Fn(&[f64; 2]) -> [f64; 2],
    {
        Region {
            shapes: self
                .shapes
                .iter()
                .map(|shape| {
                    shape
                        .iter()
                        .map(|contour| contour.iter().map(&f).collect())
                        .collect()
                })
                .collect(),
        }
    }

    /// Convert i_overlay output into a normalised region.
    ///
    /// i_overlay returns Vec<Vec<Vec<[f64; 2]>>> where:
    /// - Outer Vec: list of shapes
    /// - Middle Vec: list of contours per shape (first is outer, rest are holes)
    /// - Inner Vec: list of points per contour
    fn from_overlay(result: Vec<Vec<Vec<[f64; 2]>>>) -> Region {
        let mut shapes = Vec::with_capacity(result.len());

        for shape in result {
            let mut contours = shape.into_iter();
            let Some(outer) = contours.next() else {
                continue;
            };
            if !is_valid_path(&outer) {
                continue;
            }

            let mut normalised = vec![ensure_ccw(outer)];
            for hole in contours {
                if is_valid_path(&hole) {
                    normalised.push(ensure_cw(hole));
                }
            }
            shapes.push(normalised);
        }

        Region { shapes }
    }
}

/// Compute the signed area of a contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn signed_area(contour: &[[f64; 2]]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i][0] * contour[j][1];
        area -= contour[j][0] * contour[i][1];
    }

    area * 0.5
}

fn is_valid_path(contour: &[[f64; 2]]) -> bool {
    contour.len() >= 3 && signed_area(contour).abs() > MIN_CONTOUR_AREA
}

fn ensure_ccw(mut contour: Contour) -> Contour {
    if signed_area(&contour) < 0.0 {
        contour.reverse();
    }
    contour
}

fn ensure_cw(mut contour: Contour) -> Contour {
    if signed_area(&contour) > 0.0 {
        contour.reverse();
    }
    contour
}

/// Reject non-finite coordinates, drop repeated points and the closing duplicate
fn validated_path(points: &[Point2<f64>]) -> Result<Contour> {
    let mut path: Contour = Vec::with_capacity(points.len());
    for p in points {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(RegionError::NonFiniteCoordinate { x: p.x, y: p.y });
        }
        if path.last() != Some(&[p.x, p.y]) {
            path.push([p.x, p.y]);
        }
    }
    while path.len() > 1 && path.first() == path.last() {
        path.pop();
    }
    if path.len() < 3 {
        return Err(RegionError::DegenerateContour(path.len()));
    }
    Ok(path)
}

fn oriented_paths(contours: &[Vec<Point2<f64>>]) -> Vec<Contour> {
    contours
        .iter()
        .filter(|c| c.len() >= 3)
        .map(|c| c.iter().map(|p| [p.x, p.y]).collect::<Contour>())
        .filter(|c| is_valid_path(c))
        .map(ensure_ccw)
        .collect()
}

/// Check if a point is inside a contour using ray casting
fn point_in_contour(point: &Point2<f64>, contour: &[[f64; 2]]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = contour[i];
        let pj = contour[j];

        if ((pi[1] > point.y) != (pj[1] > point.y))
            && (point.x < (pj[0] - pi[0]) * (point.y - pi[1]) / (pj[1] - pi[1]) + pi[0])
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

fn point_on_contour(point: &Point2<f64>, contour: &[[f64; 2]]) -> bool {
    let n = contour.len();
    (0..n).any(|i| {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        segment_distance_sq(point, a, b) <= BOUNDARY_EPSILON * BOUNDARY_EPSILON
    })
}

fn segment_distance_sq(p: &Point2<f64>, a: [f64; 2], b: [f64; 2]) -> f64 {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a[0]) * dx + (p.y - a[1]) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a[0] + t * dx - p.x, a[1] + t * dy - p.y);
    cx * cx + cy * cy
}
