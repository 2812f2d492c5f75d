// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary walk over a region.
//!
//! The walk yields one `MoveTo`, a run of `LineTo` and one `Close` per
//! boundary loop. Inside every shape the hole loops come first and the outer
//! loop that encloses them follows immediately, so a consumer that collects
//! holes as it goes always sees them before their parent.

use nalgebra::Point2;

use crate::region::Region;

/// One step of a boundary walk
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Start a new loop at this point
    MoveTo(Point2<f64>),
    /// Straight edge from the previous point to this one
    LineTo(Point2<f64>),
    /// Close the current loop back to its first point
    Close,
}

impl Region {
    /// Walk the boundary as move/line/close segments (holes before their parent).
    pub fn path_segments(&self) -> impl Iterator<Item = PathSegment> + '_ {
        self.loops_in_walk_order().flat_map(|contour| {
            let mut points = contour.iter().map(|p| Point2::new(p[0], p[1]));
            let start = points.next().map(PathSegment::MoveTo);
            start
                .into_iter()
                .chain(points.map(PathSegment::LineTo))
                .chain(std::iter::once(PathSegment::Close))
        })
    }

    /// Boundary loops as point lists, in the same order as [`Region::path_segments`].
    pub fn loops(&self) -> Vec<Vec<Point2<f64>>> {
        self.loops_in_walk_order()
            .map(|contour| contour.iter().map(|p| Point2::new(p[0], p[1])).collect())
            .collect()
    }

    fn loops_in_walk_order(&self) -> impl Iterator<Item = &Vec<[f64; 2]>> + '_ {
        self.raw_shapes()
            .iter()
            .flat_map(|shape| shape.iter().skip(1).chain(shape.iter().take(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_emits_holes_first() {
        let outer = Region::rectangle(0.0, 0.0, 10.0, 10.0);
        let hole = Region::rectangle(4.0, 4.0, 2.0, 2.0);
        let ring = outer.subtract(&hole);

        let loops = ring.loops();
        assert_eq!(loops.len(), 2);

        // First loop is the hole (all points inside 4..6)
        assert!(loops[0].iter().all(|p| p.x > 3.9 && p.x < 6.1));
        // Second loop is the outer boundary
        assert!(loops[1].iter().any(|p| p.x.abs() < 1e-6));
    }

    #[test]
    fn test_segments_are_well_formed() {
        let region = Region::rectangle(0.0, 0.0, 1.0, 1.0)
            .union(&Region::rectangle(5.0, 5.0, 1.0, 1.0));

        let segments: Vec<PathSegment> = region.path_segments().collect();
        let moves = segments
            .iter()
            .filter(|s| matches!(s, PathSegment::MoveTo(_)))
            .count();
        let closes = segments
            .iter()
            .filter(|s| matches!(s, PathSegment::Close))
            .count();

        assert_eq!(moves, 2);
        assert_eq!(closes, 2);
        assert!(matches!(segments[0], PathSegment::MoveTo(_)));
        assert_eq!(segments.last(), Some(&PathSegment::Close));
    }

    #[test]
    fn test_empty_region_has_no_segments() {
        assert_eq!(Region::empty().path_segments().count(), 0);
    }
}
