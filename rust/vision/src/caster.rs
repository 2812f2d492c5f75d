// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shadow-casting visibility.
//!
//! Every edge of the blocking topology near the observer throws a shadow
//! quad: the edge itself plus its two endpoints pushed far away from the
//! observer. Whatever part of the vision shape survives all shadows is
//! visible.

use nalgebra::Point2;
use vtt_fog_region::{Bounds, PathSegment, Region};

use crate::config::VisionConfig;
use crate::digest::DigestedTopology;
use crate::error::{check_finite, Error, Result};
use crate::face::Face;
use crate::geometry::distance;

/// Slack around a face when checking whether it already lies in shadow
const FACE_MARGIN: f64 = 1.0;

/// Distance under which the observer counts as standing on a face
const ON_FACE_EPSILON: f64 = 1e-9;

/// Compute the part of `vision` an observer at `observer` can see.
///
/// `vision` is anchored at the origin and moved to the observer first.
/// Returns `Ok(None)` when the observer stands strictly inside the topology.
pub fn cast_visibility(
    observer: &Point2<f64>,
    vision: &Region,
    topology: &Region,
    config: &VisionConfig,
) -> Result<Option<Region>> {
    check_finite(observer)?;
    if topology.contains_point(observer) {
        return Ok(None);
    }

    let vision = vision.translate(observer.x, observer.y);
    let Some(reach_bounds) = reach_bounds(observer, &vision) else {
        return Ok(Some(vision));
    };

    // Only topology inside the box spanned by the observer and the vision
    // shape can hide any part of it.
    let trimmed = topology.intersect(&Region::from_bounds(&reach_bounds));
    if trimmed.is_empty() {
        return Ok(Some(vision));
    }

    let visible = vision.subtract(&trimmed);
    let reach = projection_reach(observer, &reach_bounds, config);
    let quads = shadow_quads(observer, trimmed.path_segments(), reach)?;

    tracing::trace!(
        quads = quads.len(),
        loops = trimmed.loop_count(),
        reach,
        "Casting shadows"
    );

    Ok(Some(visible.subtract_contours(&quads)))
}

/// Same as [`cast_visibility`], driven by a digested topology.
///
/// Pieces are visited nearest first and only their front faces cast
/// shadows. Pieces and faces already hidden by nearer shadows are skipped.
/// A piece whose boundary passes through the observer casts every face,
/// since the faces it touches are seen edge-on and hide nothing.
pub fn cast_visibility_digested(
    observer: &Point2<f64>,
    vision: &Region,
    digest: &DigestedTopology,
    config: &VisionConfig,
) -> Result<Option<Region>> {
    check_finite(observer)?;
    if digest.contains(observer) {
        return Ok(None);
    }

    let vision = vision.translate(observer.x, observer.y);
    let Some(reach_bounds) = reach_bounds(observer, &vision) else {
        return Ok(Some(vision));
    };
    let reach = projection_reach(observer, &reach_bounds, config);
    let trimmed = digest
        .topology()
        .intersect(&Region::from_bounds(&reach_bounds));

    let mut cleared = Region::empty();
    let mut skipped = 0usize;

    for piece in digest.regions_by_distance(observer) {
        if !piece.bounds().intersects(&reach_bounds) {
            continue;
        }
        if cleared.contains_bounds(piece.bounds()) {
            skipped += 1;
            continue;
        }

        let touching = piece
            .faces()
            .iter()
            .any(|face| face.distance_from(observer) <= ON_FACE_EPSILON);
        let faces = if touching {
            piece.faces().to_vec()
        } else {
            piece.front_faces(observer)
        };

        let quads: Vec<Vec<Point2<f64>>> = faces
            .iter()
            .filter(|face| !cleared.contains_bounds(&face.bounds().expand(FACE_MARGIN)))
            .map(|face| face.shadow(observer, reach))
            .collect();

        if !quads.is_empty() {
            cleared = cleared.union(&Region::union_of_contours(&quads));
        }
    }

    tracing::trace!(pieces = digest.len(), skipped, "Cast digested shadows");

    Ok(Some(vision.subtract(&trimmed).subtract(&cleared)))
}

/// Box spanned by the observer and the translated vision shape
fn reach_bounds(observer: &Point2<f64>, vision: &Region) -> Option<Bounds> {
    vision
        .bounds()
        .map(|b| b.union(&Bounds::new(*observer, *observer)))
}

/// Distance shadows are projected to; always past the far side of `bounds`
fn projection_reach(observer: &Point2<f64>, bounds: &Bounds, config: &VisionConfig) -> f64 {
    let needed = 2.0 * (distance(observer, &bounds.center()) + bounds.diagonal());
    config.projection_distance.max(needed)
}

/// Shadow quads for every edge of a boundary walk.
///
/// A `MoveTo` closes the previous loop with the edge from its last point
/// back to its first; `Close` markers carry no extra information.
fn shadow_quads<I>(origin: &Point2<f64>, segments: I, reach: f64) -> Result<Vec<Vec<Point2<f64>>>>
where
    I: IntoIterator<Item = PathSegment>,
{
    let mut quads = Vec::new();
    let mut first: Option<Point2<f64>> = None;
    let mut last: Option<Point2<f64>> = None;

    let push = |a: Point2<f64>, b: Point2<f64>, quads: &mut Vec<Vec<Point2<f64>>>| {
        if a != b {
            quads.push(Face::new(a, b).shadow(origin, reach));
        }
    };

    for segment in segments {
        match segment {
            PathSegment::MoveTo(p) => {
                if let (Some(start), Some(end)) = (first, last) {
                    push(end, start, &mut quads);
                }
                first = Some(p);
                last = Some(p);
            }
            PathSegment::LineTo(p) => {
                let prev = last.ok_or(Error::MissingMoveTo)?;
                push(prev, p, &mut quads);
                last = Some(p);
            }
            PathSegment::Close => {
                if first.is_none() {
                    return Err(Error::MissingMoveTo);
                }
            }
        }
    }

    if let (Some(start), Some(end)) = (first, last) {
        push(end, start, &mut quads);
    }
    Ok(quads)
}
