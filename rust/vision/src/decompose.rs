// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Region decomposition.
//!
//! Blocking topology is broken into hole-free pieces of bounded complexity:
//!
//! 1. Walk each pending region's boundary loop by loop.
//! 2. Hole loops (clockwise) are held open until the solid loop enclosing
//!    them arrives, which the boundary walk guarantees happens next.
//! 3. A solid with holes is bisected through a hole and both halves are
//!    queued again; an over-complex solid is bisected on its longer axis.
//! 4. Anything else is final and becomes a [`SimpleRegion`].
//!
//! Holes found while walking the input topology are kept in the output
//! as hole pieces, so solids minus holes reproduce the input.

use std::collections::VecDeque;

use nalgebra::Point2;
use vtt_fog_region::{Bounds, Region};

use crate::config::VisionConfig;
use crate::error::Result;
use crate::ring::{collect_rings, PointRing};
use crate::simple_region::SimpleRegion;

/// Where a pending region came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    /// The topology as supplied
    Seed,
    /// A half produced by bisecting solid material
    Split,
    /// Interior of a hole in the topology (or part of one)
    Hole,
}

#[derive(Debug)]
struct Pending {
    region: Region,
    kind: PendingKind,
    depth: usize,
}

/// A hole loop waiting for the solid loop that encloses it
struct OpenHole {
    ring: PointRing,
    region: Region,
    bounds: Bounds,
}

impl OpenHole {
    fn new(ring: PointRing) -> Result<Self> {
        Ok(Self {
            region: ring.to_region()?,
            bounds: ring.bounds(),
            ring,
        })
    }
}

/// Break `topology` into simple regions.
///
/// Deterministic for a given input. Fails only on malformed boundaries.
pub fn decompose(topology: &Region, config: &VisionConfig) -> Result<Vec<SimpleRegion>> {
    let mut decomposer = Decomposer::new(topology, config);
    decomposer.run()?;

    tracing::debug!(
        regions = decomposer.output.len(),
        holes = decomposer.output.iter().filter(|r| r.is_hole()).count(),
        splits = decomposer.splits,
        unresolved = decomposer.unresolved,
        "Decomposed blocking topology"
    );

    Ok(decomposer.output)
}

struct Decomposer<'a> {
    topology: &'a Region,
    config: &'a VisionConfig,
    /// Outer loop and its bounds for every topology shape, to find islands
    /// inside holes
    outlines: Vec<(Bounds, Vec<Point2<f64>>)>,
    queue: VecDeque<Pending>,
    output: Vec<SimpleRegion>,
    splits: usize,
    unresolved: usize,
}

impl<'a> Decomposer<'a> {
    fn new(topology: &'a Region, config: &'a VisionConfig) -> Self {
        let outlines = topology
            .raw_shapes()
            .iter()
            .filter_map(|shape| {
                let outer = shape.first()?;
                let points: Vec<Point2<f64>> =
                    outer.iter().map(|p| Point2::new(p[0], p[1])).collect();
                Some((Bounds::from_points(&points)?, points))
            })
            .collect();

        Self {
            topology,
            config,
            outlines,
            queue: VecDeque::new(),
            output: Vec::new(),
            splits: 0,
            unresolved: 0,
        }
    }

    fn run(&mut self) -> Result<()> {
        self.queue.push_back(Pending {
            region: self.topology.clone(),
            kind: PendingKind::Seed,
            depth: 0,
        });

        while let Some(pending) = self.queue.pop_front() {
            self.resolve(pending)?;
        }
        Ok(())
    }

    fn resolve(&mut self, pending: Pending) -> Result<()> {
        let Pending {
            region,
            kind,
            depth,
        } = pending;

        let mut open_holes: Vec<OpenHole> = Vec::new();

        for ring in collect_rings(region.path_segments())? {
            if ring.is_hole() {
                open_holes.push(OpenHole::new(ring)?);
                continue;
            }

            let mut solid = ring.to_region()?;
            let bounds = ring.bounds();

            let (consumed, remaining): (Vec<OpenHole>, Vec<OpenHole>) =
                open_holes.into_iter().partition(|hole| {
                    hole.bounds.intersects(&bounds) && hole.region.intersects(&solid)
                });
            open_holes = remaining;

            if !consumed.is_empty() {
                solid = solid.subtract(&Region::union_all(consumed.iter().map(|h| &h.region)));
            }

            let mut split_points: Vec<Point2<f64>> =
                consumed.iter().map(|h| h.bounds.center()).collect();

            if kind == PendingKind::Seed {
                for hole in consumed {
                    self.keep_hole(hole)?;
                }
            }

            if !split_points.is_empty() {
                // Median by x keeps the split tree balanced for rows of holes
                split_points.sort_by(|a, b| a.x.total_cmp(&b.x));
                let at = split_points[split_points.len() / 2];
                self.split_or_accept(&ring, &solid, at, true, kind, depth)?;
            } else if ring.len() > self.config.point_count_threshold {
                let longer_is_x = bounds.width() >= bounds.height();
                self.split_or_accept(&ring, &solid, bounds.center(), longer_is_x, kind, depth)?;
            } else {
                self.emit(&ring, kind)?;
            }
        }

        if !open_holes.is_empty() {
            tracing::debug!(
                count = open_holes.len(),
                "Ignoring hole loops without an enclosing solid"
            );
        }
        Ok(())
    }

    /// Record a hole of the input topology as a hole piece.
    ///
    /// Holes that hold islands of topology, or that are too complex, are
    /// queued and resolved like solids. Only the islands' outer loops are
    /// cut away; holes inside an island belong to that island's shape.
    fn keep_hole(&mut self, hole: OpenHole) -> Result<()> {
        let islands = self
            .outlines
            .iter()
            .filter(|(bounds, _)| hole.bounds.contains_bounds(bounds))
            .map(|(_, points)| Region::from_contour(points))
            .collect::<std::result::Result<Vec<Region>, _>>()?;

        if !islands.is_empty() {
            self.queue.push_back(Pending {
                region: hole.region.subtract(&Region::union_all(&islands)),
                kind: PendingKind::Hole,
                depth: 0,
            });
        } else if hole.ring.len() > self.config.point_count_threshold {
            self.queue.push_back(Pending {
                region: hole.region,
                kind: PendingKind::Hole,
                depth: 0,
            });
        } else {
            self.output.push(SimpleRegion::from_ring(&hole.ring, true)?);
        }
        Ok(())
    }

    fn split_or_accept(
        &mut self,
        ring: &PointRing,
        solid: &Region,
        at: Point2<f64>,
        vertical_first: bool,
        kind: PendingKind,
        depth: usize,
    ) -> Result<()> {
        let halves = if depth < self.config.max_split_depth {
            self.bisect(solid, at, vertical_first)
        } else {
            None
        };

        let Some((low, high)) = halves else {
            self.unresolved += 1;
            tracing::warn!(
                points = ring.len(),
                depth,
                x = at.x,
                y = at.y,
                "No usable split, accepting region unresolved"
            );
            return self.emit(ring, kind);
        };

        self.splits += 1;
        let kind = match kind {
            PendingKind::Hole => PendingKind::Hole,
            _ => PendingKind::Split,
        };
        for region in [low, high] {
            self.queue.push_back(Pending {
                region,
                kind,
                depth: depth + 1,
            });
        }
        Ok(())
    }

    /// Cut `region` in two with an axis-aligned line.
    ///
    /// Tries the line through `at` on the preferred axis, then on the other
    /// axis, then the bounding-box midpoint on the longer axis. A cut only
    /// counts if both halves keep some area and each is strictly smaller
    /// than the whole.
    fn bisect(
        &self,
        region: &Region,
        at: Point2<f64>,
        vertical_first: bool,
    ) -> Option<(Region, Region)> {
        let bounds = region.bounds()?;
        let total = region.area();
        let min_area = self.config.min_area;
        let center = bounds.center();
        let longer_is_x = bounds.width() >= bounds.height();

        let candidates = [
            (vertical_first, at),
            (!vertical_first, at),
            (longer_is_x, center),
        ];

        for (vertical, point) in candidates {
            let cut = if vertical {
                bounds.split_at_x(point.x)
            } else {
                bounds.split_at_y(point.y)
            };
            let Some((low_bounds, high_bounds)) = cut else {
                continue;
            };

            let low = region.intersect(&Region::from_bounds(&low_bounds));
            let high = region.intersect(&Region::from_bounds(&high_bounds));
            let (low_area, high_area) = (low.area(), high.area());

            let progresses = |area: f64| area > min_area && area < total - min_area;
            if progresses(low_area) && progresses(high_area) {
                return Some((low, high));
            }
        }
        None
    }

    fn emit(&mut self, ring: &PointRing, kind: PendingKind) -> Result<()> {
        let piece = match kind {
            // Hole interiors are walked as solids; flip them so faces point
            // into the open hole.
            PendingKind::Hole => SimpleRegion::from_ring(&ring.reversed(), true)?,
            _ => SimpleRegion::from_ring(ring, false)?,
        };
        self.output.push(piece);
        Ok(())
    }
}
