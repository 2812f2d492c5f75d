// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # VTT-Fog Region
//!
//! Planar polygon regions with exact boolean set operations, used as the
//! value type for blocking topology, vision shapes and exposed area.
//!
//! A [`Region`] is a list of shapes. Each shape is one outer contour wound
//! counter-clockwise (y-up) followed by zero or more clockwise hole contours.
//! The orientation is enforced by this crate after every operation, so code
//! walking the boundary can rely on it regardless of the clipping backend.

pub mod bounds;
pub mod error;
pub mod path;
pub mod region;
pub mod shapes;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use bounds::Bounds;
pub use error::{RegionError, Result};
pub use path::PathSegment;
pub use region::Region;
