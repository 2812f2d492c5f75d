// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for visibility operations.

use vtt_fog_region::RegionError;

/// Result type alias for visibility operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the decomposer, the caster and their helpers.
///
/// Every variant describes malformed input. None of them is recoverable
/// locally; the caller decides whether to skip the frame or halt.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A boundary walk ended (or restarted) while a loop was still open.
    #[error("boundary loop was never closed")]
    UnclosedLoop,

    /// A line or close step arrived before any move step.
    #[error("boundary segment before the first move-to")]
    MissingMoveTo,

    /// A closed loop with fewer than three distinct points.
    #[error("boundary loop has {0} distinct points, at least 3 are required")]
    DegenerateLoop(usize),

    /// NaN or infinite coordinate in an input point.
    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    /// Region construction failed.
    #[error("region error: {0}")]
    Region(#[from] RegionError),

    /// Configuration could not be parsed or is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Exposure snapshot could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Reject NaN / infinite coordinates.
pub(crate) fn check_finite(point: &nalgebra::Point2<f64>) -> Result<()> {
    if point.x.is_finite() && point.y.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFiniteCoordinate {
            x: point.x,
            y: point.y,
        })
    }
}
