//! Error taxonomy for grid operations.
//!
//! All failures are synchronous programmer-input errors; there is no retry
//! policy and no transient-fault category. Operations that fail must leave
//! the grid's caches unaltered.

use crate::geometry::PixelRect;

/// Errors produced by grid construction, addressing, and geometry queries.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A required argument was missing or malformed (missing start target,
    /// out-of-bounds address, unrecognized style key, bad hex color, zero
    /// grid dimensions).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An integer merge-region index was past the end of the region list.
    #[error("merged region index {index} is out of range ({len} regions)")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// Number of regions actually recorded.
        len: usize,
    },

    /// A computed rectangle ended up with its start past its end after
    /// margin or mutation application. Propagated rather than clamped so
    /// the offending adjustment stays visible.
    #[error("inconsistent geometry: rectangle {rect:?} has start past end")]
    GeometryInconsistency {
        /// The inverted rectangle.
        rect: PixelRect,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;
