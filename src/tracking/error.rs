//! Tracking pipeline errors.

use thiserror::Error;

/// Tracking errors.
///
/// All variants are caller contract violations; the pipeline itself
/// never partially fails. Degenerate search geometry that has a
/// well-defined answer (an empty search range, a z step coarser than
/// the z range) is handled, not an error.
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("xy step size must be positive and finite, got {0}")]
    InvalidXyStep(f32),

    #[error("z step size must be positive and finite, got {0}")]
    InvalidZStep(f32),

    #[error("previous scan is empty; a bounding box is required to size the grid")]
    EmptyPreviousScan,

    #[error("down-sample factor must be positive and finite, got {0}")]
    InvalidDownSampleFactor(f32),
}

pub type Result<T> = std::result::Result<T, TrackError>;
