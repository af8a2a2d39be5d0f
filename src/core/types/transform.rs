//! Candidate and scored transform types.

use serde::{Deserialize, Serialize};

/// A candidate translation aligning the current scan to the previous scan.
///
/// Each candidate is tagged with the physical volume of search space it
/// represents at the current step size, so downstream consumers can
/// treat scores as samples of a continuous distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyzTransform {
    /// X translation in meters
    pub x: f32,
    /// Y translation in meters
    pub y: f32,
    /// Z translation in meters
    pub z: f32,
    /// Volume of search space this candidate represents (m³)
    pub volume: f32,
}

impl XyzTransform {
    /// Create a new candidate transform.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, volume: f32) -> Self {
        Self { x, y, z, volume }
    }
}

/// A candidate transform annotated with its combined log-probability.
///
/// The score fuses the motion-model log-prior with the discounted
/// measurement log-likelihood. Scores are relative, not normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredTransform {
    /// X translation in meters
    pub x: f32,
    /// Y translation in meters
    pub y: f32,
    /// Z translation in meters
    pub z: f32,
    /// Combined log-probability of this alignment
    pub log_prob: f32,
    /// Volume of search space this candidate represents (m³)
    pub volume: f32,
}

impl ScoredTransform {
    /// Annotate a candidate with its log-probability.
    #[inline]
    pub fn new(transform: XyzTransform, log_prob: f32) -> Self {
        Self {
            x: transform.x,
            y: transform.y,
            z: transform.z,
            log_prob,
            volume: transform.volume,
        }
    }
}
