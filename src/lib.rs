//! LakshyaTrack - Density-grid measurement scoring for 3D object tracking
//!
//! Given two consecutive point-cloud scans of a moving rigid object,
//! this crate scores every candidate translation that could align the
//! current scan with the previous one, producing a log-probability per
//! candidate suitable for selecting the best alignment or building a
//! posterior over motion.
//!
//! # Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              DensityGridTracker::track              │  ← Per-frame entry
//! └─────────────────────────────────────────────────────┘
//!        │                   │                  │
//! ┌──────────────┐  ┌─────────────────┐  ┌─────────────┐
//! │  candidates  │  │   DensityGrid   │  │ MotionModel │
//! │  (x,y) lattice│  │ previous scan → │  │ translation │
//! │              │  │ log-density cells│  │    prior    │
//! └──────────────┘  └─────────────────┘  └─────────────┘
//!        │                   │                  │
//!        └───────── one ScoredTransform per candidate ──→ sink
//! ```
//!
//! The density grid holds, per voxel, the best log-density any nearby
//! previous-scan point explains it with (Gaussian spillover, combined
//! by max, floored by a smoothing constant). It is allocated once at a
//! configured maximum size and reused every frame; only the sub-region
//! a frame actually uses is reset. Scoring shifts every current-scan
//! point by the candidate translation, looks its cell up, and fuses
//! the discounted total with the motion prior.
//!
//! Everything is synchronous and single-threaded; one tracker instance
//! owns one grid buffer and serves one tracked object.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Tracking pipeline (depends on core)
// ============================================================================
pub mod tracking;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::types::{Point3D, PointCloud3D, ScoredTransform, XyzTransform};

// Tracking pipeline
pub use crate::tracking::candidates::candidate_transforms;
pub use crate::tracking::config::DensityGridConfig;
pub use crate::tracking::density_grid::DensityGrid;
pub use crate::tracking::error::{Result, TrackError};
pub use crate::tracking::motion::{GaussianMotionModel, MotionModel};
pub use crate::tracking::scored::{ScoredTransformSink, ScoredTransforms};
pub use crate::tracking::tracker::{DensityGridTracker, SearchParams};
