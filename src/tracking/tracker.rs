//! Per-frame tracking entry point.
//!
//! Ties the pipeline together: generate the candidate lattice, rebuild
//! the density grid from the previous scan, score every candidate
//! against the current scan, and emit the results to the caller's
//! sink. The tracker owns the persistent grid buffer; nothing else
//! survives between frames.

use crate::core::types::{Point3D, PointCloud3D, ScoredTransform};
use crate::tracking::candidates::candidate_transforms;
use crate::tracking::config::DensityGridConfig;
use crate::tracking::density_grid::DensityGrid;
use crate::tracking::error::Result;
use crate::tracking::motion::MotionModel;
use crate::tracking::scored::ScoredTransformSink;
use serde::{Deserialize, Serialize};

/// Per-invocation search parameters.
///
/// Groups the call-site knobs so `track` doesn't take a dozen
/// arguments. All ranges are closed intervals in meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchParams {
    /// Candidate lattice spacing in x and y (meters).
    pub xy_step: f32,
    /// Candidate lattice spacing in z (meters).
    pub z_step: f32,
    /// Inclusive x search range (meters).
    pub x_range: (f32, f32),
    /// Inclusive y search range (meters).
    pub y_range: (f32, f32),
    /// Inclusive z search range (meters).
    pub z_range: (f32, f32),
    /// Horizontal distance from the sensor to the object (meters).
    pub horizontal_distance: f32,
    /// Down-sampling factor already applied to the scans upstream.
    pub down_sample_factor: f32,
}

/// Density-grid measurement scorer for one tracked object.
///
/// Owns the persistent grid buffer; one instance per tracked object.
/// The buffer is not shareable across concurrent rebuilds.
#[derive(Debug)]
pub struct DensityGridTracker {
    grid: DensityGrid,
}

impl DensityGridTracker {
    /// Create a tracker, allocating the grid at the configured maxima.
    pub fn new(config: DensityGridConfig) -> Self {
        Self {
            grid: DensityGrid::new(config),
        }
    }

    /// The grid as rebuilt by the most recent [`track`](Self::track) call.
    pub fn grid(&self) -> &DensityGrid {
        &self.grid
    }

    /// Score every candidate alignment of the current scan against the
    /// previous scan.
    ///
    /// The sink is cleared, given a capacity hint, and then receives
    /// one [`ScoredTransform`] per candidate in generation order. Each
    /// score is `ln(motion prior) + discount × Σ cell log-density`; a
    /// zero motion prior yields `-inf`, which is propagated rather
    /// than treated as an error.
    pub fn track<M: MotionModel, S: ScoredTransformSink>(
        &mut self,
        params: &SearchParams,
        current: &PointCloud3D,
        previous: &PointCloud3D,
        _current_centroid: Point3D,
        motion_model: &M,
        sink: &mut S,
    ) -> Result<()> {
        let candidates = candidate_transforms(
            params.xy_step,
            params.z_step,
            params.x_range,
            params.y_range,
            params.z_range,
        )?;

        self.grid.rebuild(
            previous,
            params.xy_step,
            params.z_step,
            params.horizontal_distance,
            params.down_sample_factor,
        )?;

        sink.clear();
        sink.reserve(candidates.len());

        let discount = self.grid.discount_factor();
        for candidate in &candidates {
            let measurement =
                self.grid
                    .measurement_log_density(current, candidate.x, candidate.y, candidate.z);
            let motion_prob = motion_model.score(candidate.x, candidate.y, candidate.z);

            let log_prob = motion_prob.ln() + discount * measurement;
            sink.add(ScoredTransform::new(*candidate, log_prob));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::motion::GaussianMotionModel;
    use crate::tracking::scored::ScoredTransforms;

    fn test_config() -> DensityGridConfig {
        DensityGridConfig {
            max_cells_x: 60,
            max_cells_y: 60,
            max_cells_z: 30,
            ..Default::default()
        }
    }

    fn test_params() -> SearchParams {
        SearchParams {
            xy_step: 1.0,
            z_step: 1.0,
            x_range: (-1.0, 1.0),
            y_range: (-1.0, 1.0),
            z_range: (0.0, 0.0),
            horizontal_distance: 5.0,
            down_sample_factor: 1.0,
        }
    }

    #[test]
    fn test_track_emits_one_score_per_candidate() {
        let mut tracker = DensityGridTracker::new(test_config());
        let mut cloud = PointCloud3D::new();
        cloud.push_xyz(0.0, 0.0, 0.0);
        let centroid = cloud.centroid().unwrap();

        let motion = GaussianMotionModel::isotropic(1.0);
        let mut sink = ScoredTransforms::new();
        tracker
            .track(&test_params(), &cloud, &cloud, centroid, &motion, &mut sink)
            .unwrap();

        assert_eq!(sink.len(), 9);
        assert!(sink.iter().all(|s| s.log_prob.is_finite()));
        assert!(sink.iter().all(|s| s.volume == 1.0));
    }

    #[test]
    fn test_track_is_deterministic() {
        let mut tracker = DensityGridTracker::new(test_config());
        let mut cloud = PointCloud3D::new();
        cloud.push_xyz(0.2, -0.1, 0.05);
        cloud.push_xyz(-0.3, 0.4, 0.1);
        cloud.push_xyz(0.0, 0.0, 0.0);
        let centroid = cloud.centroid().unwrap();

        let motion = GaussianMotionModel::isotropic(1.0);
        let params = SearchParams {
            xy_step: 0.5,
            ..test_params()
        };

        let mut first = ScoredTransforms::new();
        tracker
            .track(&params, &cloud, &cloud, centroid, &motion, &mut first)
            .unwrap();

        let mut second = ScoredTransforms::new();
        tracker
            .track(&params, &cloud, &cloud, centroid, &motion, &mut second)
            .unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.log_prob, b.log_prob, "scores must be reproducible");
        }
    }

    #[test]
    fn test_track_clears_sink() {
        let mut tracker = DensityGridTracker::new(test_config());
        let mut cloud = PointCloud3D::new();
        cloud.push_xyz(0.0, 0.0, 0.0);
        let centroid = cloud.centroid().unwrap();

        let motion = GaussianMotionModel::isotropic(1.0);
        let mut sink = ScoredTransforms::new();

        tracker
            .track(&test_params(), &cloud, &cloud, centroid, &motion, &mut sink)
            .unwrap();
        tracker
            .track(&test_params(), &cloud, &cloud, centroid, &motion, &mut sink)
            .unwrap();

        // Not 18: each call starts from a cleared sink
        assert_eq!(sink.len(), 9);
    }

    #[test]
    fn test_track_propagates_bad_params() {
        let mut tracker = DensityGridTracker::new(test_config());
        let mut cloud = PointCloud3D::new();
        cloud.push_xyz(0.0, 0.0, 0.0);
        let centroid = cloud.centroid().unwrap();

        let motion = GaussianMotionModel::isotropic(1.0);
        let mut sink = ScoredTransforms::new();
        let params = SearchParams {
            xy_step: 0.0,
            ..test_params()
        };

        assert!(
            tracker
                .track(&params, &cloud, &cloud, centroid, &motion, &mut sink)
                .is_err()
        );
    }
}
