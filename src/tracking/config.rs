//! Density-grid measurement model configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the density-grid measurement model.
///
/// Each previous-scan point is modeled as a Gaussian
/// `exp(-d² / 2σ²) + smoothing_factor`, where σ² combines the candidate
/// sampling resolution, the sensor resolution at the object's range,
/// and a fixed sensor noise floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensityGridConfig {
    /// Density floor added to the Gaussian so no alignment ever scores
    /// zero probability.
    /// Typical: 0.8
    pub smoothing_factor: f32,

    /// How far to spill density into neighboring grid cells, in sigmas.
    /// Typical: 2.0
    pub spillover_sigmas: f32,

    /// Factor applied to the sensor resolution when deriving the
    /// measurement sigma.
    /// Typical: 0.5
    pub sensor_sigma_factor: f32,

    /// Factor applied to the candidate sampling resolution when
    /// deriving the measurement sigma.
    /// Typical: 1.0
    pub sampling_sigma_factor: f32,

    /// Sensor noise independent of the distance to the tracked object
    /// (meters).
    /// Typical: 0.03
    pub sensor_noise_floor: f32,

    /// Number of scan points treated as statistically independent
    /// measurements.
    ///
    /// Beyond this count the measurement log-likelihood is discounted
    /// proportionally, since neighboring points are correlated.
    pub max_independent_points: f32,

    /// Base factor applied to the measurement log-likelihood before
    /// fusing with the motion prior. Must be ≤ 1.
    pub measurement_discount: f32,

    /// Horizontal angular spacing between sensor beams (radians).
    ///
    /// The effective horizontal resolution at range `d` is
    /// `2 d tan(spacing / 2)`, degraded by any scan down-sampling.
    pub horizontal_res_rad: f32,

    /// Vertical beam spacing as a multiple of the horizontal spacing.
    /// Typical: 2.2 for a spinning multi-beam LiDAR.
    pub vertical_res_factor: f32,

    /// Maximum grid cells along x.
    ///
    /// At 1.2 cm resolution, a 10 m wide object spans 1000 cells.
    /// Caps worst-case memory regardless of scan extent.
    pub max_cells_x: usize,

    /// Maximum grid cells along y.
    pub max_cells_y: usize,

    /// Maximum grid cells along z.
    ///
    /// At 1.2 cm resolution, a 5 m tall object spans 500 cells.
    pub max_cells_z: usize,
}

impl Default for DensityGridConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.8,
            spillover_sigmas: 2.0,
            sensor_sigma_factor: 0.5,
            sampling_sigma_factor: 1.0,
            sensor_noise_floor: 0.03,
            max_independent_points: 150.0,
            measurement_discount: 1.0,
            horizontal_res_rad: 0.18_f32.to_radians(),
            vertical_res_factor: 2.2,
            max_cells_x: 1000,
            max_cells_y: 1000,
            max_cells_z: 500,
        }
    }
}

impl DensityGridConfig {
    /// Create a configuration with reduced grid maxima.
    ///
    /// Caps the backing store at ~16 MB instead of ~2 GB, for
    /// memory-constrained deployments and tests. Objects larger than
    /// `max_cells × step` along an axis get their grid clamped.
    pub fn compact() -> Self {
        Self {
            max_cells_x: 200,
            max_cells_y: 200,
            max_cells_z: 100,
            ..Default::default()
        }
    }

    /// Total cell count of the backing store at the configured maxima.
    pub fn max_cell_count(&self) -> usize {
        self.max_cells_x * self.max_cells_y * self.max_cells_z
    }
}
