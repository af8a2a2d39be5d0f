//! Motion-model prior over candidate translations.

use serde::{Deserialize, Serialize};

/// Prior likelihood of a candidate translation, independent of the
/// point data.
///
/// Implementations return a probability in (0, 1]. A zero return maps
/// the fused score to negative infinity; the scorer propagates that
/// rather than treating it as an error.
pub trait MotionModel {
    /// Prior probability of translating by (dx, dy, dz) between frames.
    fn score(&self, dx: f32, dy: f32, dz: f32) -> f32;
}

/// Isotropic Gaussian-kernel prior centered on zero motion.
///
/// A stand-in for a full velocity-propagating motion model: useful for
/// tests, benches, and trackers without velocity history. The kernel
/// is unnormalized so the score stays in (0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GaussianMotionModel {
    /// Standard deviation of the horizontal translation prior (meters).
    pub sigma_xy: f32,
    /// Standard deviation of the vertical translation prior (meters).
    pub sigma_z: f32,
}

impl GaussianMotionModel {
    /// Create a prior with separate horizontal and vertical spreads.
    pub fn new(sigma_xy: f32, sigma_z: f32) -> Self {
        Self { sigma_xy, sigma_z }
    }

    /// Create a prior with the same spread on all axes.
    pub fn isotropic(sigma: f32) -> Self {
        Self {
            sigma_xy: sigma,
            sigma_z: sigma,
        }
    }
}

impl Default for GaussianMotionModel {
    fn default() -> Self {
        Self {
            sigma_xy: 0.5,
            sigma_z: 0.25,
        }
    }
}

impl MotionModel for GaussianMotionModel {
    fn score(&self, dx: f32, dy: f32, dz: f32) -> f32 {
        let horiz = (dx * dx + dy * dy) / (2.0 * self.sigma_xy * self.sigma_xy);
        let vert = (dz * dz) / (2.0 * self.sigma_z * self.sigma_z);
        (-(horiz + vert)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_motion_scores_one() {
        let model = GaussianMotionModel::isotropic(0.5);
        assert_relative_eq!(model.score(0.0, 0.0, 0.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_score_decays_with_distance() {
        let model = GaussianMotionModel::isotropic(0.5);
        let near = model.score(0.1, 0.0, 0.0);
        let far = model.score(1.0, 0.0, 0.0);

        assert!(near > far, "near {} should beat far {}", near, far);
        assert!(far > 0.0, "score must stay strictly positive");
    }

    #[test]
    fn test_horizontal_symmetry() {
        let model = GaussianMotionModel::isotropic(0.5);
        assert_relative_eq!(
            model.score(0.3, 0.0, 0.0),
            model.score(0.0, 0.3, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_anisotropic_axes() {
        let model = GaussianMotionModel::new(1.0, 0.1);
        // Same offset is much less likely vertically
        assert!(model.score(0.0, 0.0, 0.3) < model.score(0.3, 0.0, 0.0));
    }
}
