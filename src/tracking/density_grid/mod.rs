//! Bounded 3D density grid built from the previous scan.
//!
//! The grid discretizes the previous scan into log-density cells: each
//! cell holds the best log-density any nearby previous point can
//! explain it with (a max-combine, not a sum, so near-duplicate points
//! don't over-count). Cells start at the smoothing floor so no
//! alignment ever scores log(0), and the outermost cell shell never
//! receives spillover, representing the empty space around the tracked
//! object.
//!
//! The backing store is allocated once at the configured maxima and
//! reused every frame; only the sub-region used by the current frame
//! is reset before a rebuild. Per-frame rebuild cost is
//! O(points × spillover window), scoring cost is O(points) per
//! candidate.

mod spillover;

use crate::core::types::{Point3D, PointCloud3D};
use crate::tracking::config::DensityGridConfig;
use crate::tracking::error::{Result, TrackError};
use log::{debug, warn};
use spillover::SpilloverKernel;

/// Slack subtracted from the grid origin so points sitting exactly on
/// the low bounding-box face round into the interior.
const GRID_EPSILON: f32 = 1e-4;

/// Persistent density grid, rebuilt once per frame from the previous
/// scan and consulted once per candidate during scoring.
#[derive(Debug)]
pub struct DensityGrid {
    config: DensityGridConfig,

    /// Backing store, allocated once at the configured maxima.
    cells: Vec<f32>,

    /// Used extent for the current frame (≤ configured maxima).
    x_size: usize,
    y_size: usize,
    z_size: usize,

    /// Grid origin for the current frame.
    min_pt: Point3D,
    xy_step: f32,
    z_step: f32,

    /// Combined measurement sigma per axis group.
    sigma_xy: f32,
    sigma_z: f32,

    /// Spillover radius in whole cells per axis group.
    spill_steps_xy: usize,
    spill_steps_z: usize,

    /// Per-frame down-weighting of the measurement log-likelihood.
    discount_factor: f32,

    background_log_density: f32,
    min_density: f32,
}

impl DensityGrid {
    /// Allocate a grid at the configured maxima.
    ///
    /// This is the only allocation the grid ever makes; at the default
    /// maxima it is ~2 GB. Use [`DensityGridConfig::compact`] where
    /// that is too much.
    pub fn new(config: DensityGridConfig) -> Self {
        let background_log_density = config.smoothing_factor.ln();
        let cells = vec![background_log_density; config.max_cell_count()];
        let min_density = config.smoothing_factor;
        let discount_factor = config.measurement_discount;

        Self {
            config,
            cells,
            x_size: 0,
            y_size: 0,
            z_size: 0,
            min_pt: Point3D::default(),
            xy_step: 0.0,
            z_step: 0.0,
            sigma_xy: 0.0,
            sigma_z: 0.0,
            spill_steps_xy: 0,
            spill_steps_z: 0,
            discount_factor,
            background_log_density,
            min_density,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &DensityGridConfig {
        &self.config
    }

    /// Used grid dimensions for the current frame.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.x_size, self.y_size, self.z_size)
    }

    /// Grid origin for the current frame.
    pub fn origin(&self) -> Point3D {
        self.min_pt
    }

    /// Spillover radius in cells, (xy, z).
    pub fn spillover_steps(&self) -> (usize, usize) {
        (self.spill_steps_xy, self.spill_steps_z)
    }

    /// Per-frame measurement discount factor.
    pub fn discount_factor(&self) -> f32 {
        self.discount_factor
    }

    /// Log-density every untouched cell holds.
    pub fn background_log_density(&self) -> f32 {
        self.background_log_density
    }

    /// Log-density at a cell, or the background value outside the used
    /// extent.
    pub fn cell_log_density(&self, i: usize, j: usize, k: usize) -> f32 {
        if i < self.x_size && j < self.y_size && k < self.z_size {
            self.cells[self.cell_index(i, j, k)]
        } else {
            self.background_log_density
        }
    }

    /// Rebuild the grid from the previous scan.
    ///
    /// Sizes the used extent from the scan's padded bounding box,
    /// resets it to the background log-density, derives the per-axis
    /// measurement sigmas and spillover radii, and paints every point's
    /// Gaussian neighborhood into the interior cells.
    ///
    /// `horizontal_distance` is the sensor-to-object range used to
    /// derive the angular resolution; `down_sample_factor` degrades it
    /// for scans thinned upstream.
    pub fn rebuild(
        &mut self,
        previous: &PointCloud3D,
        xy_step: f32,
        z_step: f32,
        horizontal_distance: f32,
        down_sample_factor: f32,
    ) -> Result<()> {
        if !xy_step.is_finite() || xy_step <= 0.0 {
            return Err(TrackError::InvalidXyStep(xy_step));
        }
        if !z_step.is_finite() || z_step <= 0.0 {
            return Err(TrackError::InvalidZStep(z_step));
        }
        if !down_sample_factor.is_finite() || down_sample_factor <= 0.0 {
            return Err(TrackError::InvalidDownSampleFactor(down_sample_factor));
        }
        let (min, max) = previous.bounds().ok_or(TrackError::EmptyPreviousScan)?;

        self.xy_step = xy_step;
        self.z_step = z_step;

        // Points beyond the independence ceiling are correlated with
        // their neighbors; scale the measurement weight down so a dense
        // scan doesn't overwhelm the motion prior.
        let num_points = previous.len() as f32;
        self.discount_factor = if num_points < self.config.max_independent_points {
            self.config.measurement_discount
        } else {
            self.config.measurement_discount * (self.config.max_independent_points / num_points)
        };

        // Pad the bounding box by two grid steps per side; the outer
        // cells stay empty and represent the space around the object.
        let mut min_pt = Point3D::new(
            min.x - (2.0 * xy_step + GRID_EPSILON),
            min.y - (2.0 * xy_step + GRID_EPSILON),
            min.z,
        );

        // With a z step coarse relative to the object's height, center
        // the object within its grid cell.
        let z_centering = (z_step - (max.z - min.z)).abs() / 2.0;
        min_pt.z -= 2.0 * z_step + z_centering;

        let max_pt = Point3D::new(
            max.x + 2.0 * xy_step,
            max.y + 2.0 * xy_step,
            max.z + 2.0 * z_step,
        );

        self.min_pt = min_pt;
        self.x_size = used_dimension(max_pt.x - min_pt.x, xy_step, self.config.max_cells_x, "x");
        self.y_size = used_dimension(max_pt.y - min_pt.y, xy_step, self.config.max_cells_y, "y");
        self.z_size = used_dimension(max_pt.z - min_pt.z, z_step, self.config.max_cells_z, "z");

        // Reset only the sub-region this frame uses; the rest of the
        // backing store keeps stale values that are never read.
        let used = self.x_size * self.y_size * self.z_size;
        self.cells[..used].fill(self.background_log_density);

        // Sensor angular resolution at the object's range, degraded by
        // any upstream down-sampling of the scan.
        let horizontal_res = 2.0 * horizontal_distance * (self.config.horizontal_res_rad / 2.0).tan()
            / down_sample_factor;
        let vertical_res = self.config.vertical_res_factor * horizontal_res;

        // Three independent error sources combine by variance addition.
        let sampling_error_xy = self.config.sampling_sigma_factor * xy_step;
        let resolution_error_xy = horizontal_res * self.config.sensor_sigma_factor;
        let noise_error = self.config.sensor_noise_floor;
        self.sigma_xy = (sampling_error_xy * sampling_error_xy
            + resolution_error_xy * resolution_error_xy
            + noise_error * noise_error)
            .sqrt();

        // No sampling term along z while candidate search is horizontal.
        let resolution_error_z = vertical_res * self.config.sensor_sigma_factor;
        self.sigma_z = (resolution_error_z * resolution_error_z + noise_error * noise_error).sqrt();

        // Spillover radius in whole cells. The splatting loop requires
        // at least one cell of spill along z.
        self.spill_steps_xy = (self.config.spillover_sigmas * self.sigma_xy / xy_step - 1.0)
            .ceil()
            .max(0.0) as usize;
        self.spill_steps_z = (self.config.spillover_sigmas * self.sigma_z / z_step - 1.0)
            .ceil()
            .max(1.0) as usize;

        self.min_density = self.config.smoothing_factor;

        debug!(
            "density grid: {}x{}x{} cells, sigma ({:.4}, {:.4}), spill ({}, {}), discount {:.3}",
            self.x_size,
            self.y_size,
            self.z_size,
            self.sigma_xy,
            self.sigma_z,
            self.spill_steps_xy,
            self.spill_steps_z,
            self.discount_factor,
        );

        self.splat_points(previous, false);
        Ok(())
    }

    /// Total log-density of the current scan under the candidate
    /// translation (x, y, z).
    ///
    /// Every point is shifted by the candidate, snapped to its grid
    /// cell (clamped to the used extent) and looked up; the smoothing
    /// floor keeps the sum finite even when nothing aligns.
    pub fn measurement_log_density(&self, current: &PointCloud3D, x: f32, y: f32, z: f32) -> f32 {
        if self.x_size == 0 {
            return 0.0; // No frame built yet
        }

        // Index offset implementing the candidate shift.
        let x_offset = (x - self.min_pt.x) / self.xy_step;
        let y_offset = (y - self.min_pt.y) / self.xy_step;
        let z_offset = (z - self.min_pt.z) / self.z_step;

        let x_max = (self.x_size - 1) as i32;
        let y_max = (self.y_size - 1) as i32;
        let z_max = (self.z_size - 1) as i32;

        let mut total_log_density = 0.0f32;
        for i in 0..current.len() {
            let xi = ((current.xs[i] / self.xy_step + x_offset).round() as i32).clamp(0, x_max);
            let yi = ((current.ys[i] / self.xy_step + y_offset).round() as i32).clamp(0, y_max);
            let zi = ((current.zs[i] / self.z_step + z_offset).round() as i32).clamp(0, z_max);

            total_log_density +=
                self.cells[self.cell_index(xi as usize, yi as usize, zi as usize)];
        }

        total_log_density
    }

    /// Paint every point's spillover window into the interior cells
    /// with a max-combine.
    ///
    /// `force_general` exists so tests can run the general window loop
    /// where the unit-z fast path would normally apply.
    fn splat_points(&mut self, points: &PointCloud3D, force_general: bool) {
        // Offsets that map a point coordinate to its grid index.
        let x_offset = -self.min_pt.x / self.xy_step;
        let y_offset = -self.min_pt.y / self.xy_step;
        let z_offset = -self.min_pt.z / self.z_step;

        // Interior bounds per axis; the border shell never receives
        // spill. A dimension under 3 cells has no interior.
        let x_hi = self.x_size as i32 - 2;
        let y_hi = self.y_size as i32 - 2;
        let z_hi = self.z_size as i32 - 2;
        if x_hi < 1 || y_hi < 1 || z_hi < 1 {
            return;
        }

        let kernel = SpilloverKernel::build(
            self.spill_steps_xy,
            self.spill_steps_z,
            self.xy_step,
            self.z_step,
            self.sigma_xy,
            self.sigma_z,
            self.min_density,
        );

        let r_xy = self.spill_steps_xy as i32;
        let r_z = self.spill_steps_z as i32;

        for i in 0..points.len() {
            let x_index = (points.xs[i] / self.xy_step + x_offset).round() as i32;
            let y_index = (points.ys[i] / self.xy_step + y_offset).round() as i32;
            let z_index = (points.zs[i] / self.z_step + z_offset).round() as i32;

            // Intersect the spillover window with the interior. An
            // empty intersection (point clamped far outside the used
            // extent) contributes nothing on that axis.
            let min_x = (x_index - r_xy).max(1);
            let max_x = (x_index + r_xy).min(x_hi);
            let min_y = (y_index - r_xy).max(1);
            let max_y = (y_index + r_xy).min(y_hi);
            if min_x > max_x || min_y > max_y {
                continue;
            }

            if force_general || self.spill_steps_z > 1 {
                let min_z = (z_index - r_z).max(1);
                let max_z = (z_index + r_z).min(z_hi);
                if min_z > max_z {
                    continue;
                }

                for x_spill in min_x..=max_x {
                    let x_diff = (x_index - x_spill).unsigned_abs() as usize;
                    for y_spill in min_y..=max_y {
                        let y_diff = (y_index - y_spill).unsigned_abs() as usize;
                        for z_spill in min_z..=max_z {
                            let z_diff = (z_index - z_spill).unsigned_abs() as usize;

                            let spillover = kernel.get(x_diff, y_diff, z_diff);
                            let idx =
                                self.cell_index(x_spill as usize, y_spill as usize, z_spill as usize);
                            self.cells[idx] = self.cells[idx].max(spillover);
                        }
                    }
                }
            } else {
                // Unit z radius is the common case: spill reaches only
                // the point's own z layer plus one above and below, so
                // the two z values can be applied directly.
                let z_spill = z_index.clamp(1, z_hi) as usize;
                let z_up = (z_spill + 1).min(z_hi as usize);
                let z_down = z_spill.saturating_sub(1).max(1);

                for x_spill in min_x..=max_x {
                    let x_diff = (x_index - x_spill).unsigned_abs() as usize;
                    for y_spill in min_y..=max_y {
                        let y_diff = (y_index - y_spill).unsigned_abs() as usize;

                        let spillover0 = kernel.get(x_diff, y_diff, 0);
                        let idx = self.cell_index(x_spill as usize, y_spill as usize, z_spill);
                        self.cells[idx] = self.cells[idx].max(spillover0);

                        let spillover1 = kernel.get(x_diff, y_diff, 1);
                        let idx = self.cell_index(x_spill as usize, y_spill as usize, z_up);
                        self.cells[idx] = self.cells[idx].max(spillover1);

                        let idx = self.cell_index(x_spill as usize, y_spill as usize, z_down);
                        self.cells[idx] = self.cells[idx].max(spillover1);
                    }
                }
            }
        }
    }

    #[inline]
    fn cell_index(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < self.x_size && j < self.y_size && k < self.z_size);
        (i * self.y_size + j) * self.z_size + k
    }
}

/// Used cell count along one axis, clamped to the configured maximum.
fn used_dimension(extent: f32, step: f32, max_cells: usize, axis: &str) -> usize {
    let cells = (extent / step).ceil().max(1.0) as usize;
    if cells > max_cells {
        warn!("{axis} extent {extent:.2} m needs {cells} cells, clamping to {max_cells}");
        return max_cells;
    }
    cells
}
