//! Precomputed discretized-Gaussian spillover table.
//!
//! A point landing in a grid cell contributes density to nearby cells
//! as a Gaussian of the physical offset, floored by the smoothing
//! constant so distant cells never reach log(0). The table is built
//! once per frame and indexed by absolute cell offset.

/// Log-density spillover values by cell offset, up to the per-axis
/// spillover radius.
#[derive(Debug)]
pub(crate) struct SpilloverKernel {
    /// Flat table, (xy_len × xy_len × z_len), row-major
    values: Vec<f32>,
    /// xy radius + 1
    xy_len: usize,
    /// z radius + 1
    z_len: usize,
}

impl SpilloverKernel {
    /// Build the table for the given radii and noise model.
    ///
    /// Each entry is `ln(exp((Δi² + Δj²)·fxy + Δk²·fz) + min_density)`
    /// where the exponent factors convert a cell count into the
    /// Gaussian exponent: `exp(-(n·step)² / 2σ²) = exp(n²·f)`.
    pub(crate) fn build(
        xy_radius: usize,
        z_radius: usize,
        xy_step: f32,
        z_step: f32,
        sigma_xy: f32,
        sigma_z: f32,
        min_density: f32,
    ) -> Self {
        let xy_exp_factor = -(xy_step * xy_step) / (2.0 * sigma_xy * sigma_xy);
        let z_exp_factor = -(z_step * z_step) / (2.0 * sigma_z * sigma_z);

        let xy_len = xy_radius + 1;
        let z_len = z_radius + 1;
        let mut values = Vec::with_capacity(xy_len * xy_len * z_len);

        for i in 0..xy_len {
            let i_dist_sq = (i * i) as f32;
            for j in 0..xy_len {
                let j_dist_sq = (j * j) as f32;
                let log_xy_density = (i_dist_sq + j_dist_sq) * xy_exp_factor;
                for k in 0..z_len {
                    let k_dist_sq = (k * k) as f32;
                    let log_z_density = k_dist_sq * z_exp_factor;
                    values.push(((log_xy_density + log_z_density).exp() + min_density).ln());
                }
            }
        }

        Self {
            values,
            xy_len,
            z_len,
        }
    }

    /// Spillover log-density at absolute cell offset (di, dj, dk).
    #[inline]
    pub(crate) fn get(&self, di: usize, dj: usize, dk: usize) -> f32 {
        debug_assert!(di < self.xy_len && dj < self.xy_len && dk < self.z_len);
        self.values[(di * self.xy_len + dj) * self.z_len + dk]
    }
}
