//! Candidate transform generation.
//!
//! Enumerates translation hypotheses on a fixed lattice over the
//! caller's search window. The search is currently horizontal: every
//! candidate carries z = 0, and vertical motion is absorbed by the
//! density grid's own z extent during scoring. The z range and step
//! remain first-class inputs so a vertical lattice can be enabled
//! without changing the interface.

use crate::core::types::XyzTransform;
use crate::tracking::error::{Result, TrackError};

/// Generate candidate translations over the given search ranges.
///
/// Produces every (x, y) pair on the `xy_step` lattice within the
/// inclusive x/y ranges, each combined with z = 0 and tagged with the
/// volume of search space it represents (`xy_step² × z_step`).
///
/// An empty range (max < min) yields no candidates along that axis;
/// a range narrower than one step yields exactly the lower bound.
pub fn candidate_transforms(
    xy_step: f32,
    z_step: f32,
    x_range: (f32, f32),
    y_range: (f32, f32),
    z_range: (f32, f32),
) -> Result<Vec<XyzTransform>> {
    if !xy_step.is_finite() || xy_step <= 0.0 {
        return Err(TrackError::InvalidXyStep(xy_step));
    }
    if !z_step.is_finite() || z_step <= 0.0 {
        return Err(TrackError::InvalidZStep(z_step));
    }

    let z_range = collapse_z_range(z_step, z_range);

    // Lattice extents, inclusive of both bounds.
    let num_x = lattice_len(x_range, xy_step);
    let num_y = lattice_len(y_range, xy_step);
    let num_z = lattice_len(z_range, z_step);

    let mut transforms = Vec::with_capacity(num_x * num_y * num_z);

    let volume = xy_step * xy_step * z_step;

    let mut x = x_range.0;
    while x <= x_range.1 {
        let mut y = y_range.0;
        while y <= y_range.1 {
            transforms.push(XyzTransform::new(x, y, 0.0, volume));
            y += xy_step;
        }
        x += xy_step;
    }

    Ok(transforms)
}

/// Collapse the z search range to the single value 0 when the step is
/// too coarse to resolve it.
fn collapse_z_range(z_step: f32, z_range: (f32, f32)) -> (f32, f32) {
    if z_step > z_range.0.abs() {
        (0.0, 0.0)
    } else {
        z_range
    }
}

/// Number of lattice positions within an inclusive range.
fn lattice_len(range: (f32, f32), step: f32) -> usize {
    (((range.1 - range.0) / step).floor().max(0.0) as usize) + 1
}
