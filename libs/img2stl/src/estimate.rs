//! Pixel budget estimation from a target STL file size.
//!
//! The triangle count of an extruded mask grows with its area, so the linear
//! pixel budget is scaled by the square root of the triangle ratio. The
//! result is approximate: the output lands near the target, not on it.

use config::constants::{
    AVG_TRIANGLES_PER_INK_PIXEL, MIN_ESTIMATE_RATIO, STL_PREAMBLE_BYTES, STL_TRIANGLE_BYTES,
};
use log::debug;
use thiserror::Error;

use crate::pixels::PixelBuffer;

/// The estimate hit a non-finite value; callers keep their budget unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("size estimate produced a non-finite value: {value}")]
pub struct EstimationFallback {
    /// The offending value.
    pub value: f64,
}

/// Number of triangles that fit in `target_bytes` of binary STL, at least 1.
///
/// # Examples
/// ```
/// use img2stl::estimate::desired_triangles;
///
/// assert_eq!(desired_triangles(84.0 + 50.0 * 1000.0), 1000);
/// assert_eq!(desired_triangles(10.0), 1);
/// ```
pub fn desired_triangles(target_bytes: f64) -> u64 {
    let target_bytes = target_bytes.floor().max(1.0);
    let available = (target_bytes - STL_PREAMBLE_BYTES as f64) / STL_TRIANGLE_BYTES as f64;
    available.floor().max(1.0) as u64
}

/// Estimates the pixel budget whose output is roughly `target_bytes` long.
///
/// Returns the longer image side when no downsampling is needed.
///
/// # Errors
/// Returns [`EstimationFallback`] when the target or an intermediate value is
/// not finite.
///
/// # Examples
/// ```
/// use img2stl::{estimate::estimate_pixel_budget, PixelBuffer};
///
/// let pixels = PixelBuffer::from_fn(100, 100, |_, _| [0, 0, 0, 255]).unwrap();
/// // 10 000 ink pixels estimate 60 000 triangles, far above ~2 000.
/// let budget = estimate_pixel_budget(100_000.0, &pixels, 128).unwrap();
/// assert!(budget < 100);
/// // A generous target keeps full resolution.
/// assert_eq!(estimate_pixel_budget(1.0e9, &pixels, 128).unwrap(), 100);
/// ```
pub fn estimate_pixel_budget(
    target_bytes: f64,
    pixels: &PixelBuffer,
    threshold: u8,
) -> Result<u32, EstimationFallback> {
    finite(target_bytes)?;
    let max_dimension = pixels.max_dimension();

    let desired = desired_triangles(target_bytes);
    let ink = pixels.count_ink(threshold);
    let estimated = finite((ink as f64 * AVG_TRIANGLES_PER_INK_PIXEL).floor().max(1.0))?;

    debug!("size estimate: {ink} ink pixels, ~{estimated} triangles, {desired} wanted");

    if estimated <= desired as f64 {
        return Ok(max_dimension);
    }

    let ratio = finite(desired as f64 / estimated)?;
    let linear_scale = ratio.max(MIN_ESTIMATE_RATIO).sqrt();
    let budget = finite((f64::from(max_dimension) * linear_scale).floor())?;
    Ok((budget as u32).max(1))
}

fn finite(value: f64) -> Result<f64, EstimationFallback> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EstimationFallback { value })
    }
}
