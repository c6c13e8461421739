//! Nearest-neighbor downsampling to a pixel budget.
//!
//! Colors are sampled from the original pixels and thresholded afterwards.
//! Sampling an already thresholded mask would quantize twice.

use log::debug;

use crate::mask::Mask;
use crate::pixels::PixelBuffer;

/// Mask dimensions for an image scaled so its longer side is `max_px`.
///
/// Each side is rounded to nearest and never drops below one cell.
///
/// # Examples
/// ```
/// use img2stl::resample::target_dimensions;
///
/// assert_eq!(target_dimensions(1000, 500, 100), (100, 50));
/// assert_eq!(target_dimensions(1000, 3, 100), (100, 1));
/// ```
pub fn target_dimensions(width: u32, height: u32, max_px: u32) -> (usize, usize) {
    let ratio = f64::from(max_px) / f64::from(width.max(height));
    let scaled = |side: u32| ((f64::from(side) * ratio).round() as usize).max(1);
    (scaled(width), scaled(height))
}

/// Downsamples `pixels` so that the longer side fits `max_px`.
///
/// Returns `None` when the image already fits; the full-resolution mask is
/// then used unchanged.
///
/// # Examples
/// ```
/// use img2stl::{resample::resample, PixelBuffer};
///
/// let pixels = PixelBuffer::from_fn(8, 4, |_, _| [0, 0, 0, 255]).unwrap();
/// let mask = resample(&pixels, 128, 4).unwrap();
/// assert_eq!((mask.width(), mask.height()), (4, 2));
/// assert!(resample(&pixels, 128, 8).is_none());
/// ```
pub fn resample(pixels: &PixelBuffer, threshold: u8, max_px: u32) -> Option<Mask> {
    let (width, height) = (pixels.width(), pixels.height());
    if width.max(height) <= max_px {
        return None;
    }

    let (new_width, new_height) = target_dimensions(width, height, max_px);
    debug!("resampling {width}x{height} to {new_width}x{new_height} (budget {max_px})");

    let mut cells = Vec::with_capacity(new_width * new_height);
    for y2 in 0..new_height {
        let src_y = source_index(y2, height, new_height);
        for x2 in 0..new_width {
            let src_x = source_index(x2, width, new_width);
            cells.push(pixels.is_ink(src_x, src_y, threshold));
        }
    }
    Some(Mask::from_raw(new_width, new_height, cells))
}

/// Thresholds `pixels`, resampling first when the image exceeds `max_px`.
///
/// The flag tells whether the resampler ran.
///
/// # Examples
/// ```
/// use img2stl::{resample::build_mask, PixelBuffer};
///
/// let pixels = PixelBuffer::from_fn(6, 3, |_, _| [0, 0, 0, 255]).unwrap();
/// let (mask, resampled) = build_mask(&pixels, 128, 400);
/// assert!(!resampled);
/// assert_eq!(mask.width(), 6);
/// ```
pub fn build_mask(pixels: &PixelBuffer, threshold: u8, max_px: u32) -> (Mask, bool) {
    match resample(pixels, threshold, max_px) {
        Some(mask) => (mask, true),
        None => (Mask::from_pixels(pixels, threshold), false),
    }
}

/// `min(len - 1, floor(i * len / new_len))` in integer arithmetic.
#[inline]
fn source_index(i: usize, len: u32, new_len: usize) -> u32 {
    let src = (i as u64 * u64::from(len)) / new_len as u64;
    src.min(u64::from(len) - 1) as u32
}
