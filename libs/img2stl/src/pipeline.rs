//! The conversion pipeline: pixels in, binary STL out.
//!
//! ```text
//! PixelBuffer → (budget) → Mask → Triangles → STL bytes → sink
//! ```

use std::io::Write;

use config::constants::{binary_stl_len, BYTES_PER_MEGABYTE, DEFAULT_MAX_PX};
use config::ConversionConfig;
use log::{debug, warn};
use serde::Serialize;

use crate::error::{ConvertError, Result};
use crate::estimate::estimate_pixel_budget;
use crate::extrude::{extrude, extrude_parallel, ExtrudeParams};
use crate::mask::Mask;
use crate::mesh::StlModel;
use crate::pixels::PixelBuffer;
use crate::resample::build_mask;

/// Where the pixel budget of a conversion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelBudget {
    /// `max_px` was given.
    Explicit(u32),
    /// Estimated from `target_size_mb`.
    TargetSize(u32),
    /// Neither was given; the default budget applies.
    Default(u32),
}

impl PixelBudget {
    /// Picks the budget with precedence `max_px` > `target_size_mb` > default.
    ///
    /// # Examples
    /// ```
    /// use config::ConversionConfig;
    /// use img2stl::{PixelBudget, PixelBuffer};
    ///
    /// let pixels = PixelBuffer::from_fn(10, 10, |_, _| [0, 0, 0, 255]).unwrap();
    /// let cfg = ConversionConfig::default().with_max_px(5).with_target_size_mb(1.0);
    /// assert_eq!(PixelBudget::resolve(&cfg, &pixels), PixelBudget::Explicit(5));
    /// ```
    pub fn resolve(config: &ConversionConfig, pixels: &PixelBuffer) -> Self {
        if let Some(max_px) = config.max_px {
            return PixelBudget::Explicit(max_px);
        }
        if let Some(target_mb) = config.target_size_mb {
            let target_bytes = target_mb * BYTES_PER_MEGABYTE;
            return match estimate_pixel_budget(target_bytes, pixels, config.threshold) {
                Ok(budget) => PixelBudget::TargetSize(budget),
                Err(fallback) => {
                    warn!("{fallback}; keeping full resolution");
                    PixelBudget::TargetSize(pixels.max_dimension())
                }
            };
        }
        PixelBudget::Default(DEFAULT_MAX_PX)
    }

    /// The budget value regardless of its source.
    pub fn value(self) -> u32 {
        match self {
            PixelBudget::Explicit(v) | PixelBudget::TargetSize(v) | PixelBudget::Default(v) => v,
        }
    }
}

/// What a conversion produced, measured on the original image so the numbers
/// do not depend on internal resampling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    /// Physical width of the model in millimeters.
    pub width_mm: f64,
    /// Physical height of the model in millimeters.
    pub height_mm: f64,
    /// Extrusion depth in millimeters.
    pub thickness_mm: f64,
    /// Millimeters per original pixel.
    pub scale_mm_per_pixel: f64,
    /// Millimeters per mask cell actually used by the extruder.
    pub effective_scale_mm_per_cell: f64,
    /// Original image width in pixels.
    pub image_width: u32,
    /// Original image height in pixels.
    pub image_height: u32,
    /// Mask width in cells.
    pub mask_width: usize,
    /// Mask height in cells.
    pub mask_height: usize,
    /// Whether the mask was downsampled.
    pub resampled: bool,
    /// The pixel budget and where it came from.
    pub pixel_budget: PixelBudget,
    /// Number of foreground cells in the mask.
    pub foreground_cells: usize,
    /// Number of triangles written.
    pub triangle_count: usize,
    /// Length of the STL output in bytes.
    pub byte_len: usize,
}

/// A finished conversion held in memory.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Binary STL bytes.
    pub stl: Vec<u8>,
    /// Size and scale report.
    pub report: ConversionReport,
}

/// Converts `pixels` to binary STL in memory.
///
/// # Errors
/// [`ConvertError::InvalidConfig`] for invalid options and
/// [`ConvertError::EmptyResult`] when no pixel is ink.
///
/// # Examples
/// ```
/// use config::ConversionConfig;
/// use img2stl::{convert, PixelBuffer};
///
/// let pixels = PixelBuffer::from_fn(2, 1, |_, _| [0, 0, 0, 255]).unwrap();
/// let conversion = convert(&pixels, &ConversionConfig::default().with_width_mm(10.0)).unwrap();
/// assert_eq!(conversion.report.triangle_count, 20);
/// assert_eq!(conversion.stl.len(), 84 + 50 * 20);
/// assert_eq!(conversion.report.width_mm, 10.0);
/// ```
pub fn convert(pixels: &PixelBuffer, config: &ConversionConfig) -> Result<Conversion> {
    let mut stl = Vec::new();
    let report = convert_into(pixels, config, &mut stl)?;
    Ok(Conversion { stl, report })
}

/// Converts `pixels` and writes the binary STL to `sink`.
///
/// Nothing is written when the conversion fails before serialization.
///
/// # Errors
/// As [`convert`], plus [`ConvertError::Io`] when the sink fails.
pub fn convert_into<W: Write>(
    pixels: &PixelBuffer,
    config: &ConversionConfig,
    sink: W,
) -> Result<ConversionReport> {
    config.validate()?;

    let budget = PixelBudget::resolve(config, pixels);
    let (mask, was_resampled) = build_mask(pixels, config.threshold, budget.value());
    debug!(
        "mask {}x{} from {}x{} image, budget {:?}",
        mask.width(),
        mask.height(),
        pixels.width(),
        pixels.height(),
        budget
    );

    let foreground_cells = mask.foreground_count();
    if foreground_cells == 0 {
        return Err(ConvertError::EmptyResult {
            width: mask.width(),
            height: mask.height(),
            threshold: config.threshold,
            resampled: was_resampled,
        });
    }

    let scale = config.scale_source().mm_per_pixel(pixels.width(), pixels.height());
    let effective_scale = effective_scale(scale, pixels, &mask);

    let params = ExtrudeParams::new(config.thickness, effective_scale);
    let triangles = if config.parallel {
        extrude_parallel(&mask, params)
    } else {
        extrude(&mask, params)
    };

    let model = StlModel::new(config.name.clone(), triangles);
    model.write_binary(sink)?;

    Ok(ConversionReport {
        width_mm: f64::from(pixels.width()) * scale,
        height_mm: f64::from(pixels.height()) * scale,
        thickness_mm: config.thickness,
        scale_mm_per_pixel: scale,
        effective_scale_mm_per_cell: effective_scale,
        image_width: pixels.width(),
        image_height: pixels.height(),
        mask_width: mask.width(),
        mask_height: mask.height(),
        resampled: was_resampled,
        pixel_budget: budget,
        foreground_cells,
        triangle_count: model.triangle_count(),
        byte_len: binary_stl_len(model.triangle_count()),
    })
}

/// Inflates the per-pixel scale by the long-side ratio.
///
/// The resampler maps the longer side onto exactly `max_px` cells, so both
/// axes land within half a cell of the original physical size.
fn effective_scale(scale: f64, pixels: &PixelBuffer, mask: &Mask) -> f64 {
    let mask_long = mask.width().max(mask.height());
    scale * f64::from(pixels.max_dimension()) / mask_long as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use config::constants::DEFAULT_MM_PER_PIXEL;

    fn solid(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |_, _| [0, 0, 0, 255]).unwrap()
    }

    #[test]
    fn test_budget_precedence() {
        let pixels = solid(50, 50);
        let cfg = ConversionConfig::default();
        assert_eq!(PixelBudget::resolve(&cfg, &pixels), PixelBudget::Default(400));

        let cfg = cfg.with_target_size_mb(100.0);
        assert_eq!(PixelBudget::resolve(&cfg, &pixels), PixelBudget::TargetSize(50));

        let cfg = cfg.with_max_px(7);
        assert_eq!(PixelBudget::resolve(&cfg, &pixels), PixelBudget::Explicit(7));
    }

    #[test]
    fn test_estimation_fallback_keeps_full_resolution() {
        let pixels = solid(30, 12);
        let cfg = ConversionConfig::default().with_target_size_mb(f64::INFINITY);
        assert_eq!(PixelBudget::resolve(&cfg, &pixels), PixelBudget::TargetSize(30));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_work() {
        let mut sink = Vec::new();
        let cfg = ConversionConfig::default().with_thickness(-1.0);
        let err = convert_into(&solid(2, 2), &cfg, &mut sink).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_default_scale_without_size() {
        let report = convert(&solid(3, 2), &ConversionConfig::default()).unwrap().report;
        assert_eq!(report.scale_mm_per_pixel, DEFAULT_MM_PER_PIXEL);
        assert_relative_eq!(report.width_mm, 3.0 * DEFAULT_MM_PER_PIXEL);
        assert!(!report.resampled);
        assert_eq!(report.effective_scale_mm_per_cell, report.scale_mm_per_pixel);
    }

    #[test]
    fn test_height_drives_scale() {
        let cfg = ConversionConfig::default().with_height_mm(40.0);
        let report = convert(&solid(10, 20), &cfg).unwrap().report;
        assert_eq!(report.scale_mm_per_pixel, 2.0);
        assert_eq!(report.width_mm, 20.0);
        assert_eq!(report.height_mm, 40.0);
    }

    #[test]
    fn test_resampling_preserves_physical_size() {
        let cfg = ConversionConfig::default().with_width_mm(100.0).with_max_px(40);
        let report = convert(&solid(200, 120), &cfg).unwrap().report;
        assert!(report.resampled);
        assert_eq!((report.mask_width, report.mask_height), (40, 24));
        assert_relative_eq!(
            report.mask_width as f64 * report.effective_scale_mm_per_cell,
            report.width_mm,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            report.mask_height as f64 * report.effective_scale_mm_per_cell,
            report.height_mm,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_effective_scale_follows_long_side() {
        // 3 columns round down to 1 cell; rows map 1000 -> 400
        let cfg = ConversionConfig::default().with_height_mm(100.0);
        let report = convert(&solid(3, 1000), &cfg).unwrap().report;
        assert_eq!((report.mask_width, report.mask_height), (1, 400));
        assert_relative_eq!(report.effective_scale_mm_per_cell, 0.25, max_relative = 1e-12);

        // width drives the scale but is the short side
        let cfg = ConversionConfig::default().with_width_mm(3.0);
        let report = convert(&solid(3, 1000), &cfg).unwrap().report;
        assert_relative_eq!(report.effective_scale_mm_per_cell, 2.5, max_relative = 1e-12);
        assert_relative_eq!(400.0 * report.effective_scale_mm_per_cell, report.height_mm);
    }

    #[test]
    fn test_report_matches_output() {
        let conversion = convert(&solid(4, 3), &ConversionConfig::default()).unwrap();
        assert_eq!(conversion.report.byte_len, conversion.stl.len());
        assert_eq!(conversion.report.foreground_cells, 12);
        // 12 cells * 4 caps + 14 perimeter edges * 2
        assert_eq!(conversion.report.triangle_count, 48 + 28);
    }
}
