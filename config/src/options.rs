//! Conversion options shared by every front end of the pipeline.
//!
//! A [`ConversionConfig`] is built once per conversion, validated, and then
//! passed down by reference. Nothing in the pipeline reads process-wide state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MM_PER_PIXEL, DEFAULT_MODEL_NAME, DEFAULT_THICKNESS_MM, DEFAULT_THRESHOLD,
};

/// Immutable set of options controlling one image-to-STL conversion.
///
/// Field names double as the JSON keys accepted by the browser adapter.
///
/// # Examples
/// ```
/// use config::ConversionConfig;
///
/// let cfg = ConversionConfig::default().with_width_mm(50.0).with_max_px(200);
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.threshold, 128);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    /// Extrusion depth in millimeters.
    pub thickness: f64,
    /// Grayscale cutoff; a pixel is ink iff its gray value is below this.
    pub threshold: u8,
    /// Desired physical width of the model in millimeters.
    pub width_mm: Option<f64>,
    /// Desired physical height of the model in millimeters. Used only when
    /// `width_mm` is absent.
    pub height_mm: Option<f64>,
    /// Hard pixel budget for the longer mask dimension.
    pub max_px: Option<u32>,
    /// Approximate output size in megabytes. Ignored when `max_px` is set.
    pub target_size_mb: Option<f64>,
    /// Name written into the STL header.
    pub name: String,
    /// Extrude rows in parallel. The output is identical to the serial path.
    pub parallel: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            thickness: DEFAULT_THICKNESS_MM,
            threshold: DEFAULT_THRESHOLD,
            width_mm: None,
            height_mm: None,
            max_px: None,
            target_size_mb: None,
            name: DEFAULT_MODEL_NAME.to_string(),
            parallel: false,
        }
    }
}

/// Which input drives the millimeters-per-pixel scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleSource {
    /// Scale derived from the requested physical width.
    Width(f64),
    /// Scale derived from the requested physical height.
    Height(f64),
    /// Fixed 96 DPI scale.
    Default,
}

impl ScaleSource {
    /// Millimeters per original pixel for an image of the given size.
    ///
    /// # Examples
    /// ```
    /// use config::ScaleSource;
    ///
    /// assert_eq!(ScaleSource::Width(100.0).mm_per_pixel(200, 50), 0.5);
    /// assert_eq!(ScaleSource::Height(100.0).mm_per_pixel(200, 50), 2.0);
    /// ```
    pub fn mm_per_pixel(self, width: u32, height: u32) -> f64 {
        match self {
            ScaleSource::Width(mm) => mm / f64::from(width),
            ScaleSource::Height(mm) => mm / f64::from(height),
            ScaleSource::Default => DEFAULT_MM_PER_PIXEL,
        }
    }
}

impl ConversionConfig {
    /// Checks every numeric option and returns the first violation.
    ///
    /// # Examples
    /// ```
    /// use config::{ConfigError, ConversionConfig};
    ///
    /// let cfg = ConversionConfig::default().with_thickness(0.0);
    /// assert_eq!(cfg.validate(), Err(ConfigError::InvalidThickness(0.0)));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.thickness) {
            return Err(ConfigError::InvalidThickness(self.thickness));
        }
        if let Some(width) = self.width_mm {
            if !is_positive(width) {
                return Err(ConfigError::InvalidWidth(width));
            }
        }
        if let Some(height) = self.height_mm {
            if !is_positive(height) {
                return Err(ConfigError::InvalidHeight(height));
            }
        }
        if self.max_px == Some(0) {
            return Err(ConfigError::InvalidPixelBudget(0));
        }
        Ok(())
    }

    /// Resolves which option drives the scale. Width wins over height.
    pub fn scale_source(&self) -> ScaleSource {
        match (self.width_mm, self.height_mm) {
            (Some(width), _) => ScaleSource::Width(width),
            (None, Some(height)) => ScaleSource::Height(height),
            (None, None) => ScaleSource::Default,
        }
    }

    /// Sets the extrusion depth.
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    /// Sets the grayscale threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Requests a physical width in millimeters.
    pub fn with_width_mm(mut self, width_mm: f64) -> Self {
        self.width_mm = Some(width_mm);
        self
    }

    /// Requests a physical height in millimeters.
    pub fn with_height_mm(mut self, height_mm: f64) -> Self {
        self.height_mm = Some(height_mm);
        self
    }

    /// Sets a hard pixel budget.
    pub fn with_max_px(mut self, max_px: u32) -> Self {
        self.max_px = Some(max_px);
        self
    }

    /// Sets an approximate output size in megabytes.
    pub fn with_target_size_mb(mut self, target_size_mb: f64) -> Self {
        self.target_size_mb = Some(target_size_mb);
        self
    }

    /// Sets the STL header name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables or disables parallel extrusion.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Thickness is zero, negative, or not finite.
    InvalidThickness(f64),
    /// Requested width is zero, negative, or not finite.
    InvalidWidth(f64),
    /// Requested height is zero, negative, or not finite.
    InvalidHeight(f64),
    /// Pixel budget of zero.
    InvalidPixelBudget(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThickness(value) => {
                write!(f, "thickness must be a positive number of millimeters: {value}")
            }
            ConfigError::InvalidWidth(value) => {
                write!(f, "width_mm must be a positive number: {value}")
            }
            ConfigError::InvalidHeight(value) => {
                write!(f, "height_mm must be a positive number: {value}")
            }
            ConfigError::InvalidPixelBudget(value) => {
                write!(f, "max_px must be at least 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
