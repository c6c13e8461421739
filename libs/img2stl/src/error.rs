//! # Error Types
//!
//! Error types for the conversion pipeline. Every failure carries enough
//! context to tell which stage stopped and why.
//!
//! ## Error Policy
//!
//! - A failed conversion never produces a partial STL
//! - The size estimator is the only stage that recovers (see
//!   [`crate::estimate::EstimationFallback`])

use config::ConfigError;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while converting an image to STL.
///
/// ## Example
///
/// ```rust
/// use img2stl::{convert, ConvertError, PixelBuffer};
/// use config::ConversionConfig;
///
/// // A single white pixel has no ink.
/// let pixels = PixelBuffer::new(1, 1, vec![255, 255, 255, 255]).unwrap();
/// match convert(&pixels, &ConversionConfig::default()) {
///     Err(ConvertError::EmptyResult { .. }) => {}
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The pixel buffer is malformed or could not be decoded.
    #[error("Invalid input image: {message}")]
    InvalidInput {
        /// What is wrong with the input
        message: String,
    },

    /// Thresholding left no ink cells, so there is no solid to emit.
    #[error(
        "No foreground region detected in {width}x{height} mask \
         (threshold {threshold}{})",
        resample_note(.resampled)
    )]
    EmptyResult {
        /// Mask width in cells
        width: usize,
        /// Mask height in cells
        height: usize,
        /// Threshold that was applied
        threshold: u8,
        /// Whether the mask came from the resampler
        resampled: bool,
    },

    /// The conversion options failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Bytes handed to the STL reader do not follow the binary layout.
    #[error("Invalid binary STL: {message}")]
    InvalidStl {
        /// What is wrong with the data
        message: String,
    },

    /// Writing to the output sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn resample_note(resampled: &bool) -> &'static str {
    if *resampled {
        ", after resampling"
    } else {
        ""
    }
}

impl ConvertError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an invalid STL error.
    pub fn invalid_stl(message: impl Into<String>) -> Self {
        Self::InvalidStl {
            message: message.into(),
        }
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_display() {
        let err = ConvertError::EmptyResult {
            width: 4,
            height: 3,
            threshold: 0,
            resampled: false,
        };
        let text = err.to_string();
        assert!(text.contains("No foreground region detected"));
        assert!(text.contains("4x3"));
        assert!(!text.contains("resampling"));

        let err = ConvertError::EmptyResult {
            width: 4,
            height: 3,
            threshold: 10,
            resampled: true,
        };
        assert!(err.to_string().contains("after resampling"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: ConvertError = ConfigError::InvalidPixelBudget(0).into();
        assert!(err.to_string().contains("max_px"));
    }

    /// Errors cross thread boundaries in parallel callers.
    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConvertError>();
    }
}
