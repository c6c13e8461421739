//! # Configuration Constants
//!
//! Centralized constants for the img2stl pipeline. Default conversion
//! parameters, binary STL layout sizes, and the size-estimation heuristics
//! are defined here.
//!
//! ## Categories
//!
//! - **Defaults**: Values used when a conversion option is not supplied
//! - **Format**: Exact byte sizes of the binary STL layout
//! - **Estimation**: Tunable heuristics used by the size estimator

// =============================================================================
// DEFAULT CONVERSION PARAMETERS
// =============================================================================

/// Default extrusion depth in millimeters.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_THICKNESS_MM;
///
/// let user_thickness: Option<f64> = None;
/// assert_eq!(user_thickness.unwrap_or(DEFAULT_THICKNESS_MM), 2.0);
/// ```
pub const DEFAULT_THICKNESS_MM: f64 = 2.0;

/// Default grayscale cutoff. A pixel is ink when its gray value is strictly
/// below the threshold.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_THRESHOLD;
///
/// let gray: u8 = 127;
/// assert!(gray < DEFAULT_THRESHOLD);
/// ```
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Screen resolution assumed when no physical size is requested.
pub const DEFAULT_DPI: f64 = 96.0;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Default scale in millimeters per pixel (96 DPI, about 0.2645833 mm).
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_MM_PER_PIXEL;
///
/// // A 96 pixel wide image is one inch wide.
/// assert!((96.0 * DEFAULT_MM_PER_PIXEL - 25.4).abs() < 1e-9);
/// ```
pub const DEFAULT_MM_PER_PIXEL: f64 = MM_PER_INCH / DEFAULT_DPI;

/// Default pixel budget for the longer mask dimension when neither an explicit
/// budget nor a target file size is given.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_MAX_PX;
///
/// let (width, height) = (1200u32, 300u32);
/// assert!(width.max(height) > DEFAULT_MAX_PX);
/// ```
pub const DEFAULT_MAX_PX: u32 = 400;

/// Name written into the STL header when none is supplied.
pub const DEFAULT_MODEL_NAME: &str = "img2stl";

/// Gray value assigned to fully transparent pixels. No threshold can turn it
/// into ink.
pub const TRANSPARENT_GRAY: u8 = 255;

// =============================================================================
// BINARY STL FORMAT
// =============================================================================

/// Length of the binary STL header (name/comment area).
pub const STL_HEADER_LEN: usize = 80;

/// Header plus the little-endian `u32` triangle count.
///
/// # Example
///
/// ```rust
/// use config::constants::{STL_HEADER_LEN, STL_PREAMBLE_BYTES};
///
/// assert_eq!(STL_PREAMBLE_BYTES, STL_HEADER_LEN + 4);
/// ```
pub const STL_PREAMBLE_BYTES: usize = 84;

/// Bytes per triangle record: normal, three vertices, attribute byte count.
///
/// # Example
///
/// ```rust
/// use config::constants::STL_TRIANGLE_BYTES;
///
/// // 12 floats of 4 bytes plus a 2-byte attribute field
/// assert_eq!(STL_TRIANGLE_BYTES, 12 * 4 + 2);
/// ```
pub const STL_TRIANGLE_BYTES: usize = 50;

// =============================================================================
// SIZE ESTIMATION
// =============================================================================

/// Average number of triangles emitted per ink pixel.
///
/// Two top, two bottom, and a share of the side walls averaged over typical
/// shapes. This is a tunable heuristic, not part of any format.
pub const AVG_TRIANGLES_PER_INK_PIXEL: f64 = 6.0;

/// Lower clamp applied to the triangle ratio before taking its square root.
pub const MIN_ESTIMATE_RATIO: f64 = 1e-6;

/// Bytes in one megabyte as used by the `target_size_mb` option.
///
/// # Example
///
/// ```rust
/// use config::constants::BYTES_PER_MEGABYTE;
///
/// let target_bytes = 1.5 * BYTES_PER_MEGABYTE;
/// assert_eq!(target_bytes, 1_572_864.0);
/// ```
pub const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Returns the exact size of a binary STL file holding `triangles` triangles.
///
/// # Example
///
/// ```rust
/// use config::constants::binary_stl_len;
///
/// assert_eq!(binary_stl_len(0), 84);
/// assert_eq!(binary_stl_len(12), 684);
/// ```
#[inline]
pub fn binary_stl_len(triangles: usize) -> usize {
    STL_PREAMBLE_BYTES + STL_TRIANGLE_BYTES * triangles
}
