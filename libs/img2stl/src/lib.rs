//! # img2stl
//!
//! Turns the ink of a raster image into a 3D-printable solid.
//!
//! ## Architecture
//!
//! ```text
//! PixelBuffer (RGBA8, decoded by the caller)
//!       ↓  threshold, optional nearest-neighbor resample
//! Mask
//!       ↓  one cuboid per ink cell, shared walls culled
//! Triangles
//!       ↓  per-triangle normals, fixed 50-byte records
//! Binary STL
//! ```
//!
//! Every stage is a pure function of its inputs and a [`ConversionConfig`];
//! the command-line tool and the browser module are thin adapters over
//! [`convert`] / [`convert_into`].
//!
//! ## Usage
//!
//! ```rust
//! use config::ConversionConfig;
//! use img2stl::{convert, PixelBuffer};
//!
//! // A 3x3 black square on a transparent background.
//! let pixels = PixelBuffer::from_fn(5, 5, |x, y| {
//!     if (1..4).contains(&x) && (1..4).contains(&y) { [0, 0, 0, 255] } else { [0, 0, 0, 0] }
//! }).unwrap();
//!
//! let cfg = ConversionConfig::default().with_width_mm(25.0).with_thickness(3.0);
//! let conversion = convert(&pixels, &cfg).unwrap();
//! assert_eq!(conversion.report.foreground_cells, 9);
//! assert_eq!(conversion.stl.len(), conversion.report.byte_len);
//! ```

pub mod error;
pub mod estimate;
pub mod extrude;
pub mod mask;
pub mod mesh;
pub mod pipeline;
pub mod pixels;
pub mod resample;
pub mod stl;

pub use config::ConversionConfig;
pub use error::{ConvertError, Result};
pub use mask::Mask;
pub use mesh::{StlModel, Triangle};
pub use pipeline::{convert, convert_into, Conversion, ConversionReport, PixelBudget};
pub use pixels::PixelBuffer;
pub use stl::read_binary_stl;
