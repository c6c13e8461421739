//! # Config Crate
//!
//! Centralized configuration for the img2stl pipeline. All magic numbers and
//! tunable parameters live in [`constants`]; the per-conversion option set is
//! [`ConversionConfig`].
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_MAX_PX, DEFAULT_THRESHOLD};
//! use config::ConversionConfig;
//!
//! let cfg = ConversionConfig::default();
//! assert_eq!(cfg.threshold, DEFAULT_THRESHOLD);
//! assert_eq!(cfg.max_px.unwrap_or(DEFAULT_MAX_PX), 400);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Constants defined once, used everywhere
//! - **Immutable Options**: One config value per conversion, passed down
//! - **Format Exactness**: STL byte sizes are format-derived, not tunable

pub mod constants;
pub mod options;

pub use options::{ConfigError, ConversionConfig, ScaleSource};
