//! WASM-facing entry points for the img2stl pipeline.
//!
//! This crate is compiled to a `cdylib` and consumed from JavaScript via
//! `wasm-bindgen`. The browser decodes the image (canvas `ImageData`); this
//! crate receives raw RGBA bytes. Native tests use `convert_rgba_internal`
//! to avoid depending on a JS host.
//!
//! ```
//! let rgba = vec![0u8, 0, 0, 255];
//! let handle = img2stl_wasm::convert_rgba_internal(&rgba, 1, 1, "{}").unwrap();
//! assert_eq!(handle.report().triangle_count, 12);
//! ```

use config::ConversionConfig;
use img2stl::{convert, ConvertError, PixelBuffer};
use thiserror::Error;
use wasm_bindgen::prelude::*;

mod handle;

pub use handle::ConversionHandle;

/// Installs a panic hook that forwards Rust panics to the browser console.
///
/// # Examples
/// ```no_run
/// // In JavaScript: import and call once at startup.
/// // import { init_panic_hook } from "img2stl-wasm";
/// // init_panic_hook();
/// ```
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Returns the default conversion options as JSON, for pre-filling a form.
///
/// # Examples
/// ```
/// let json = img2stl_wasm::default_options();
/// assert!(json.contains("\"threshold\":128"));
/// ```
#[wasm_bindgen]
pub fn default_options() -> String {
    serde_json::to_string(&ConversionConfig::default()).unwrap_or_default()
}

/// Converts an RGBA buffer to binary STL.
///
/// `options_json` holds any subset of the conversion options
/// (`thickness`, `threshold`, `width_mm`, `height_mm`, `max_px`,
/// `target_size_mb`, `name`); an empty string means all defaults.
///
/// # Errors
/// Returns a JavaScript error value containing a human-readable message for
/// malformed options, a mismatched buffer, or an image without ink.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const result = convert_rgba(image.data, image.width, image.height, "{}");
/// ```
#[wasm_bindgen]
pub fn convert_rgba(
    rgba: &[u8],
    width: u32,
    height: u32,
    options_json: &str,
) -> Result<ConversionHandle, JsValue> {
    convert_rgba_internal(rgba, width, height, options_json)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Errors surfaced to JavaScript.
#[derive(Error, Debug)]
pub enum WasmError {
    /// The options string is not valid JSON for [`ConversionConfig`].
    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),

    /// The conversion itself failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Parses browser options. Parallel extrusion is always off in the browser.
pub fn parse_options(options_json: &str) -> Result<ConversionConfig, WasmError> {
    let config = if options_json.trim().is_empty() {
        ConversionConfig::default()
    } else {
        serde_json::from_str(options_json)?
    };
    Ok(config.with_parallel(false))
}

/// Host-only helper behind [`convert_rgba`], exposing Rust error types.
pub fn convert_rgba_internal(
    rgba: &[u8],
    width: u32,
    height: u32,
    options_json: &str,
) -> Result<ConversionHandle, WasmError> {
    let config = parse_options(options_json)?;
    let pixels = PixelBuffer::new(width, height, rgba.to_vec())?;
    Ok(convert(&pixels, &config)?.into())
}
