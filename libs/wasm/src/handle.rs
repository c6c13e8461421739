//! # Conversion Handle
//!
//! WASM-friendly wrapper around a finished conversion that can be handed to
//! JavaScript.

use img2stl::{Conversion, ConversionReport};
use wasm_bindgen::prelude::*;

/// STL bytes plus the size report of one conversion.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const ctx = canvas.getContext("2d");
/// const image = ctx.getImageData(0, 0, canvas.width, canvas.height);
/// const result = convert_rgba(image.data, image.width, image.height, '{"width_mm": 80}');
///
/// console.log(result.width_mm, result.height_mm, result.triangle_count);
///
/// const blob = new Blob([result.stl_bytes()], { type: "model/stl" });
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct ConversionHandle {
    stl: Vec<u8>,
    report: ConversionReport,
}

impl From<Conversion> for ConversionHandle {
    fn from(conversion: Conversion) -> Self {
        Self {
            stl: conversion.stl,
            report: conversion.report,
        }
    }
}

#[wasm_bindgen]
impl ConversionHandle {
    /// Physical model width in millimeters.
    #[wasm_bindgen(getter)]
    pub fn width_mm(&self) -> f64 {
        self.report.width_mm
    }

    /// Physical model height in millimeters.
    #[wasm_bindgen(getter)]
    pub fn height_mm(&self) -> f64 {
        self.report.height_mm
    }

    /// Millimeters per original image pixel.
    #[wasm_bindgen(getter)]
    pub fn scale_mm_per_pixel(&self) -> f64 {
        self.report.scale_mm_per_pixel
    }

    /// Number of triangles in the STL.
    #[wasm_bindgen(getter)]
    pub fn triangle_count(&self) -> u32 {
        u32::try_from(self.report.triangle_count).unwrap_or(u32::MAX)
    }

    /// Length of the STL in bytes.
    #[wasm_bindgen(getter)]
    pub fn byte_len(&self) -> u32 {
        u32::try_from(self.stl.len()).unwrap_or(u32::MAX)
    }

    /// Returns a copy of the binary STL as a Uint8Array.
    pub fn stl_bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.stl.as_slice())
    }

    /// Returns the full report as a JSON string.
    pub fn report_json(&self) -> String {
        // a report of plain numbers always serializes
        serde_json::to_string(&self.report).unwrap_or_default()
    }
}

impl ConversionHandle {
    /// Binary STL bytes, for native callers and tests.
    pub fn stl(&self) -> &[u8] {
        &self.stl
    }

    /// The conversion report, for native callers and tests.
    pub fn report(&self) -> &ConversionReport {
        &self.report
    }
}
