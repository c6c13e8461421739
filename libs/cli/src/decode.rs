//! Image decoding via the `image` crate.

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;
use img2stl::PixelBuffer;

/// Decodes any supported image file into an RGBA pixel buffer.
pub fn load_pixels(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?;
    log::debug!(
        "decoded {} as {:?}, {}x{}",
        path.display(),
        image.color(),
        image.width(),
        image.height()
    );
    pixels_from_image(image.to_rgba8())
}

/// Moves an RGBA image into a [`PixelBuffer`] without copying.
pub fn pixels_from_image(image: RgbaImage) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    Ok(PixelBuffer::new(width, height, image.into_raw())?)
}
