//! Decoded RGBA8 pixel buffers and the grayscale ink rule.

use config::constants::TRANSPARENT_GRAY;

use crate::error::{ConvertError, Result};

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// A decoded image: `width * height` RGBA8 pixels, row-major, row 0 first.
///
/// Decoding an encoded file into this form is the caller's job (the CLI uses
/// the `image` crate, the browser hands over canvas `ImageData`).
///
/// # Examples
/// ```
/// use img2stl::PixelBuffer;
///
/// let pixels = PixelBuffer::new(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
/// assert_eq!(pixels.rgba(0, 0), [0, 0, 0, 255]);
/// assert_eq!(pixels.gray(1, 0), 255);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps raw RGBA bytes, checking that the dimensions match the length.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidInput`] for a zero dimension or a byte
    /// length other than `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConvertError::invalid_input(format!(
                "image dimensions must be at least 1x1, got {width}x{height}"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| {
                ConvertError::invalid_input(format!("image {width}x{height} is too large"))
            })?;
        if data.len() != expected {
            return Err(ConvertError::invalid_input(format!(
                "expected {expected} RGBA bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a buffer by evaluating `f(x, y)` for every pixel.
    ///
    /// # Examples
    /// ```
    /// use img2stl::PixelBuffer;
    ///
    /// let checker = PixelBuffer::from_fn(4, 4, |x, y| {
    ///     if (x + y) % 2 == 0 { [0, 0, 0, 255] } else { [255, 255, 255, 255] }
    /// }).unwrap();
    /// assert_eq!(checker.count_ink(128), 8);
    /// ```
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Result<Self> {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The longer of width and height.
    #[inline]
    pub fn max_dimension(&self) -> u32 {
        self.width.max(self.height)
    }

    /// RGBA channels of the pixel at `(x, y)`.
    ///
    /// Panics if the coordinate is outside the image.
    #[inline]
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Gray value of the pixel at `(x, y)`; see [`gray_value`].
    #[inline]
    pub fn gray(&self, x: u32, y: u32) -> u8 {
        gray_value(self.rgba(x, y))
    }

    /// Whether the pixel at `(x, y)` counts as ink under `threshold`.
    #[inline]
    pub fn is_ink(&self, x: u32, y: u32, threshold: u8) -> bool {
        self.gray(x, y) < threshold
    }

    /// Number of ink pixels at full resolution.
    pub fn count_ink(&self, threshold: u8) -> usize {
        self.data
            .chunks_exact(CHANNELS)
            .filter(|px| gray_value([px[0], px[1], px[2], px[3]]) < threshold)
            .count()
    }
}

/// Gray value of one RGBA pixel.
///
/// Fully transparent pixels are white regardless of color. Otherwise the
/// channel mean rounded to nearest; a sum of three integers divided by three
/// never lands on `.5`, so `(sum + 1) / 3` rounds exactly.
///
/// # Examples
/// ```
/// use img2stl::pixels::gray_value;
///
/// assert_eq!(gray_value([0, 0, 1, 255]), 0);   // 0.33 rounds down
/// assert_eq!(gray_value([0, 1, 1, 255]), 1);   // 0.67 rounds up
/// assert_eq!(gray_value([0, 0, 0, 0]), 255);   // transparent
/// ```
#[inline]
pub fn gray_value([r, g, b, a]: [u8; 4]) -> u8 {
    if a == 0 {
        return TRANSPARENT_GRAY;
    }
    let sum = u16::from(r) + u16::from(g) + u16::from(b);
    // max (765 + 1) / 3 = 255
    ((sum + 1) / 3) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 3, Vec::new()),
            Err(ConvertError::InvalidInput { .. })
        ));
        assert!(matches!(
            PixelBuffer::new(3, 0, Vec::new()),
            Err(ConvertError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(err.to_string().contains("expected 16 RGBA bytes"));
    }

    #[test]
    fn test_gray_rounds_to_nearest() {
        assert_eq!(gray_value([10, 20, 30, 255]), 20);
        assert_eq!(gray_value([100, 100, 101, 255]), 100);
        assert_eq!(gray_value([100, 101, 101, 255]), 101);
        assert_eq!(gray_value([255, 255, 255, 255]), 255);
    }

    #[test]
    fn test_transparent_ignores_color() {
        assert_eq!(gray_value([0, 0, 0, 0]), 255);
        // any non-zero alpha uses the color
        assert_eq!(gray_value([0, 0, 0, 1]), 0);
    }

    #[test]
    fn test_ink_is_strictly_below_threshold() {
        let pixels = PixelBuffer::new(1, 1, vec![128, 128, 128, 255]).unwrap();
        assert!(!pixels.is_ink(0, 0, 128));
        assert!(pixels.is_ink(0, 0, 129));
    }

    #[test]
    fn test_threshold_monotonicity() {
        for gray in [0u8, 1, 64, 127, 128, 200, 254, 255] {
            let px = [gray, gray, gray, 255];
            let mut was_ink = false;
            for threshold in 0..=255u8 {
                let ink = gray_value(px) < threshold;
                assert!(!was_ink || ink, "gray {gray} flipped back at {threshold}");
                was_ink = ink;
            }
        }
    }

    #[test]
    fn test_count_ink() {
        let pixels = PixelBuffer::from_fn(3, 2, |x, _| match x {
            0 => [0, 0, 0, 255],
            1 => [0, 0, 0, 0],
            _ => [200, 200, 200, 255],
        })
        .unwrap();
        assert_eq!(pixels.count_ink(128), 2);
        assert_eq!(pixels.count_ink(255), 4);
        assert_eq!(pixels.count_ink(0), 0);
    }
}
