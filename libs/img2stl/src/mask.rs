//! Binary foreground/background grid derived from a pixel buffer.

use crate::error::{ConvertError, Result};
use crate::pixels::PixelBuffer;

/// A row-major grid of ink cells.
///
/// Lookups outside the grid read as background, which is what closes the
/// outer walls during extrusion.
///
/// # Examples
/// ```
/// use img2stl::Mask;
///
/// let mask = Mask::from_cells(2, 1, vec![true, false]).unwrap();
/// assert!(mask.is_foreground(0, 0));
/// assert!(!mask.is_foreground(-1, 0));
/// assert_eq!(mask.foreground_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Mask {
    /// Thresholds every pixel: a cell is foreground iff its gray value is
    /// below `threshold`.
    pub fn from_pixels(pixels: &PixelBuffer, threshold: u8) -> Self {
        let width = pixels.width() as usize;
        let height = pixels.height() as usize;
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..pixels.height() {
            for x in 0..pixels.width() {
                cells.push(pixels.is_ink(x, y, threshold));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Wraps an existing cell grid.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidInput`] when a dimension is zero or the
    /// cell count does not match.
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConvertError::invalid_input(format!(
                "mask dimensions must be at least 1x1, got {width}x{height}"
            )));
        }
        if cells.len() != width * height {
            return Err(ConvertError::invalid_input(format!(
                "expected {} mask cells for {width}x{height}, got {}",
                width * height,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parses rows of `#` (foreground) and `.` (background).
    ///
    /// Handy for describing small shapes; every row must have the same length.
    ///
    /// # Examples
    /// ```
    /// use img2stl::Mask;
    ///
    /// let ring = Mask::from_ascii(&["###", "#.#", "###"]).unwrap();
    /// assert_eq!(ring.foreground_count(), 8);
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Result<Self> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut cells = Vec::with_capacity(width * rows.len());
        for row in rows {
            if row.chars().count() != width {
                return Err(ConvertError::invalid_input("mask rows differ in length"));
            }
            cells.extend(row.chars().map(|c| c == '#'));
        }
        Self::from_cells(width, rows.len(), cells)
    }

    pub(crate) fn from_raw(width: usize, height: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell at `(x, y)` is foreground. Out of bounds is background.
    #[inline]
    pub fn is_foreground(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Row `y` as a slice of cells.
    #[inline]
    pub fn row(&self, y: usize) -> &[bool] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Number of foreground cells.
    pub fn foreground_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// True when no cell is foreground.
    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&cell| cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> PixelBuffer {
        // gray 0, 50, 100, ..., 250 across one row
        PixelBuffer::from_fn(6, 1, |x, _| {
            let g = (x * 50) as u8;
            [g, g, g, 255]
        })
        .unwrap()
    }

    #[test]
    fn test_from_pixels_keeps_dimensions() {
        let pixels = PixelBuffer::from_fn(5, 3, |_, _| [0, 0, 0, 255]).unwrap();
        let mask = Mask::from_pixels(&pixels, 128);
        assert_eq!((mask.width(), mask.height()), (5, 3));
        assert_eq!(mask.foreground_count(), 15);
    }

    #[test]
    fn test_threshold_boundary() {
        let mask = Mask::from_pixels(&gradient(), 100);
        assert_eq!(mask.row(0), &[true, true, false, false, false, false]);
    }

    #[test]
    fn test_higher_threshold_only_adds_foreground() {
        let pixels = gradient();
        let mut previous = Mask::from_pixels(&pixels, 0);
        assert!(previous.is_empty());
        for threshold in 1..=255u8 {
            let next = Mask::from_pixels(&pixels, threshold);
            for x in 0..6 {
                if previous.is_foreground(x, 0) {
                    assert!(next.is_foreground(x, 0));
                }
            }
            previous = next;
        }
        assert_eq!(previous.foreground_count(), 6);
    }

    #[test]
    fn test_transparent_is_background() {
        let pixels = PixelBuffer::from_fn(2, 2, |_, _| [0, 0, 0, 0]).unwrap();
        assert!(Mask::from_pixels(&pixels, 255).is_empty());
    }

    #[test]
    fn test_out_of_bounds_is_background() {
        let mask = Mask::from_ascii(&["##", "##"]).unwrap();
        assert!(mask.is_foreground(1, 1));
        assert!(!mask.is_foreground(2, 0));
        assert!(!mask.is_foreground(0, 2));
        assert!(!mask.is_foreground(0, -1));
    }

    #[test]
    fn test_from_cells_validates() {
        assert!(Mask::from_cells(2, 2, vec![true; 3]).is_err());
        assert!(Mask::from_cells(0, 2, Vec::new()).is_err());
        assert!(Mask::from_ascii(&["##", "#"]).is_err());
        assert!(Mask::from_ascii(&[]).is_err());
    }
}
