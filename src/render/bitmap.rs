//! # Binary Bitmap
//!
//! The pixel grid consumed by the raster encoder: width × height cells,
//! each either ink or blank. Impact printers have no grayscale — a dot is
//! struck or it is not — so color and luma collapse to a threshold at load
//! time.

use std::path::Path;

use image::GrayImage;

use crate::error::PrintError;

/// Luma values below this count as ink when converting images.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// A width × height grid of ink/no-ink pixels, row-major, origin top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl Bitmap {
    /// An all-blank bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width as usize * height as usize],
        }
    }

    /// Decode an image file and threshold it to a bitmap.
    ///
    /// Any format the `image` crate recognizes works; pixels darker than
    /// [`DEFAULT_THRESHOLD`] become ink.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PrintError> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .map_err(|e| PrintError::Image(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_luma(&decoded.to_luma8(), DEFAULT_THRESHOLD))
    }

    /// Threshold a grayscale image: luma strictly below `threshold` = ink.
    pub fn from_luma(image: &GrayImage, threshold: u8) -> Self {
        let mut bitmap = Self::new(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel.0[0] < threshold {
                bitmap.set(x, y, true);
            }
        }
        bitmap
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y); `true` = ink.
    ///
    /// ## Panics
    ///
    /// Panics when (x, y) is outside the grid.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    ///
    /// ## Panics
    ///
    /// Panics when (x, y) is outside the grid.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, ink: bool) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[(y * self.width + x) as usize] = ink;
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_new_is_blank() {
        let bitmap = Bitmap::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                assert!(!bitmap.get(x, y));
            }
        }
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut bitmap = Bitmap::new(4, 3);
        bitmap.set(2, 1, true);
        assert!(bitmap.get(2, 1));
        assert!(!bitmap.get(1, 2));
        bitmap.set(2, 1, false);
        assert!(!bitmap.get(2, 1));
    }

    #[test]
    fn test_from_luma_threshold() {
        let mut image = GrayImage::new(2, 1);
        image.put_pixel(0, 0, Luma([0]));
        image.put_pixel(1, 0, Luma([200]));
        let bitmap = Bitmap::from_luma(&image, DEFAULT_THRESHOLD);
        assert!(bitmap.get(0, 0));
        assert!(!bitmap.get(1, 0));
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        let mut image = GrayImage::new(2, 1);
        image.put_pixel(0, 0, Luma([127]));
        image.put_pixel(1, 0, Luma([128]));
        let bitmap = Bitmap::from_luma(&image, 128);
        assert!(bitmap.get(0, 0));
        assert!(!bitmap.get(1, 0));
    }
}
