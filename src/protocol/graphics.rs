//! # ESC/P Bit-Image Graphics
//!
//! Graphics on ESC/P impact printers are column-oriented: the head prints a
//! horizontal band whose height is the pin count covered by the selected
//! density mode, and the data for each pixel column travels as one or more
//! vertical bytes.
//!
//! ## Graphics Command
//!
//! | Format  | Bytes |
//! |---------|-------|
//! | ASCII   | ESC * m nl nh d1...dk |
//! | Hex     | 1B 2A m nl nh d1...dk |
//! | Decimal | 27 42 m nl nh d1...dk |
//!
//! `m` selects the density mode, `nl nh` is the column count little-endian,
//! and `k = columns × bytes_per_column`.
//!
//! ## Bit Packing
//!
//! Each byte covers an 8-pixel vertical slice of one column:
//!
//! ```text
//! bit 0 ->  o   top of the slice
//! bit 1 ->  o
//! ...
//! bit 7 ->  o   bottom of the slice
//! ```
//!
//! 1 = ink (black), 0 = no ink. Modes with 3 or 6 bytes per column stack
//! slices top to bottom: the first byte is the topmost 8 pixels.
//!
//! ## Bands
//!
//! A bitmap taller than one band is printed as `ceil(height / band_height)`
//! bands. Between bands the line spacing must equal the band height or the
//! output shows gaps or overlap; [`Printer::print_bitmap`] handles that
//! coupling (and restores the previous spacing).
//!
//! [`Printer::print_bitmap`]: crate::printer::Printer::print_bitmap

use crate::protocol::commands::{ESC, u16_le};
use crate::render::Bitmap;

// ============================================================================
// DENSITY MODES
// ============================================================================

/// Density mode byte for ESC `*`.
///
/// The first eight modes drive a single 8-pin pass (one byte per column)
/// and are the ones a 9-pin printer supports. The 24-dot and 48-dot modes
/// (3 and 6 bytes per column) address the taller heads of later ESC/P
/// devices and are included for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityMode {
    /// 60 dpi horizontal, 8-dot column.
    Single = 0,
    /// 120 dpi horizontal.
    Double = 1,
    /// 120 dpi, adjacent dots suppressed (full carriage speed).
    DoubleSpeed = 2,
    /// 240 dpi horizontal.
    Quad = 3,
    /// 80 dpi, CRT screen aspect.
    Crt = 4,
    /// 72 dpi: square pixels at the 72 dpi vertical pitch. The usual
    /// choice for printing images.
    Plotter = 5,
    /// 90 dpi, CRT screen aspect II.
    CrtIi = 6,
    /// 144 dpi, double-density plotter.
    PlotterDouble = 7,
    /// 60 dpi, 24-dot column.
    Single24 = 32,
    /// 120 dpi, 24-dot column.
    Double24 = 33,
    /// 180 dpi, 24-dot column.
    Triple24 = 39,
    /// 360 dpi, 24-dot column.
    Hex24 = 40,
    /// 60 dpi, 48-dot column.
    Single48 = 71,
    /// 120 dpi, 48-dot column.
    Double48 = 72,
    /// 180 dpi, 48-dot column.
    Triple48 = 73,
}

impl DensityMode {
    /// The mode byte sent after ESC `*`.
    #[inline]
    pub const fn mode_byte(self) -> u8 {
        self as u8
    }

    /// How many data bytes encode one pixel column: 1, 3 or 6.
    #[inline]
    pub const fn bytes_per_column(self) -> usize {
        let m = self as u8;
        if m > 40 {
            6
        } else if m > 7 {
            3
        } else {
            1
        }
    }

    /// Pixel height of one printed band: 8 pixels per column byte.
    #[inline]
    pub const fn band_height(self) -> u32 {
        8 * self.bytes_per_column() as u32
    }

    /// Line spacing (in 1/216 inch units) that makes consecutive bands
    /// abut: 24 units per column byte at the 72 dpi vertical pitch.
    #[inline]
    pub const fn line_spacing_units(self) -> u8 {
        24 * self.bytes_per_column() as u8
    }
}

// ============================================================================
// COMMAND AND COLUMN PACKING
// ============================================================================

/// Build the graphics-mode introducer (ESC * m nl nh).
///
/// `columns` is the number of pixel columns that follow, little-endian.
/// The data itself is appended by the caller, `columns ×
/// bytes_per_column` bytes.
#[inline]
pub fn graphics_mode(density: DensityMode, columns: u16) -> Vec<u8> {
    let [nl, nh] = u16_le(columns);
    vec![ESC, b'*', density.mode_byte(), nl, nh]
}

/// Number of bands needed for a bitmap of `height` pixels.
#[inline]
pub fn band_count(height: u32, density: DensityMode) -> u32 {
    height.div_ceil(density.band_height())
}

/// Pack one band of a bitmap into column-interleaved graphics data.
///
/// `band` is the zero-based band index; the band covers pixel rows
/// `[band * band_height, (band + 1) * band_height)`. Output is
/// `width × bytes_per_column` bytes: for each column left to right, the
/// vertical slices top to bottom, bit 0 = top pixel of each slice. Rows at
/// or beyond the bitmap's height contribute no ink.
pub fn encode_band(bitmap: &Bitmap, band: u32, density: DensityMode) -> Vec<u8> {
    let bytes_per_column = density.bytes_per_column();
    let band_top = band * density.band_height();

    let mut data = Vec::with_capacity(bitmap.width() as usize * bytes_per_column);
    for x in 0..bitmap.width() {
        for slice in 0..bytes_per_column as u32 {
            let mut value = 0u8;
            for j in 0..8u32 {
                let y = band_top + 8 * slice + j;
                if y < bitmap.height() && bitmap.get(x, y) {
                    value |= 1 << j;
                }
            }
            data.push(value);
        }
    }
    data
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_bytes() {
        assert_eq!(DensityMode::Single.mode_byte(), 0);
        assert_eq!(DensityMode::Plotter.mode_byte(), 5);
        assert_eq!(DensityMode::Single24.mode_byte(), 32);
        assert_eq!(DensityMode::Triple48.mode_byte(), 73);
    }

    #[test]
    fn test_bytes_per_column() {
        assert_eq!(DensityMode::Single.bytes_per_column(), 1);
        assert_eq!(DensityMode::PlotterDouble.bytes_per_column(), 1);
        assert_eq!(DensityMode::Single24.bytes_per_column(), 3);
        assert_eq!(DensityMode::Hex24.bytes_per_column(), 3);
        assert_eq!(DensityMode::Single48.bytes_per_column(), 6);
    }

    #[test]
    fn test_band_geometry() {
        assert_eq!(DensityMode::Plotter.band_height(), 8);
        assert_eq!(DensityMode::Double24.band_height(), 24);
        assert_eq!(DensityMode::Double48.band_height(), 48);
        assert_eq!(DensityMode::Plotter.line_spacing_units(), 24);
        assert_eq!(DensityMode::Double24.line_spacing_units(), 72);
        assert_eq!(DensityMode::Double48.line_spacing_units(), 144);
    }

    #[test]
    fn test_graphics_mode_header() {
        assert_eq!(
            graphics_mode(DensityMode::Plotter, 480),
            vec![0x1B, 0x2A, 5, 0xE0, 0x01]
        );
        // Column count > 255 exercises the high byte
        assert_eq!(
            graphics_mode(DensityMode::Double, 300),
            vec![0x1B, 0x2A, 1, 0x2C, 0x01]
        );
    }

    #[test]
    fn test_band_count_is_ceiling() {
        let single = DensityMode::Plotter; // 8-pixel bands
        assert_eq!(band_count(1, single), 1);
        assert_eq!(band_count(8, single), 1);
        assert_eq!(band_count(9, single), 2);
        assert_eq!(band_count(24, single), 3);
        assert_eq!(band_count(25, DensityMode::Single24), 2);
    }

    #[test]
    fn test_full_black_column_is_ff() {
        let mut bitmap = Bitmap::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                bitmap.set(x, y, true);
            }
        }
        let data = encode_band(&bitmap, 0, DensityMode::Plotter);
        assert_eq!(data, vec![0xFF; 8]);
    }

    #[test]
    fn test_bit_zero_is_top_of_slice() {
        let mut bitmap = Bitmap::new(1, 8);
        bitmap.set(0, 0, true);
        assert_eq!(encode_band(&bitmap, 0, DensityMode::Plotter), vec![0x01]);

        let mut bitmap = Bitmap::new(1, 8);
        bitmap.set(0, 7, true);
        assert_eq!(encode_band(&bitmap, 0, DensityMode::Plotter), vec![0x80]);
    }

    #[test]
    fn test_partial_band_pads_with_no_ink() {
        // 12 rows tall: second band covers rows 8..16, rows 12..16 missing.
        let mut bitmap = Bitmap::new(2, 12);
        for y in 0..12 {
            bitmap.set(0, y, true);
            bitmap.set(1, y, true);
        }
        let data = encode_band(&bitmap, 1, DensityMode::Plotter);
        // Rows 8..12 inked -> bits 0..4 set, rest clear.
        assert_eq!(data, vec![0x0F, 0x0F]);
    }

    #[test]
    fn test_multi_byte_column_slices_stack_top_down() {
        // One column, 24 rows, only the bottom row inked: last slice,
        // bit 7.
        let mut bitmap = Bitmap::new(1, 24);
        bitmap.set(0, 23, true);
        let data = encode_band(&bitmap, 0, DensityMode::Single24);
        assert_eq!(data, vec![0x00, 0x00, 0x80]);
    }
}
