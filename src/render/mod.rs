//! # Raster Input
//!
//! Pixel sources for the graphics encoder.
//!
//! - [`bitmap`]: the binary pixel grid handed to
//!   [`Printer::print_bitmap`](crate::printer::Printer::print_bitmap),
//!   buildable programmatically or from image files

pub mod bitmap;

pub use bitmap::Bitmap;
