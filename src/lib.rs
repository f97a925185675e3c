//! # Aguja - 9-pin Dot-Matrix Printer Driver
//!
//! Aguja is a Rust library for driving 9-pin ESC/P impact printers (tested
//! against a Tally MT81) through a bit-level emulation of the Centronics
//! parallel interface. It provides:
//!
//! - **Handshake engine**: the strobe/busy/ack byte-transfer state machine
//!   with injectable fault recovery
//! - **Protocol implementation**: validated ESC/P command builders
//! - **Raster encoder**: bitmap images in the column-interleaved graphics
//!   format
//! - **Transport**: MCP23017 I2C GPIO expander wired as a parallel port
//!
//! ## Quick Start
//!
//! ```no_run
//! use aguja::{
//!     printer::{Printer, handshake::AbortOnFault},
//!     protocol::graphics::DensityMode,
//!     render::Bitmap,
//!     transport::{LinuxI2cDev, Mcp23017Port},
//! };
//!
//! // Open the expander on the Pi's I2C bus
//! let i2c = LinuxI2cDev::open("/dev/i2c-1")?;
//! let port = Mcp23017Port::with_default_address(i2c)?;
//!
//! // One session owns the port; faults abort unless told otherwise
//! let mut printer = Printer::new(port, Box::new(AbortOnFault))?;
//!
//! printer.reset()?;
//! printer.bold_on()?;
//! printer.writeln("Aguja says hello")?;
//! printer.bold_off()?;
//!
//! // Print an image at 72 dpi (square pixels)
//! let logo = Bitmap::open("logo.png")?;
//! printer.print_bitmap(&logo, DensityMode::Plotter)?;
//!
//! # Ok::<(), aguja::error::PrintError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`printer`] | Session, handshake engine, line-ending policy |
//! | [`protocol`] | ESC/P command builders and graphics packing |
//! | [`render`] | Bitmap input for the raster encoder |
//! | [`transport`] | Parallel-bus emulations (MCP23017, mock) |
//! | [`status`] | Printer status snapshots and fault classification |
//! | [`markdown`] | Markdown-to-printer presentation layer |
//! | [`error`] | Error types |
//!
//! ## Supported Hardware
//!
//! Developed on a Raspberry Pi host with an MCP23017 expander; any
//! [`transport::ParallelBus`] implementation works, and any printer
//! speaking 9-pin ESC/P over Centronics should behave.

pub mod error;
pub mod markdown;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod status;
pub mod transport;

// Re-exports for convenience
pub use error::PrintError;
pub use printer::{LineEnding, Printer};
pub use render::Bitmap;
pub use status::PrinterStatus;
