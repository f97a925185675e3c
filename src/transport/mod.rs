//! # Parallel Bus Transport Layer
//!
//! This module provides the hardware-facing side of the driver: the
//! [`ParallelBus`] capability and its implementations.
//!
//! ## Available Transports
//!
//! - [`mcp23017`]: MCP23017 16-bit I2C GPIO expander wired as a Centronics
//!   port (PORTA = data lines, PORTB = control/status lines)
//! - [`i2c`]: the raw I2C byte/register capability plus a Linux
//!   `/dev/i2c-N` implementation
//! - [`mock`]: scripted in-memory bus for tests
//!
//! ## Design
//!
//! Hardware variants (different expanders, direct GPIO) are modeled as
//! implementations of the single [`ParallelBus`] trait, selected at
//! construction time. The handshake engine is the only consumer; it owns
//! the bus exclusively, so no two transfers can interleave byte-level
//! writes.

pub mod i2c;
pub mod mcp23017;
pub mod mock;

pub use i2c::I2cBus;
#[cfg(unix)]
pub use i2c::LinuxI2cDev;
pub use mcp23017::Mcp23017Port;
pub use mock::MockBus;

use crate::error::BusError;
use crate::status::PrinterStatus;

/// Host-driven lines of the parallel interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLine {
    /// Pulsed to tell the printer "data is valid, latch it now".
    Strobe,
    /// Held asserted to make the printer line-feed on every CR.
    Autofeed,
    /// Pulsed to hardware-reset the printer.
    Init,
}

/// Printer-driven lines of the parallel interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLine {
    Ack,
    Busy,
    PaperEnd,
    Select,
    Error,
}

/// Byte-level access to an emulated Centronics parallel port.
///
/// Implementations own the electrical details (register maps, active-low
/// polarity); callers deal only in data octets, logical line assertion, and
/// logical line levels.
pub trait ParallelBus {
    /// Latch an octet onto the data lines D0–D7.
    fn write_data(&mut self, value: u8) -> Result<(), BusError>;

    /// Drive a host-controlled line. `asserted` refers to the line's active
    /// state; whether that is electrically high or low is the
    /// implementation's concern. The level persists until changed.
    fn set_line(&mut self, line: OutputLine, asserted: bool) -> Result<(), BusError>;

    /// Read all printer-driven lines in one snapshot.
    ///
    /// This is a pure read with no side effects beyond the bus access
    /// itself. Each call reflects the current line state; nothing is
    /// cached.
    fn read_status(&mut self) -> Result<PrinterStatus, BusError>;

    /// Read a single printer-driven line level (`true` = high).
    fn read_line(&mut self, line: InputLine) -> Result<bool, BusError> {
        let status = self.read_status()?;
        Ok(match line {
            InputLine::Ack => status.ack,
            InputLine::Busy => status.busy,
            InputLine::PaperEnd => status.paper_end,
            InputLine::Select => status.select,
            InputLine::Error => status.error,
        })
    }
}
