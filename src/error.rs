//! # Error Types
//!
//! This module defines the error taxonomy used throughout the aguja library.
//!
//! Three layers, strictly separated:
//!
//! - [`BusError`]: the transport could not read or write at all. Fatal to
//!   the current transfer, never retried.
//! - [`ValidationError`]: the caller passed an argument outside its
//!   documented ESC/P domain. Raised before anything touches the bus.
//! - [`PrintError`]: the umbrella returned by every operation that talks to
//!   the printer, including device faults the caller declined to recover.

use thiserror::Error;

use crate::status::FaultFlags;

/// Transport-level failure: the byte never made it on or off the bus.
///
/// A `BusError` aborts the transfer in progress immediately. It is distinct
/// from a printer-side fault (paper out, offline), which is recoverable and
/// reported as [`PrintError::Fault`].
#[derive(Debug, Error)]
pub enum BusError {
    /// A write to the bus or an output line failed.
    #[error("bus write failed: {0}")]
    Write(String),

    /// A read from the bus or an input line failed.
    #[error("bus read failed: {0}")]
    Read(String),

    /// The bus device could not be opened.
    #[error("failed to open bus device: {0}")]
    Open(String),
}

/// A caller-supplied argument violated its documented ESC/P domain.
///
/// Validation happens before any bytes are built, so a `ValidationError`
/// never leaves the printer in a half-written state.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A numeric parameter is outside its documented range.
    #[error("{argument} out of range: {value} (expected {bounds})")]
    OutOfRange {
        argument: &'static str,
        value: i32,
        bounds: &'static str,
    },

    /// A variable-length list exceeds the command's capacity.
    #[error("{argument} has {count} entries (at most {limit} allowed)")]
    TooMany {
        argument: &'static str,
        count: usize,
        limit: usize,
    },

    /// A list that must be strictly ascending is not. Duplicates land here
    /// too; they are a caller error, not something to dedup silently.
    #[error("{argument} must be strictly ascending: {value} follows {previous}")]
    NotAscending {
        argument: &'static str,
        previous: u8,
        value: u8,
    },

    /// A data blob has the wrong length for its command.
    #[error("{argument} has invalid length {len}: expected {expected}")]
    BadLength {
        argument: &'static str,
        len: usize,
        expected: &'static str,
    },

    /// A required list is empty.
    #[error("{argument} is empty")]
    Empty { argument: &'static str },
}

/// Main error type for operations that talk to the printer.
#[derive(Debug, Error)]
pub enum PrintError {
    /// Transport-level failure (fatal, see [`BusError`]).
    #[error("bus error: {0}")]
    Bus(#[from] BusError),

    /// The printer reported a fault and the recovery strategy chose to
    /// abort. Carries the exact flags observed at the moment of abort.
    #[error("printer fault: {0}")]
    Fault(FaultFlags),

    /// The printer never became ready within the configured poll budget.
    /// Only raised when a maximum poll count is set on the engine.
    #[error("printer did not become ready after {0} polls")]
    Timeout(u32),

    /// Invalid command argument (see [`ValidationError`]).
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Image decoding error (presentation layer).
    #[error("image error: {0}")]
    Image(String),

    /// I/O error wrapper (presentation layer).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
