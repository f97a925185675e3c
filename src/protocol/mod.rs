//! # ESC/P Protocol Implementation
//!
//! Low-level command builders for the 9-pin ESC/P command language.
//!
//! ## Module Structure
//!
//! - [`commands`]: formatting and control commands (margins, pitch, styles,
//!   tabs, spacing, character tables)
//! - [`graphics`]: bit-image graphics mode and column packing
//! - [`glyph`]: user-defined character registration
//!
//! ## Usage Example
//!
//! ```
//! use aguja::protocol::commands;
//!
//! // Build a styled fragment by hand
//! let mut data = Vec::new();
//! data.extend(commands::reset());
//! data.extend(commands::bold_on());
//! data.extend(b"HEADING");
//! data.extend(commands::bold_off());
//! // Hand `data` to the handshake engine...
//! ```
//!
//! Builders with a parameter domain return
//! `Result<Vec<u8>, ValidationError>`; fixed sequences return `Vec<u8>`
//! directly. Nothing here touches the bus — transmission is the
//! [`printer`](crate::printer) module's job.
//!
//! ## Protocol Reference
//!
//! Escape sequences follow the Epson ESC/P standard as implemented by 9-pin
//! impact printers (tested against a Tally MT81).

pub mod commands;
pub mod glyph;
pub mod graphics;
