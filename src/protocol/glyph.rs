//! # User-Defined Characters
//!
//! ESC/P printers accept custom glyphs into character RAM, addressable like
//! any other character code once the RAM table is selected
//! (`ESC %`, see [`commands::char_source`]).
//!
//! ## Glyph Data
//!
//! A glyph is a sequence of column bytes, left to right, each column eight
//! vertical dots with the **least significant bit at the bottom**. Draft
//! glyphs are exactly 11 columns; a layout byte carries the proportional
//! blank columns and the pin bank:
//!
//! ```text
//! layout = trailing + 16 * leading + 128 * upper_bank
//!          trailing: 1-11 blank columns after the glyph
//!          leading:  0-7 blank columns before the glyph (16-unit steps)
//!          upper_bank: use the top 8 pins of the 9-pin head
//! ```
//!
//! ## Registration Wire Format
//!
//! Draft (ESC & NUL s e): per glyph, the layout byte then 11 column bytes.
//! Codes `s..=e` are assigned in order.
//!
//! NLQ (ESC & NUL s e 0): per glyph, the column count, a zero, then the
//! column data — three bytes per column for the two-pass NLQ head.
//!
//! [`commands::char_source`]: crate::protocol::commands::char_source

use crate::error::ValidationError;
use crate::protocol::commands::{ESC, NUL};

/// Draft glyphs carry a fixed 11 columns of data.
pub const DRAFT_COLUMNS: usize = 11;

/// A user-defined character: column data plus proportional layout.
///
/// Owned by the caller and consumed by value when registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    data: Vec<u8>,
    leading_blanks: u8,
    trailing_blanks: u8,
    upper_bank: bool,
}

impl Glyph {
    /// A glyph with the given column data and the default layout
    /// (no leading blanks, one trailing blank, lower pin bank).
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            leading_blanks: 0,
            trailing_blanks: 1,
            upper_bank: false,
        }
    }

    /// Set the proportional layout: `leading` blank columns (0-7) before
    /// the glyph, `trailing` (1-11) after, and whether to print with the
    /// upper 8 pins of the head. Validated at registration.
    pub fn with_layout(mut self, leading: u8, trailing: u8, upper_bank: bool) -> Self {
        self.leading_blanks = leading;
        self.trailing_blanks = trailing;
        self.upper_bank = upper_bank;
        self
    }

    /// The column bytes, LSB = bottom dot.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The draft layout byte (see module docs).
    fn layout_byte(&self) -> u8 {
        self.trailing_blanks + 16 * self.leading_blanks + if self.upper_bank { 128 } else { 0 }
    }

    fn check_layout(&self) -> Result<(), ValidationError> {
        if self.leading_blanks > 7 {
            return Err(ValidationError::OutOfRange {
                argument: "leading blank columns",
                value: self.leading_blanks as i32,
                bounds: "0..=7",
            });
        }
        if self.trailing_blanks < 1 || self.trailing_blanks > 11 {
            return Err(ValidationError::OutOfRange {
                argument: "trailing blank columns",
                value: self.trailing_blanks as i32,
                bounds: "1..=11",
            });
        }
        Ok(())
    }
}

/// Check the start/end code pair and that the block stays within one byte.
fn check_codes(start_code: u8, count: usize) -> Result<u8, ValidationError> {
    if count == 0 {
        return Err(ValidationError::Empty { argument: "glyphs" });
    }
    let end = start_code as usize + count - 1;
    if end > 255 {
        return Err(ValidationError::OutOfRange {
            argument: "glyph end code",
            value: end as i32,
            bounds: "start + count - 1 <= 255",
        });
    }
    Ok(end as u8)
}

/// # Register Draft Glyphs (ESC & NUL s e ...)
///
/// Builds the registration sequence for consecutive character codes
/// starting at `start_code`. Each glyph contributes its layout byte and 11
/// column bytes.
///
/// ## Errors
///
/// - empty glyph list, or codes running past 255
/// - data length other than 11 columns
/// - layout fields outside their domains
pub fn define_draft_chars(start_code: u8, glyphs: &[Glyph]) -> Result<Vec<u8>, ValidationError> {
    let end_code = check_codes(start_code, glyphs.len())?;

    let mut cmd = Vec::with_capacity(5 + glyphs.len() * (1 + DRAFT_COLUMNS));
    cmd.extend_from_slice(&[ESC, b'&', NUL, start_code, end_code]);
    for glyph in glyphs {
        glyph.check_layout()?;
        if glyph.data.len() != DRAFT_COLUMNS {
            return Err(ValidationError::BadLength {
                argument: "draft glyph data",
                len: glyph.data.len(),
                expected: "exactly 11 columns",
            });
        }
        cmd.push(glyph.layout_byte());
        cmd.extend_from_slice(&glyph.data);
    }
    Ok(cmd)
}

/// # Register NLQ Glyphs (ESC & NUL s e 0 ...)
///
/// Builds the registration sequence for NLQ characters: per glyph the
/// column count, a zero, then the data. NLQ columns are three bytes each,
/// so the data length must be a multiple of 3. Layout metadata does not
/// apply to NLQ glyphs and is ignored.
pub fn define_nlq_chars(start_code: u8, glyphs: &[Glyph]) -> Result<Vec<u8>, ValidationError> {
    let end_code = check_codes(start_code, glyphs.len())?;

    let mut cmd = Vec::with_capacity(6 + glyphs.len() * 2);
    cmd.extend_from_slice(&[ESC, b'&', NUL, start_code, end_code, 0]);
    for glyph in glyphs {
        if glyph.data.is_empty() || glyph.data.len() % 3 != 0 {
            return Err(ValidationError::BadLength {
                argument: "NLQ glyph data",
                len: glyph.data.len(),
                expected: "a nonzero multiple of 3",
            });
        }
        cmd.push((glyph.data.len() / 3) as u8);
        cmd.push(0);
        cmd.extend_from_slice(&glyph.data);
    }
    Ok(cmd)
}

// ============================================================================
// TESTS
// ============================================================================
