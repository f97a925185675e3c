//! # ESC/P Formatting and Control Commands
//!
//! This module implements the ESC/P command set of 9-pin impact printers as
//! pure byte-sequence builders.
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `BEL`, `SI`, `DC2`
//! - Two bytes: `ESC @`, `ESC E`, `ESC F`
//! - Multi-byte with parameters: `ESC C n`, `ESC D n1...nk NUL`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding unless a command's
//! documentation says otherwise:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`
//!
//! The one deliberate exception is the relative-position command's negative
//! encoding, documented at [`relative_position`].
//!
//! ## Validation
//!
//! Every parameter is checked against its documented domain before any byte
//! is built. Out-of-range arguments are a caller error
//! ([`ValidationError`]), never a protocol fault, and never reach the bus.

use crate::error::ValidationError;

// ============================================================================
// CONTROL CHARACTER CONSTANTS
// ============================================================================

/// NUL - list terminator in tab-stop commands
pub const NUL: u8 = 0x00;

/// BEL - sounds the printer beeper for 1/10 second
pub const BEL: u8 = 0x07;

/// HT (Horizontal Tab) - advance to the next horizontal tab stop
pub const HT: u8 = 0x09;

/// LF (Line Feed) - advance the paper one line
pub const LF: u8 = 0x0A;

/// VT (Vertical Tab) - advance to the next vertical tab stop
pub const VT: u8 = 0x0B;

/// FF (Form Feed) - advance to the next top-of-form
pub const FF: u8 = 0x0C;

/// CR (Carriage Return) - print the line buffer and return the head
pub const CR: u8 = 0x0D;

/// SI (Shift In) - select condensed printing
pub const SI: u8 = 0x0F;

/// DC2 (Device Control 2) - cancel condensed printing
pub const DC2: u8 = 0x12;

/// ESC (Escape) - command introducer
///
/// Every multi-byte ESC/P command begins with ESC (0x1B, decimal 27).
pub const ESC: u8 = 0x1B;

// ============================================================================
// ENCODING HELPERS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high].
///
/// ## Example
///
/// ```
/// use aguja::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(960), [0xC0, 0x03]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

/// Range check yielding the out-of-range error.
fn in_range(
    argument: &'static str,
    value: i32,
    lo: i32,
    hi: i32,
    bounds: &'static str,
) -> Result<(), ValidationError> {
    if value < lo || value > hi {
        return Err(ValidationError::OutOfRange {
            argument,
            value,
            bounds,
        });
    }
    Ok(())
}

// ============================================================================
// RESET AND ALERT
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state. Character RAM and some
/// configuration survive; use the INIT line for a hardware reset.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
#[inline]
pub fn reset() -> Vec<u8> {
    vec![ESC, b'@']
}

/// Beep the printer for 1/10 of a second (BEL).
#[inline]
pub fn beep() -> Vec<u8> {
    vec![BEL]
}

// ============================================================================
// PAGE GEOMETRY
// ============================================================================

/// # Set Page Length in Lines (ESC C n)
///
/// Sets the page length to `n` lines in the current line spacing.
///
/// ## Protocol Details
///
/// | Format  | Bytes   |
/// |---------|---------|
/// | ASCII   | ESC C n |
/// | Hex     | 1B 43 n |
/// | Decimal | 27 67 n |
///
/// ## Parameters
///
/// - `n`: page length in lines, 1-127
pub fn page_length_lines(n: u8) -> Result<Vec<u8>, ValidationError> {
    in_range("page length", n as i32, 1, 127, "1..=127 lines")?;
    Ok(vec![ESC, b'C', n])
}

/// # Set Page Length in Inches (ESC C NUL n)
///
/// A zero byte in the lines position switches the command to inch units.
///
/// ## Parameters
///
/// - `n`: page length in inches, 1-22
pub fn page_length_inches(n: u8) -> Result<Vec<u8>, ValidationError> {
    in_range("page length", n as i32, 1, 22, "1..=22 inches")?;
    Ok(vec![ESC, b'C', NUL, n])
}

/// Set the bottom margin on continuous paper to `n` lines (ESC N n),
/// measured from the top-of-form position of the next page. 1-127.
pub fn bottom_margin(n: u8) -> Result<Vec<u8>, ValidationError> {
    in_range("bottom margin", n as i32, 1, 127, "1..=127 lines")?;
    Ok(vec![ESC, b'N', n])
}

/// Cancel the top and bottom margins (ESC O), i.e. skip-over-perforation.
#[inline]
pub fn cancel_vertical_margins() -> Vec<u8> {
    vec![ESC, b'O']
}

/// Set the right margin to column `n` in the current pitch (ESC Q n). 1-255.
pub fn right_margin(n: u8) -> Result<Vec<u8>, ValidationError> {
    in_range("right margin", n as i32, 1, 255, "1..=255 columns")?;
    Ok(vec![ESC, b'Q', n])
}

/// Set the left margin to column `n` in the current pitch (ESC l n). 1-255.
pub fn left_margin(n: u8) -> Result<Vec<u8>, ValidationError> {
    in_range("left margin", n as i32, 1, 255, "1..=255 columns")?;
    Ok(vec![ESC, b'l', n])
}

// ============================================================================
// HEAD POSITIONING
// ============================================================================

/// # Absolute Horizontal Position (ESC $ nl nh)
///
/// Moves the print position to `n`/60 inch from the left margin.
///
/// ## Protocol Details
///
/// | Format  | Bytes        |
/// |---------|--------------|
/// | ASCII   | ESC $ nl nh  |
/// | Hex     | 1B 24 nl nh  |
/// | Decimal | 27 36 nl nh  |
///
/// ## Parameters
///
/// - `n`: target position in 1/60 inch units, 0-32767, little-endian
pub fn absolute_position(n: u16) -> Result<Vec<u8>, ValidationError> {
    in_range("absolute position", n as i32, 0, 32767, "0..=32767")?;
    let [nl, nh] = u16_le(n);
    Ok(vec![ESC, b'$', nl, nh])
}

/// # Relative Horizontal Position (ESC \ nl nh)
///
/// Moves the print position by `n`/120 inch, left or right.
///
/// ## Protocol Details
///
/// | Format  | Bytes        |
/// |---------|--------------|
/// | ASCII   | ESC \ nl nh  |
/// | Hex     | 1B 5C nl nh  |
/// | Decimal | 27 92 nl nh  |
///
/// ## Negative Encoding
///
/// Negative offsets do NOT use two's complement. The device's parser
/// expects:
///
/// ```text
/// nl = 32768 - (|n| mod 256)
/// nh = 32768 - (|n| div 256)
/// ```
///
/// with each value truncated to its low 8 bits on the wire. For example
/// `n = -1` encodes as `[0xFF, 0x00]`, where two's complement would give
/// `[0xFF, 0xFF]`. This quirk is preserved bit-for-bit.
///
/// ## Parameters
///
/// - `n`: signed offset in 1/120 inch units, -16384..=16384
pub fn relative_position(n: i16) -> Result<Vec<u8>, ValidationError> {
    in_range("relative position", n as i32, -16384, 16384, "-16384..=16384")?;
    let [nl, nh] = if n < 0 {
        let magnitude = -(n as i32);
        [
            (32768 - magnitude % 256) as u8,
            (32768 - magnitude / 256) as u8,
        ]
    } else {
        u16_le(n as u16)
    };
    Ok(vec![ESC, b'\\', nl, nh])
}

/// Advance the paper by `n`/216 inch (ESC J n). Performs no carriage return.
#[inline]
pub fn paper_feed(n: u8) -> Vec<u8> {
    vec![ESC, b'J', n]
}

/// Reverse-feed the paper by `n`/216 inch (ESC j n).
#[inline]
pub fn reverse_paper_feed(n: u8) -> Vec<u8> {
    vec![ESC, b'j', n]
}

/// Print `n` spaces (ESC f 0 n). 0-127.
pub fn horizontal_skip(n: u8) -> Result<Vec<u8>, ValidationError> {
    in_range("horizontal skip", n as i32, 0, 127, "0..=127 spaces")?;
    Ok(vec![ESC, b'f', 0, n])
}

/// Perform `n` line feeds followed by a carriage return (ESC f 1 n). 0-127.
pub fn vertical_skip(n: u8) -> Result<Vec<u8>, ValidationError> {
    in_range("vertical skip", n as i32, 0, 127, "0..=127 lines")?;
    Ok(vec![ESC, b'f', 1, n])
}

// ============================================================================
// LINE SPACING
// ============================================================================

/// Set line spacing to `n`/216 inch (ESC 3 n).
///
/// `n = 24` matches the 8-pin band height of single-byte graphics modes at
/// the 72 dpi vertical pitch, which is what makes multi-band images abut.
#[inline]
pub fn line_spacing(n: u8) -> Vec<u8> {
    vec![ESC, b'3', n]
}

/// Set line spacing to 1/8 inch (ESC 0).
#[inline]
pub fn line_spacing_one_eighth() -> Vec<u8> {
    vec![ESC, b'0']
}

/// Restore the default 1/6 inch line spacing (ESC 2).
#[inline]
pub fn line_spacing_default() -> Vec<u8> {
    vec![ESC, b'2']
}

// ============================================================================
// TAB STOPS
// ============================================================================

/// Validate a tab-stop list: bounded, each stop in 1-255, strictly
/// ascending. Duplicates are a caller error, not something to dedup.
fn check_tab_stops(
    argument: &'static str,
    stops: &[u8],
    limit: usize,
) -> Result<(), ValidationError> {
    if stops.is_empty() {
        return Err(ValidationError::Empty { argument });
    }
    if stops.len() > limit {
        return Err(ValidationError::TooMany {
            argument,
            count: stops.len(),
            limit,
        });
    }
    let mut previous: Option<u8> = None;
    for &stop in stops {
        in_range(argument, stop as i32, 1, 255, "1..=255")?;
        if let Some(prev) = previous {
            if stop <= prev {
                return Err(ValidationError::NotAscending {
                    argument,
                    previous: prev,
                    value: stop,
                });
            }
        }
        previous = Some(stop);
    }
    Ok(())
}

/// # Set Horizontal Tab Stops (ESC D n1...nk NUL)
///
/// Replaces the horizontal tab table with `stops`, positions in characters
/// from the left margin in the current pitch.
///
/// ## Protocol Details
///
/// | Format  | Bytes              |
/// |---------|--------------------|
/// | ASCII   | ESC D n1...nk NUL  |
/// | Hex     | 1B 44 n1...nk 00   |
/// | Decimal | 27 68 n1...nk 0    |
///
/// ## Parameters
///
/// - `stops`: up to 32 positions, each 1-255, strictly ascending. The zero
///   sentinel terminating the list is appended here; a zero inside the list
///   would truncate it at the device and is rejected.
pub fn horizontal_tabs(stops: &[u8]) -> Result<Vec<u8>, ValidationError> {
    check_tab_stops("horizontal tab stops", stops, 32)?;
    let mut cmd = Vec::with_capacity(3 + stops.len());
    cmd.push(ESC);
    cmd.push(b'D');
    cmd.extend_from_slice(stops);
    cmd.push(NUL);
    Ok(cmd)
}

/// Set vertical tab stops (ESC B n1...nk NUL), positions in lines from the
/// top of form. Up to 16 stops, each 1-255, strictly ascending,
/// zero-terminated like [`horizontal_tabs`].
pub fn vertical_tabs(stops: &[u8]) -> Result<Vec<u8>, ValidationError> {
    check_tab_stops("vertical tab stops", stops, 16)?;
    let mut cmd = Vec::with_capacity(3 + stops.len());
    cmd.push(ESC);
    cmd.push(b'B');
    cmd.extend_from_slice(stops);
    cmd.push(NUL);
    Ok(cmd)
}

/// Set a horizontal tab stop every `n` characters (ESC e 0 n).
///
/// The usable maximum depends on the active pitch (21 at 10 cpi, 25 at
/// 12 cpi, 36 condensed); the widest documented bound is enforced here.
pub fn horizontal_tab_increment(n: u8) -> Result<Vec<u8>, ValidationError> {
    in_range("horizontal tab increment", n as i32, 1, 36, "1..=36 columns")?;
    Ok(vec![ESC, b'e', 0, n])
}

/// Set a vertical tab stop every `n` lines (ESC e 1 n). 1-127.
pub fn vertical_tab_increment(n: u8) -> Result<Vec<u8>, ValidationError> {
    in_range("vertical tab increment", n as i32, 1, 127, "1..=127 lines")?;
    Ok(vec![ESC, b'e', 1, n])
}

// ============================================================================
// JUSTIFICATION
// ============================================================================

/// Line justification modes (ESC a).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justification {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
    Full = 3,
}

/// Set line justification (ESC a n).
#[inline]
pub fn justification(mode: Justification) -> Vec<u8> {
    vec![ESC, b'a', mode as u8]
}

// ============================================================================
// CHARACTER TABLES
// ============================================================================

/// The two selectable character tables (ESC t).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharTable {
    /// Default table: codes 128-255 render the italic variants.
    #[default]
    Italic = 0,
    /// Symbol table: codes 128-255 render box-drawing and symbols.
    Symbol = 1,
}

/// Select the active character table (ESC t n).
#[inline]
pub fn char_table(table: CharTable) -> Vec<u8> {
    vec![ESC, b't', table as u8]
}

/// # Assign Character Table (ESC ( t 3 0 d1 d2 d3)
///
/// Assigns the registered table identified by `d2`/`d3` to selectable slot
/// `d1`. See the ESC/P specification for the available table pairs.
///
/// ## Parameters
///
/// - `slot`: 0 (italic) or 1 (symbol)
/// - `d2`, `d3`: table selector pair, 0-255 each
pub fn assign_char_table(slot: u8, d2: u8, d3: u8) -> Result<Vec<u8>, ValidationError> {
    in_range("char table slot", slot as i32, 0, 1, "0..=1")?;
    Ok(vec![ESC, b'(', b't', 3, 0, slot, d2, d3])
}

/// International character set variants (ESC R).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Usa = 0,
    France = 1,
    Germany = 2,
    UnitedKingdom = 3,
    DenmarkI = 4,
    Sweden = 5,
    Italy = 6,
    SpainI = 7,
    Japan = 8,
    Norway = 9,
    DenmarkIi = 10,
    SpainIi = 11,
    LatinAmerica = 12,
}

/// Select an international character set (ESC R n).
#[inline]
pub fn international_charset(charset: Charset) -> Vec<u8> {
    vec![ESC, b'R', charset as u8]
}

/// ROM typefaces (ESC k, ESC :).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Typeface {
    #[default]
    Roman = 0,
    SansSerif = 1,
}

/// Copy a ROM charset into the printer's character RAM (ESC : NUL f 0).
///
/// Useful as a base before overlaying user-defined glyphs, so the rest of
/// the RAM table has sensible contents.
#[inline]
pub fn copy_rom_to_ram(typeface: Typeface) -> Vec<u8> {
    vec![ESC, b':', NUL, typeface as u8, 0]
}

/// Source of the active character table (ESC %).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSource {
    /// Built-in ROM glyphs (the power-on default).
    #[default]
    Rom = 0,
    /// User-defined glyphs in device RAM.
    Ram = 1,
}

/// Select where the active character table is read from (ESC % n).
#[inline]
pub fn char_source(source: CharSource) -> Vec<u8> {
    vec![ESC, b'%', source as u8]
}

// ============================================================================
// PRINT QUALITY, TYPEFACE, PITCH
// ============================================================================

/// Print quality modes (ESC x).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    /// Single-pass draft printing.
    #[default]
    Draft = 0,
    /// Near Letter Quality: two passes, half-dot vertical offset.
    NearLetter = 1,
}

/// Select draft or NLQ printing (ESC x n).
#[inline]
pub fn quality(q: Quality) -> Vec<u8> {
    vec![ESC, b'x', q as u8]
}

/// Select the NLQ typeface (ESC k n).
#[inline]
pub fn typeface(t: Typeface) -> Vec<u8> {
    vec![ESC, b'k', t as u8]
}

/// Fixed character pitches. Each has its own opcode rather than a
/// parameter byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pitch {
    /// 10 characters per inch, pica (the power-on default).
    #[default]
    Cpi10,
    /// 12 characters per inch, elite.
    Cpi12,
    /// 15 characters per inch.
    Cpi15,
}

/// Select a fixed pitch (ESC P / ESC M / ESC g).
#[inline]
pub fn pitch(p: Pitch) -> Vec<u8> {
    match p {
        Pitch::Cpi10 => vec![ESC, b'P'],
        Pitch::Cpi12 => vec![ESC, b'M'],
        Pitch::Cpi15 => vec![ESC, b'g'],
    }
}

/// Switch proportional spacing on or off (ESC p n). Off returns to the
/// last fixed pitch.
#[inline]
pub fn proportional(on: bool) -> Vec<u8> {
    vec![ESC, b'p', on as u8]
}

/// Add `n`/120 inch of space after each character (ESC SP n). 0-127.
pub fn interchar_space(n: u8) -> Result<Vec<u8>, ValidationError> {
    in_range("intercharacter space", n as i32, 0, 127, "0..=127")?;
    Ok(vec![ESC, b' ', n])
}

// ============================================================================
// STYLE TOGGLES
// ============================================================================

/// Select bold (emphasized) printing (ESC E).
#[inline]
pub fn bold_on() -> Vec<u8> {
    vec![ESC, b'E']
}

/// Cancel bold printing (ESC F).
#[inline]
pub fn bold_off() -> Vec<u8> {
    vec![ESC, b'F']
}

/// Select italic printing (ESC 4).
#[inline]
pub fn italic_on() -> Vec<u8> {
    vec![ESC, b'4']
}

/// Cancel italic printing (ESC 5).
#[inline]
pub fn italic_off() -> Vec<u8> {
    vec![ESC, b'5']
}

/// Select double-strike printing (ESC G): each dot printed twice with a
/// slight vertical offset.
#[inline]
pub fn double_strike_on() -> Vec<u8> {
    vec![ESC, b'G']
}

/// Cancel double-strike printing (ESC H).
#[inline]
pub fn double_strike_off() -> Vec<u8> {
    vec![ESC, b'H']
}

/// Switch underlining on or off (ESC - n).
#[inline]
pub fn underline(on: bool) -> Vec<u8> {
    vec![ESC, b'-', on as u8]
}

/// Select superscript layout (ESC S 0).
#[inline]
pub fn superscript() -> Vec<u8> {
    vec![ESC, b'S', 0]
}

/// Select subscript layout (ESC S 1).
#[inline]
pub fn subscript() -> Vec<u8> {
    vec![ESC, b'S', 1]
}

/// Cancel super- or subscript (ESC T).
#[inline]
pub fn script_off() -> Vec<u8> {
    vec![ESC, b'T']
}

/// Select condensed printing (SI).
#[inline]
pub fn condensed_on() -> Vec<u8> {
    vec![SI]
}

/// Cancel condensed printing (DC2).
#[inline]
pub fn condensed_off() -> Vec<u8> {
    vec![DC2]
}

/// Switch double-width printing on or off (ESC W n).
#[inline]
pub fn double_width(on: bool) -> Vec<u8> {
    vec![ESC, b'W', on as u8]
}

/// Switch double-height printing on or off (ESC w n).
#[inline]
pub fn double_height(on: bool) -> Vec<u8> {
    vec![ESC, b'w', on as u8]
}

// ============================================================================
// CONTROL-CODE VISIBILITY AND MODES
// ============================================================================

/// # Print Control Codes (ESC I n)
///
/// With `on`, codes 0-6, 16, 17, 21-23, 25, 26, 28-31 and 128-159 are
/// treated as printable characters instead of commands. The default tables
/// define no glyphs for the low range, in which case the printer ignores
/// the setting.
#[inline]
pub fn print_control_codes(on: bool) -> Vec<u8> {
    vec![ESC, b'I', on as u8]
}

/// Treat codes 128-159 as printable (ESC 6) or as control codes (ESC 7).
#[inline]
pub fn print_upper_control_codes(on: bool) -> Vec<u8> {
    if on { vec![ESC, b'6'] } else { vec![ESC, b'7'] }
}

/// Switch between character-by-character and line-by-line printing
/// (ESC i n).
#[inline]
pub fn immediate_print(on: bool) -> Vec<u8> {
    vec![ESC, b'i', on as u8]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset() {
        assert_eq!(reset(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_page_length() {
        assert_eq!(page_length_lines(66).unwrap(), vec![0x1B, 0x43, 66]);
        assert_eq!(page_length_inches(12).unwrap(), vec![0x1B, 0x43, 0, 12]);
        assert!(page_length_lines(0).is_err());
        assert!(page_length_lines(128).is_err());
        assert!(page_length_inches(23).is_err());
    }

    #[test]
    fn test_margins() {
        assert_eq!(bottom_margin(4).unwrap(), vec![0x1B, 0x4E, 4]);
        assert_eq!(cancel_vertical_margins(), vec![0x1B, 0x4F]);
        assert_eq!(right_margin(65).unwrap(), vec![0x1B, 0x51, 65]);
        assert_eq!(left_margin(10).unwrap(), vec![0x1B, 0x6C, 10]);
        assert!(right_margin(0).is_err());
        assert!(left_margin(0).is_err());
    }

    #[test]
    fn test_absolute_position_little_endian() {
        assert_eq!(absolute_position(0).unwrap(), vec![0x1B, 0x24, 0, 0]);
        assert_eq!(absolute_position(300).unwrap(), vec![0x1B, 0x24, 0x2C, 0x01]);
        assert_eq!(
            absolute_position(32767).unwrap(),
            vec![0x1B, 0x24, 0xFF, 0x7F]
        );
        assert!(absolute_position(32768).is_err());
    }

    #[test]
    fn test_relative_position_positive() {
        assert_eq!(relative_position(0).unwrap(), vec![0x1B, 0x5C, 0, 0]);
        assert_eq!(relative_position(300).unwrap(), vec![0x1B, 0x5C, 0x2C, 0x01]);
        assert_eq!(
            relative_position(16384).unwrap(),
            vec![0x1B, 0x5C, 0x00, 0x40]
        );
    }

    #[test]
    fn test_relative_position_negative_is_not_twos_complement() {
        // -1: nl = 32768 - 1 = 32767 -> 0xFF, nh = 32768 - 0 -> 0x00.
        // Two's complement would be [0xFF, 0xFF].
        assert_eq!(relative_position(-1).unwrap(), vec![0x1B, 0x5C, 0xFF, 0x00]);
        // -300: |n| = 300 = 1*256 + 44; nl = 32768-44 -> 0xD4, nh = 32768-1 -> 0xFF
        assert_eq!(
            relative_position(-300).unwrap(),
            vec![0x1B, 0x5C, 0xD4, 0xFF]
        );
        // -16384: nl = 32768-0 -> 0x00, nh = 32768-64 -> 0xC0
        assert_eq!(
            relative_position(-16384).unwrap(),
            vec![0x1B, 0x5C, 0x00, 0xC0]
        );
        assert!(relative_position(-16385).is_err());
    }

    /// Inverse of the wire encoding, for the round-trip property: positive
    /// values read back little-endian; negative values undo the 32768
    /// offset.
    fn decode_relative(nl: u8, nh: u8, negative: bool) -> i32 {
        if negative {
            let ones = (256 - nl as i32) % 256;
            let two_fifty_sixes = (256 - nh as i32) % 256;
            -(two_fifty_sixes * 256 + ones)
        } else {
            nh as i32 * 256 + nl as i32
        }
    }

    #[test]
    fn test_relative_position_round_trip_full_range() {
        for n in -16384i32..=16384 {
            let cmd = relative_position(n as i16).unwrap();
            let back = decode_relative(cmd[2], cmd[3], n < 0);
            assert_eq!(back, n, "round trip failed for {}", n);
        }
    }

    #[test]
    fn test_feeds_and_skips() {
        assert_eq!(paper_feed(216), vec![0x1B, 0x4A, 216]);
        assert_eq!(reverse_paper_feed(36), vec![0x1B, 0x6A, 36]);
        assert_eq!(horizontal_skip(5).unwrap(), vec![0x1B, 0x66, 0, 5]);
        assert_eq!(vertical_skip(3).unwrap(), vec![0x1B, 0x66, 1, 3]);
        assert!(horizontal_skip(128).is_err());
        assert!(vertical_skip(128).is_err());
    }

    #[test]
    fn test_line_spacing() {
        assert_eq!(line_spacing(24), vec![0x1B, 0x33, 24]);
        assert_eq!(line_spacing_one_eighth(), vec![0x1B, 0x30]);
        assert_eq!(line_spacing_default(), vec![0x1B, 0x32]);
    }

    #[test]
    fn test_horizontal_tabs_sentinel() {
        assert_eq!(
            horizontal_tabs(&[8, 16, 24]).unwrap(),
            vec![0x1B, 0x44, 8, 16, 24, 0]
        );
    }

    #[test]
    fn test_tab_stops_must_ascend() {
        assert!(matches!(
            horizontal_tabs(&[8, 8]),
            Err(ValidationError::NotAscending { .. })
        ));
        assert!(matches!(
            vertical_tabs(&[10, 5]),
            Err(ValidationError::NotAscending { .. })
        ));
    }

    #[test]
    fn test_tab_stop_limits() {
        let many: Vec<u8> = (1..=33).collect();
        assert!(matches!(
            horizontal_tabs(&many),
            Err(ValidationError::TooMany { .. })
        ));
        let stops: Vec<u8> = (1..=32).collect();
        assert!(horizontal_tabs(&stops).is_ok());

        let many: Vec<u8> = (1..=17).collect();
        assert!(matches!(
            vertical_tabs(&many),
            Err(ValidationError::TooMany { .. })
        ));
        assert!(vertical_tabs(&[]).is_err());
        assert!(horizontal_tabs(&[0, 4]).is_err());
    }

    #[test]
    fn test_tab_increments() {
        assert_eq!(horizontal_tab_increment(8).unwrap(), vec![0x1B, 0x65, 0, 8]);
        assert_eq!(vertical_tab_increment(2).unwrap(), vec![0x1B, 0x65, 1, 2]);
        assert!(horizontal_tab_increment(37).is_err());
        assert!(vertical_tab_increment(0).is_err());
    }

    #[test]
    fn test_justification() {
        assert_eq!(justification(Justification::Left), vec![0x1B, 0x61, 0]);
        assert_eq!(justification(Justification::Center), vec![0x1B, 0x61, 1]);
        assert_eq!(justification(Justification::Right), vec![0x1B, 0x61, 2]);
        assert_eq!(justification(Justification::Full), vec![0x1B, 0x61, 3]);
    }

    #[test]
    fn test_char_tables() {
        assert_eq!(char_table(CharTable::Symbol), vec![0x1B, 0x74, 1]);
        assert_eq!(char_table(CharTable::Italic), vec![0x1B, 0x74, 0]);
        assert_eq!(
            assign_char_table(1, 0, 8).unwrap(),
            vec![0x1B, 0x28, 0x74, 3, 0, 1, 0, 8]
        );
        assert!(assign_char_table(2, 0, 0).is_err());
        assert_eq!(
            international_charset(Charset::Italy),
            vec![0x1B, 0x52, 6]
        );
        assert_eq!(
            copy_rom_to_ram(Typeface::SansSerif),
            vec![0x1B, 0x3A, 0, 1, 0]
        );
        assert_eq!(char_source(CharSource::Ram), vec![0x1B, 0x25, 1]);
        assert_eq!(char_source(CharSource::Rom), vec![0x1B, 0x25, 0]);
    }

    #[test]
    fn test_quality_typeface_pitch() {
        assert_eq!(quality(Quality::NearLetter), vec![0x1B, 0x78, 1]);
        assert_eq!(quality(Quality::Draft), vec![0x1B, 0x78, 0]);
        assert_eq!(typeface(Typeface::Roman), vec![0x1B, 0x6B, 0]);
        assert_eq!(typeface(Typeface::SansSerif), vec![0x1B, 0x6B, 1]);
        assert_eq!(pitch(Pitch::Cpi10), vec![0x1B, 0x50]);
        assert_eq!(pitch(Pitch::Cpi12), vec![0x1B, 0x4D]);
        assert_eq!(pitch(Pitch::Cpi15), vec![0x1B, 0x67]);
        assert_eq!(proportional(true), vec![0x1B, 0x70, 1]);
        assert_eq!(interchar_space(12).unwrap(), vec![0x1B, 0x20, 12]);
        assert!(interchar_space(128).is_err());
    }

    #[test]
    fn test_style_toggles() {
        assert_eq!(bold_on(), vec![0x1B, 0x45]);
        assert_eq!(bold_off(), vec![0x1B, 0x46]);
        assert_eq!(italic_on(), vec![0x1B, 0x34]);
        assert_eq!(italic_off(), vec![0x1B, 0x35]);
        assert_eq!(double_strike_on(), vec![0x1B, 0x47]);
        assert_eq!(double_strike_off(), vec![0x1B, 0x48]);
        assert_eq!(underline(true), vec![0x1B, 0x2D, 1]);
        assert_eq!(underline(false), vec![0x1B, 0x2D, 0]);
        assert_eq!(superscript(), vec![0x1B, 0x53, 0]);
        assert_eq!(subscript(), vec![0x1B, 0x53, 1]);
        assert_eq!(script_off(), vec![0x1B, 0x54]);
        assert_eq!(condensed_on(), vec![0x0F]);
        assert_eq!(condensed_off(), vec![0x12]);
        assert_eq!(double_width(true), vec![0x1B, 0x57, 1]);
        assert_eq!(double_height(false), vec![0x1B, 0x77, 0]);
    }

    #[test]
    fn test_control_code_visibility() {
        assert_eq!(print_control_codes(true), vec![0x1B, 0x49, 1]);
        assert_eq!(print_upper_control_codes(true), vec![0x1B, 0x36]);
        assert_eq!(print_upper_control_codes(false), vec![0x1B, 0x37]);
        assert_eq!(immediate_print(true), vec![0x1B, 0x69, 1]);
        assert_eq!(beep(), vec![0x07]);
    }

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x0000), [0x00, 0x00]);
        assert_eq!(u16_le(0x00FF), [0xFF, 0x00]);
        assert_eq!(u16_le(0xFF00), [0x00, 0xFF]);
        assert_eq!(u16_le(0x1234), [0x34, 0x12]);
    }
}
