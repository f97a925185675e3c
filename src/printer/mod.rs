//! # Printer Session
//!
//! The high-level driver surface: a [`Printer`] owns the handshake engine
//! and exposes one method per ESC/P capability. Formatting state that the
//! original hardware scripts kept in process-wide globals — the line-ending
//! policy, the current line spacing — lives here as explicit session state.
//!
//! ## Modules
//!
//! - [`handshake`]: the byte-transfer state machine
//!
//! ## Usage
//!
//! ```no_run
//! use aguja::printer::{Printer, handshake::AbortOnFault};
//! use aguja::transport::{LinuxI2cDev, Mcp23017Port};
//!
//! let i2c = LinuxI2cDev::open("/dev/i2c-1")?;
//! let port = Mcp23017Port::with_default_address(i2c)?;
//! let mut printer = Printer::new(port, Box::new(AbortOnFault))?;
//!
//! printer.reset()?;
//! printer.bold_on()?;
//! printer.writeln("Hello from the parallel port")?;
//! # Ok::<(), aguja::error::PrintError>(())
//! ```

pub mod handshake;

pub use handshake::{AbortOnFault, FaultRecovery, HandshakeEngine, RecoverWith, RecoveryAction, Timings};

use crate::error::{PrintError, ValidationError};
use crate::protocol::commands::{
    self, CR, CharSource, CharTable, Charset, Justification, LF, Pitch, Quality, Typeface,
};
use crate::protocol::glyph::{self, Glyph};
use crate::protocol::graphics::{self, DensityMode};
use crate::render::Bitmap;
use crate::status::PrinterStatus;
use crate::transport::ParallelBus;

// ============================================================================
// LINE-ENDING POLICY
// ============================================================================

/// How a "new line" is produced, and who feeds the paper.
///
/// | Policy | Newline bytes | AUTOFEED line |
/// |--------|---------------|---------------|
/// | Hard | CR | asserted: the printer line-feeds on every CR |
/// | Soft | CR LF | released: the host appends the feed |
/// | None | CR | released: line feeds must be written explicitly |
///
/// With `Hard`, input that already expands `\n` to CR+LF will print double
/// spaced. If the process exits mid-job the AUTOFEED line floats and the
/// printer misbehaves; release the port when done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Hard,
    Soft,
    None,
}

impl LineEnding {
    /// The byte sequence a newline emits under this policy.
    pub fn bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Hard | LineEnding::None => &[CR],
            LineEnding::Soft => &[CR, LF],
        }
    }

    /// Whether the AUTOFEED line is held asserted under this policy.
    pub fn drives_autofeed(self) -> bool {
        matches!(self, LineEnding::Hard)
    }
}

/// Line spacing as last commanded, so it can be restored after graphics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineSpacing {
    /// Power-on default, 1/6 inch (ESC 2).
    Default,
    /// 1/8 inch (ESC 0).
    OneEighth,
    /// n/216 inch (ESC 3 n).
    Custom(u8),
}

// ============================================================================
// PRINTER
// ============================================================================

/// A session with one printer on one bus.
///
/// All transfers are strictly serialized through the owned engine; the
/// printer is polling-bound, so there is nothing to gain from concurrency
/// and every method blocks until the printer has accepted its bytes.
pub struct Printer<B: ParallelBus> {
    engine: HandshakeEngine<B>,
    line_ending: LineEnding,
    line_spacing: LineSpacing,
}

impl<B: ParallelBus> Printer<B> {
    /// Session over `bus` with default timings and the default line-ending
    /// policy (`Hard`). Drives the AUTOFEED line to match.
    pub fn new(bus: B, recovery: Box<dyn FaultRecovery>) -> Result<Self, PrintError> {
        Self::with_engine(HandshakeEngine::new(bus, recovery))
    }

    /// Session over a preconfigured engine (custom timings, poll bounds).
    pub fn with_engine(engine: HandshakeEngine<B>) -> Result<Self, PrintError> {
        let mut printer = Self {
            engine,
            line_ending: LineEnding::default(),
            line_spacing: LineSpacing::Default,
        };
        printer
            .engine
            .set_autofeed(printer.line_ending.drives_autofeed())?;
        Ok(printer)
    }

    /// The underlying bus (mainly for tests and diagnostics).
    pub fn bus(&self) -> &B {
        self.engine.bus()
    }

    /// Mutable access to the underlying bus.
    pub fn bus_mut(&mut self) -> &mut B {
        self.engine.bus_mut()
    }

    /// End the session and hand the bus back, e.g. to release the port.
    pub fn into_bus(self) -> B {
        self.engine.into_bus()
    }

    /// Bound the engine's WaitReady loop; see
    /// [`HandshakeEngine::set_max_polls`].
    pub fn set_max_polls(&mut self, max: Option<u32>) {
        self.engine.set_max_polls(max);
    }

    /// Declare whether the transport wires a distinguishable ACK line.
    pub fn set_has_ack(&mut self, has_ack: bool) {
        self.engine.set_has_ack(has_ack);
    }

    /// Poll the current printer status.
    pub fn status(&mut self) -> Result<PrinterStatus, PrintError> {
        self.engine.poll_status().map_err(PrintError::from)
    }

    // ------------------------------------------------------------------
    // Text output
    // ------------------------------------------------------------------

    /// Transmit raw bytes unmodified. The escape hatch for character codes
    /// outside the string range (box drawing, bullets) and prebuilt
    /// sequences.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), PrintError> {
        self.engine.send(bytes)
    }

    /// Write a string as 8-bit character data.
    ///
    /// The printer's tables are 8-bit; characters above U+00FF have no
    /// encoding here and are a caller error. Nothing is printed until a
    /// line terminator arrives (unless immediate print mode is on).
    pub fn write_str(&mut self, text: &str) -> Result<(), PrintError> {
        let mut bytes = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let code = ch as u32;
            if code > 0xFF {
                return Err(ValidationError::OutOfRange {
                    argument: "character",
                    value: code as i32,
                    bounds: "8-bit character range (0..=255)",
                }
                .into());
            }
            bytes.push(code as u8);
        }
        self.engine.send(&bytes)
    }

    /// Emit the active line-ending sequence.
    pub fn newline(&mut self) -> Result<(), PrintError> {
        let bytes = self.line_ending.bytes();
        self.engine.send(bytes)
    }

    /// Write a string followed by the active line-ending sequence.
    pub fn writeln(&mut self, text: &str) -> Result<(), PrintError> {
        self.write_str(text)?;
        self.newline()
    }

    /// Change the line-ending policy. Takes effect immediately: the
    /// AUTOFEED line is re-driven and every subsequent line-terminating
    /// operation uses the new sequence.
    pub fn set_line_ending(&mut self, policy: LineEnding) -> Result<(), PrintError> {
        self.line_ending = policy;
        self.engine.set_autofeed(policy.drives_autofeed())
    }

    /// The active line-ending policy.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    // ------------------------------------------------------------------
    // Reset and alert
    // ------------------------------------------------------------------

    /// Soft reset (ESC @). Character RAM and some settings survive.
    pub fn reset(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::reset())
    }

    /// Hardware reset via the INIT line, then block until the printer is
    /// ready again (a single space is transmitted as the readiness probe).
    pub fn reset_hard(&mut self) -> Result<(), PrintError> {
        self.engine.pulse_init()?;
        self.engine.send(&[b' '])
    }

    /// Sound the beeper for 1/10 second.
    pub fn beep(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::beep())
    }

    // ------------------------------------------------------------------
    // Page geometry
    // ------------------------------------------------------------------

    /// Set the page length to `n` lines in the current spacing (1-127).
    pub fn set_page_length_lines(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::page_length_lines(n)?)
    }

    /// Set the page length to `n` inches (1-22).
    pub fn set_page_length_inches(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::page_length_inches(n)?)
    }

    /// Set the bottom margin to `n` lines from the next top-of-form
    /// (1-127).
    pub fn set_bottom_margin(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::bottom_margin(n)?)
    }

    /// Cancel the top and bottom margins.
    pub fn cancel_vertical_margins(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::cancel_vertical_margins())
    }

    /// Set the right margin to column `n` in the current pitch (1-255).
    pub fn set_right_margin(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::right_margin(n)?)
    }

    /// Set the left margin to column `n` in the current pitch (1-255).
    pub fn set_left_margin(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::left_margin(n)?)
    }

    // ------------------------------------------------------------------
    // Head positioning
    // ------------------------------------------------------------------

    /// Move to `n`/60 inch from the left margin (0-32767).
    pub fn set_absolute_position(&mut self, n: u16) -> Result<(), PrintError> {
        self.engine.send(&commands::absolute_position(n)?)
    }

    /// Move by `n`/120 inch, signed (-16384..=16384).
    pub fn set_relative_position(&mut self, n: i16) -> Result<(), PrintError> {
        self.engine.send(&commands::relative_position(n)?)
    }

    /// Feed the paper forward `n`/216 inch.
    pub fn paper_feed(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::paper_feed(n))
    }

    /// Feed the paper backward `n`/216 inch.
    pub fn reverse_paper_feed(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::reverse_paper_feed(n))
    }

    /// Print `n` spaces (0-127).
    pub fn horizontal_skip(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::horizontal_skip(n)?)
    }

    /// Perform `n` line feeds and a carriage return (0-127).
    pub fn vertical_skip(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::vertical_skip(n)?)
    }

    // ------------------------------------------------------------------
    // Line spacing
    // ------------------------------------------------------------------

    /// Set line spacing to `n`/216 inch.
    pub fn set_line_spacing(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::line_spacing(n))?;
        self.line_spacing = LineSpacing::Custom(n);
        Ok(())
    }

    /// Set line spacing to 1/8 inch.
    pub fn set_line_spacing_one_eighth(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::line_spacing_one_eighth())?;
        self.line_spacing = LineSpacing::OneEighth;
        Ok(())
    }

    /// Restore the default 1/6 inch line spacing.
    pub fn reset_line_spacing(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::line_spacing_default())?;
        self.line_spacing = LineSpacing::Default;
        Ok(())
    }

    /// Re-emit the command for the session's recorded line spacing.
    fn apply_line_spacing(&mut self) -> Result<(), PrintError> {
        let cmd = match self.line_spacing {
            LineSpacing::Default => commands::line_spacing_default(),
            LineSpacing::OneEighth => commands::line_spacing_one_eighth(),
            LineSpacing::Custom(n) => commands::line_spacing(n),
        };
        self.engine.send(&cmd)
    }

    // ------------------------------------------------------------------
    // Tabs
    // ------------------------------------------------------------------

    /// Replace the horizontal tab table (up to 32 stops, strictly
    /// ascending, 1-255).
    pub fn set_horizontal_tabs(&mut self, stops: &[u8]) -> Result<(), PrintError> {
        self.engine.send(&commands::horizontal_tabs(stops)?)
    }

    /// Replace the vertical tab table (up to 16 stops, strictly ascending,
    /// 1-255).
    pub fn set_vertical_tabs(&mut self, stops: &[u8]) -> Result<(), PrintError> {
        self.engine.send(&commands::vertical_tabs(stops)?)
    }

    /// Set a horizontal tab every `n` columns (1-36).
    pub fn set_horizontal_tab_increment(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::horizontal_tab_increment(n)?)
    }

    /// Set a vertical tab every `n` lines (1-127).
    pub fn set_vertical_tab_increment(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::vertical_tab_increment(n)?)
    }

    // ------------------------------------------------------------------
    // Justification and character tables
    // ------------------------------------------------------------------

    /// Set line justification.
    pub fn set_justification(&mut self, mode: Justification) -> Result<(), PrintError> {
        self.engine.send(&commands::justification(mode))
    }

    /// Select the italic or symbol character table.
    pub fn set_char_table(&mut self, table: CharTable) -> Result<(), PrintError> {
        self.engine.send(&commands::char_table(table))
    }

    /// Assign a registered character table to a selectable slot.
    pub fn assign_char_table(&mut self, slot: u8, d2: u8, d3: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::assign_char_table(slot, d2, d3)?)
    }

    /// Select an international character set.
    pub fn set_international_charset(&mut self, charset: Charset) -> Result<(), PrintError> {
        self.engine.send(&commands::international_charset(charset))
    }

    /// Copy a ROM charset into character RAM.
    pub fn copy_rom_to_ram(&mut self, typeface: Typeface) -> Result<(), PrintError> {
        self.engine.send(&commands::copy_rom_to_ram(typeface))
    }

    /// Read the active character table from ROM or RAM.
    pub fn set_char_source(&mut self, source: CharSource) -> Result<(), PrintError> {
        self.engine.send(&commands::char_source(source))
    }

    /// Register draft-quality glyphs at consecutive codes starting at
    /// `start_code`. The glyphs are consumed; the printer's RAM owns them
    /// now.
    pub fn define_draft_chars(
        &mut self,
        start_code: u8,
        glyphs: Vec<Glyph>,
    ) -> Result<(), PrintError> {
        self.engine.send(&glyph::define_draft_chars(start_code, &glyphs)?)
    }

    /// Register NLQ glyphs at consecutive codes starting at `start_code`.
    pub fn define_nlq_chars(
        &mut self,
        start_code: u8,
        glyphs: Vec<Glyph>,
    ) -> Result<(), PrintError> {
        self.engine.send(&glyph::define_nlq_chars(start_code, &glyphs)?)
    }

    // ------------------------------------------------------------------
    // Quality, typeface, pitch
    // ------------------------------------------------------------------

    /// Select draft or near-letter-quality printing.
    pub fn set_quality(&mut self, q: Quality) -> Result<(), PrintError> {
        self.engine.send(&commands::quality(q))
    }

    /// Select the NLQ typeface.
    pub fn set_typeface(&mut self, t: Typeface) -> Result<(), PrintError> {
        self.engine.send(&commands::typeface(t))
    }

    /// Select a fixed character pitch.
    pub fn set_pitch(&mut self, p: Pitch) -> Result<(), PrintError> {
        self.engine.send(&commands::pitch(p))
    }

    /// Switch proportional spacing on or off.
    pub fn set_proportional(&mut self, on: bool) -> Result<(), PrintError> {
        self.engine.send(&commands::proportional(on))
    }

    /// Add `n`/120 inch after each character (0-127).
    pub fn set_interchar_space(&mut self, n: u8) -> Result<(), PrintError> {
        self.engine.send(&commands::interchar_space(n)?)
    }

    // ------------------------------------------------------------------
    // Styles
    // ------------------------------------------------------------------

    /// Select bold printing.
    pub fn bold_on(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::bold_on())
    }

    /// Cancel bold printing.
    pub fn bold_off(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::bold_off())
    }

    /// Select italic printing.
    pub fn italic_on(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::italic_on())
    }

    /// Cancel italic printing.
    pub fn italic_off(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::italic_off())
    }

    /// Select double-strike printing.
    pub fn double_strike_on(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::double_strike_on())
    }

    /// Cancel double-strike printing.
    pub fn double_strike_off(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::double_strike_off())
    }

    /// Switch underlining on or off.
    pub fn set_underline(&mut self, on: bool) -> Result<(), PrintError> {
        self.engine.send(&commands::underline(on))
    }

    /// Select superscript layout.
    pub fn superscript(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::superscript())
    }

    /// Select subscript layout.
    pub fn subscript(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::subscript())
    }

    /// Cancel super- or subscript.
    pub fn script_off(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::script_off())
    }

    /// Select condensed printing.
    pub fn condensed_on(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::condensed_on())
    }

    /// Cancel condensed printing.
    pub fn condensed_off(&mut self) -> Result<(), PrintError> {
        self.engine.send(&commands::condensed_off())
    }

    /// Switch double-width printing on or off.
    pub fn set_double_width(&mut self, on: bool) -> Result<(), PrintError> {
        self.engine.send(&commands::double_width(on))
    }

    /// Switch double-height printing on or off.
    pub fn set_double_height(&mut self, on: bool) -> Result<(), PrintError> {
        self.engine.send(&commands::double_height(on))
    }

    // ------------------------------------------------------------------
    // Control-code visibility and modes
    // ------------------------------------------------------------------

    /// Treat the low control codes as printable characters, or as codes.
    pub fn set_print_control_codes(&mut self, on: bool) -> Result<(), PrintError> {
        self.engine.send(&commands::print_control_codes(on))
    }

    /// Treat codes 128-159 as printable characters, or as codes.
    pub fn set_print_upper_control_codes(&mut self, on: bool) -> Result<(), PrintError> {
        self.engine.send(&commands::print_upper_control_codes(on))
    }

    /// Switch between character-by-character and line-by-line printing.
    pub fn set_immediate_print(&mut self, on: bool) -> Result<(), PrintError> {
        self.engine.send(&commands::immediate_print(on))
    }

    // ------------------------------------------------------------------
    // Graphics
    // ------------------------------------------------------------------

    /// Print a bitmap in the given density mode.
    ///
    /// The bitmap is cut into bands of the mode's head height. With more
    /// than one band, the line spacing is set to the band height so
    /// consecutive bands abut, and the session's previous spacing is
    /// restored afterward — on the error path too. Each band ends with the
    /// active line-ending sequence; rows past the bitmap's height in the
    /// final band print blank.
    pub fn print_bitmap(
        &mut self,
        bitmap: &Bitmap,
        density: DensityMode,
    ) -> Result<(), PrintError> {
        if bitmap.width() > u16::MAX as u32 {
            return Err(ValidationError::OutOfRange {
                argument: "bitmap width",
                value: bitmap.width().min(i32::MAX as u32) as i32,
                bounds: "0..=65535 columns",
            }
            .into());
        }
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Ok(());
        }

        let bands = graphics::band_count(bitmap.height(), density);
        let adjust_spacing = bands > 1;
        if adjust_spacing {
            self.engine
                .send(&commands::line_spacing(density.line_spacing_units()))?;
        }

        let result = self.print_bands(bitmap, density, bands);

        if adjust_spacing {
            // Restore unconditionally; a failure while printing wins over
            // a failure while restoring.
            let restore = self.apply_line_spacing();
            result.and(restore)
        } else {
            result
        }
    }

    fn print_bands(
        &mut self,
        bitmap: &Bitmap,
        density: DensityMode,
        bands: u32,
    ) -> Result<(), PrintError> {
        let columns = bitmap.width() as u16;
        for band in 0..bands {
            let mut sequence = graphics::graphics_mode(density, columns);
            sequence.extend(graphics::encode_band(bitmap, band, density));
            sequence.extend_from_slice(self.line_ending.bytes());
            self.engine.send(&sequence)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockBus, OutputLine};

    fn printer() -> Printer<MockBus> {
        let engine = HandshakeEngine::with_timings(
            MockBus::new(),
            Box::new(AbortOnFault),
            Timings::IMMEDIATE,
        );
        Printer::with_engine(engine).unwrap()
    }

    #[test]
    fn test_default_policy_asserts_autofeed() {
        let printer = printer();
        assert_eq!(printer.bus().line_level(OutputLine::Autofeed), Some(true));
    }

    #[test]
    fn test_line_ending_policies() {
        let mut printer = printer();

        printer.set_line_ending(LineEnding::Soft).unwrap();
        printer.newline().unwrap();
        assert_eq!(printer.bus().written, vec![0x0D, 0x0A]);
        assert_eq!(printer.bus().line_level(OutputLine::Autofeed), Some(false));

        printer.bus_mut().written.clear();
        printer.set_line_ending(LineEnding::Hard).unwrap();
        printer.newline().unwrap();
        assert_eq!(printer.bus().written, vec![0x0D]);
        assert_eq!(printer.bus().line_level(OutputLine::Autofeed), Some(true));

        printer.bus_mut().written.clear();
        printer.set_line_ending(LineEnding::None).unwrap();
        printer.newline().unwrap();
        assert_eq!(printer.bus().written, vec![0x0D]);
        assert_eq!(printer.bus().line_level(OutputLine::Autofeed), Some(false));
    }

    #[test]
    fn test_writeln_appends_policy_sequence() {
        let mut printer = printer();
        printer.set_line_ending(LineEnding::Soft).unwrap();
        printer.writeln("Hi").unwrap();
        assert_eq!(printer.bus().written, vec![b'H', b'i', 0x0D, 0x0A]);
    }

    #[test]
    fn test_write_str_rejects_wide_chars() {
        let mut printer = printer();
        let err = printer.write_str("snowman \u{2603}").unwrap_err();
        assert!(matches!(err, PrintError::Invalid(_)));
        // Validation precedes transmission: nothing reached the bus.
        assert!(printer.bus().written.is_empty());
    }

    #[test]
    fn test_validation_never_touches_the_bus() {
        let mut printer = printer();
        assert!(printer.set_page_length_lines(0).is_err());
        assert!(printer.set_horizontal_tabs(&[5, 5]).is_err());
        assert!(printer.bus().written.is_empty());
    }

    #[test]
    fn test_codec_ops_reach_the_wire() {
        let mut printer = printer();
        printer.reset().unwrap();
        printer.bold_on().unwrap();
        printer.set_pitch(Pitch::Cpi12).unwrap();
        assert_eq!(
            printer.bus().written,
            vec![0x1B, 0x40, 0x1B, 0x45, 0x1B, 0x4D]
        );
    }

    #[test]
    fn test_spacing_state_tracks_last_command() {
        let mut printer = printer();
        printer.set_line_spacing(60).unwrap();
        printer.bus_mut().written.clear();
        printer.apply_line_spacing().unwrap();
        assert_eq!(printer.bus().written, vec![0x1B, 0x33, 60]);

        printer.set_line_spacing_one_eighth().unwrap();
        printer.bus_mut().written.clear();
        printer.apply_line_spacing().unwrap();
        assert_eq!(printer.bus().written, vec![0x1B, 0x30]);

        printer.reset_line_spacing().unwrap();
        printer.bus_mut().written.clear();
        printer.apply_line_spacing().unwrap();
        assert_eq!(printer.bus().written, vec![0x1B, 0x32]);
    }

    #[test]
    fn test_reset_hard_pulses_init_then_probes() {
        let mut printer = printer();
        printer.reset_hard().unwrap();
        let init_events: Vec<_> = printer
            .bus()
            .line_events
            .iter()
            .filter(|(l, _)| *l == OutputLine::Init)
            .collect();
        assert_eq!(init_events, vec![&(OutputLine::Init, true), &(OutputLine::Init, false)]);
        assert_eq!(printer.bus().written, vec![b' ']);
    }

    #[test]
    fn test_single_band_bitmap_skips_spacing_commands() {
        let mut printer = printer();
        let mut bitmap = Bitmap::new(4, 8);
        bitmap.set(0, 0, true);
        printer.print_bitmap(&bitmap, DensityMode::Plotter).unwrap();
        // ESC * 5 4 0, column data, CR (Hard policy). No ESC 3 / ESC 2.
        assert_eq!(
            printer.bus().written,
            vec![0x1B, 0x2A, 5, 4, 0, 0x01, 0x00, 0x00, 0x00, 0x0D]
        );
    }

    #[test]
    fn test_multi_band_bitmap_brackets_with_spacing() {
        let mut printer = printer();
        let bitmap = Bitmap::new(2, 9); // two bands at 8 rows each
        printer.print_bitmap(&bitmap, DensityMode::Plotter).unwrap();

        let written = &printer.bus().written;
        // Leading: ESC 3 24. Trailing: ESC 2 (session spacing = default).
        assert_eq!(&written[..3], &[0x1B, 0x33, 24]);
        assert_eq!(&written[written.len() - 2..], &[0x1B, 0x32]);
        // Two band introducers inside.
        let introducers = written
            .windows(3)
            .filter(|w| w[..] == [0x1B, 0x2A, 5])
            .count();
        assert_eq!(introducers, 2);
    }

    #[test]
    fn test_multi_band_restores_custom_spacing() {
        let mut printer = printer();
        printer.set_line_spacing(30).unwrap();
        printer.bus_mut().written.clear();

        let bitmap = Bitmap::new(1, 16);
        printer.print_bitmap(&bitmap, DensityMode::Plotter).unwrap();
        let written = &printer.bus().written;
        assert_eq!(&written[written.len() - 3..], &[0x1B, 0x33, 30]);
    }

    #[test]
    fn test_empty_bitmap_prints_nothing() {
        let mut printer = printer();
        printer
            .print_bitmap(&Bitmap::new(0, 10), DensityMode::Plotter)
            .unwrap();
        printer
            .print_bitmap(&Bitmap::new(10, 0), DensityMode::Plotter)
            .unwrap();
        assert!(printer.bus().written.is_empty());
    }

    #[test]
    fn test_glyph_registration_through_session() {
        let mut printer = printer();
        let glyph = Glyph::new(vec![0, 4, 0, 122, 0, 2, 120, 2, 4, 0, 0]);
        printer.define_draft_chars(65, vec![glyph]).unwrap();
        assert_eq!(&printer.bus().written[..5], &[0x1B, 0x26, 0, 65, 65]);
        assert_eq!(printer.bus().written.len(), 5 + 12);
    }
}
