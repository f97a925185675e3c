//! # Markdown Rendering
//!
//! Translates basic markdown into printer operations: the thin presentation
//! layer on top of the protocol engine.
//!
//! ## Mapping
//!
//! | Markdown | Printer |
//! |----------|---------|
//! | `**strong**` | bold |
//! | `*emphasis*` | italic |
//! | `# H1` | 10 cpi, double width + height, 60/216" spacing |
//! | `## H2` | 10 cpi, double height, 60/216" spacing |
//! | `### H3` | 10 cpi, bold |
//! | deeper headings | 10 cpi |
//! | `---` rule | a line of box-drawing fill (code 196) |
//! | `` `code` `` | verbatim, no styling |
//! | list item | bullet glyph (code 249), or the running index |
//! | `![alt](path)` | [`print_bitmap`], falling back to the alt text |
//!
//! The bullet and fill characters come from the symbol character table;
//! select it before rendering (the CLI preamble does).
//!
//! Characters outside the printer's 8-bit range are replaced with `?` and a
//! warning on stderr — a document should never die over one glyph.
//!
//! [`print_bitmap`]: crate::printer::Printer::print_bitmap

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::error::PrintError;
use crate::printer::Printer;
use crate::protocol::commands::Pitch;
use crate::protocol::graphics::DensityMode;
use crate::render::Bitmap;
use crate::transport::ParallelBus;

/// Box-drawing horizontal fill (CP437 196), used for rules.
const RULE_FILL: u8 = 196;

/// Small bullet glyph (CP437 249), used for unordered list items.
const BULLET: u8 = 249;

/// Columns a rule spans; matches the 65-column right margin the CLI sets.
const RULE_WIDTH: usize = 65;

/// The pitch body text returns to after a heading.
const BODY_PITCH: Pitch = Pitch::Cpi12;

/// Render a markdown document to the printer.
///
/// Formatting state toggled for a construct is always untoggled at its end
/// event, so a well-formed document leaves the printer in the state it
/// found it (headings restore [`BODY_PITCH`]).
pub fn print_markdown<B: ParallelBus>(
    printer: &mut Printer<B>,
    source: &str,
) -> Result<(), PrintError> {
    let mut renderer = Renderer {
        printer,
        ordered_index: None,
        image_alt: None,
    };
    for event in Parser::new(source) {
        renderer.event(event)?;
    }
    Ok(())
}

struct Renderer<'a, B: ParallelBus> {
    printer: &'a mut Printer<B>,
    /// Running item number inside an ordered list.
    ordered_index: Option<u64>,
    /// While inside an image: (destination, collected alt text).
    image_alt: Option<(String, String)>,
}

impl<B: ParallelBus> Renderer<'_, B> {
    fn event(&mut self, event: Event) -> Result<(), PrintError> {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.write(&code),
            Event::SoftBreak | Event::HardBreak => self.newline(),
            Event::Rule => {
                self.printer.write_bytes(&[RULE_FILL; RULE_WIDTH])?;
                self.printer.newline()
            }
            // Raw HTML and the remaining constructs have no printer
            // equivalent.
            _ => Ok(()),
        }
    }

    fn start(&mut self, tag: Tag) -> Result<(), PrintError> {
        match tag {
            Tag::Strong => self.printer.bold_on(),
            Tag::Emphasis => self.printer.italic_on(),
            Tag::Heading { level, .. } => self.heading_start(level),
            Tag::List(start) => {
                self.ordered_index = start;
                Ok(())
            }
            Tag::Item => match self.ordered_index {
                Some(index) => {
                    self.write(&format!("{}. ", index))
                }
                None => self.printer.write_bytes(&[BULLET, b' ']),
            },
            Tag::Image { dest_url, .. } => {
                self.image_alt = Some((dest_url.to_string(), String::new()));
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn end(&mut self, tag: TagEnd) -> Result<(), PrintError> {
        match tag {
            TagEnd::Strong => self.printer.bold_off(),
            TagEnd::Emphasis => self.printer.italic_off(),
            TagEnd::Heading(level) => self.heading_end(level),
            TagEnd::List(_) => {
                self.ordered_index = None;
                Ok(())
            }
            TagEnd::Item => {
                if let Some(index) = self.ordered_index.as_mut() {
                    *index += 1;
                }
                self.newline()
            }
            TagEnd::Paragraph => self.newline(),
            TagEnd::Image => self.image_end(),
            _ => Ok(()),
        }
    }

    fn heading_start(&mut self, level: HeadingLevel) -> Result<(), PrintError> {
        self.printer.set_pitch(Pitch::Cpi10)?;
        match level {
            HeadingLevel::H1 => {
                self.printer.set_double_height(true)?;
                self.printer.set_double_width(true)?;
                self.printer.set_line_spacing(60)
            }
            HeadingLevel::H2 => {
                self.printer.set_double_height(true)?;
                self.printer.set_line_spacing(60)
            }
            HeadingLevel::H3 => self.printer.bold_on(),
            _ => Ok(()),
        }
    }

    fn heading_end(&mut self, level: HeadingLevel) -> Result<(), PrintError> {
        self.newline()?;
        match level {
            HeadingLevel::H1 => {
                self.printer.set_double_height(false)?;
                self.printer.set_double_width(false)?;
                self.printer.reset_line_spacing()?;
            }
            HeadingLevel::H2 => {
                self.printer.set_double_height(false)?;
                self.printer.reset_line_spacing()?;
            }
            HeadingLevel::H3 => self.printer.bold_off()?,
            _ => {}
        }
        self.printer.set_pitch(BODY_PITCH)
    }

    fn image_end(&mut self) -> Result<(), PrintError> {
        let Some((dest, alt)) = self.image_alt.take() else {
            return Ok(());
        };
        self.newline()?;
        match Bitmap::open(&dest) {
            Ok(bitmap) => self.printer.print_bitmap(&bitmap, DensityMode::Plotter),
            Err(PrintError::Image(reason)) => {
                // Unreadable image: print the alt text in its place.
                eprintln!("markdown: {}", reason);
                self.write(&alt)?;
                self.newline()
            }
            Err(other) => Err(other),
        }
    }

    fn text(&mut self, text: &str) -> Result<(), PrintError> {
        if let Some((_, alt)) = self.image_alt.as_mut() {
            alt.push_str(text);
            return Ok(());
        }
        self.write(text)
    }

    fn newline(&mut self) -> Result<(), PrintError> {
        if self.image_alt.is_some() {
            return Ok(());
        }
        self.printer.newline()
    }

    /// Write text, downgrading characters the printer cannot encode.
    /// Embedded newlines (code-block text) become the active line-ending
    /// sequence so the head returns to column one.
    fn write(&mut self, text: &str) -> Result<(), PrintError> {
        let mut lines = text.split('\n');
        let mut current = lines.next();
        while let Some(line) = current {
            let mut bytes = Vec::with_capacity(line.len());
            for ch in line.chars() {
                let code = ch as u32;
                if code <= 0xFF {
                    bytes.push(code as u8);
                } else {
                    eprintln!(
                        "markdown: unmapped character '{}' (U+{:04X}), replacing with '?'",
                        ch, code
                    );
                    bytes.push(b'?');
                }
            }
            self.printer.write_bytes(&bytes)?;
            current = lines.next();
            if current.is_some() {
                self.printer.newline()?;
            }
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
    use crate::printer::{AbortOnFault, HandshakeEngine, LineEnding, Timings};
    use crate::transport::MockBus;

    fn printer() -> Printer<MockBus> {
        let engine = HandshakeEngine::with_timings(
            MockBus::new(),
            Box::new(AbortOnFault),
            Timings::IMMEDIATE,
        );
        let mut printer = Printer::with_engine(engine).unwrap();
        printer.set_line_ending(LineEnding::None).unwrap();
        printer.bus_mut().written.clear();
        printer
    }

    #[test]
    fn test_strong_wraps_in_bold() {
        let mut printer = printer();
        print_markdown(&mut printer, "a **b** c").unwrap();
        let written = &printer.bus().written;
        let expected: Vec<u8> = [
            b"a ".as_slice(),
            &[0x1B, 0x45],
            b"b",
            &[0x1B, 0x46],
            b" c",
            &[0x0D],
        ]
        .concat();
        assert_eq!(written, &expected);
    }

    #[test]
    fn test_emphasis_wraps_in_italic() {
        let mut printer = printer();
        print_markdown(&mut printer, "*x*").unwrap();
        let written = &printer.bus().written;
        assert_eq!(&written[..2], &[0x1B, 0x34]);
        assert_eq!(written[2], b'x');
        assert_eq!(&written[3..5], &[0x1B, 0x35]);
    }

    #[test]
    fn test_h1_styles_and_restores() {
        let mut printer = printer();
        print_markdown(&mut printer, "# Title").unwrap();
        let written = &printer.bus().written;
        // Preamble: 10 cpi, double height, double width, spacing 60.
        assert_eq!(
            &written[..11],
            &[0x1B, 0x50, 0x1B, 0x77, 1, 0x1B, 0x57, 1, 0x1B, 0x33, 60]
        );
        // Postamble ends restoring the body pitch.
        assert_eq!(&written[written.len() - 2..], &[0x1B, 0x4D]);
    }

    #[test]
    fn test_rule_prints_fill_line() {
        let mut printer = printer();
        print_markdown(&mut printer, "---").unwrap();
        let written = &printer.bus().written;
        assert_eq!(written.len(), RULE_WIDTH + 1);
        assert!(written[..RULE_WIDTH].iter().all(|&b| b == RULE_FILL));
        assert_eq!(written[RULE_WIDTH], 0x0D);
    }

    #[test]
    fn test_unordered_items_get_bullets() {
        let mut printer = printer();
        print_markdown(&mut printer, "- one\n- two\n").unwrap();
        let bullets = printer.bus().written.iter().filter(|&&b| b == BULLET).count();
        assert_eq!(bullets, 2);
    }

    #[test]
    fn test_ordered_items_count_up() {
        let mut printer = printer();
        print_markdown(&mut printer, "1. one\n2. two\n").unwrap();
        let written = String::from_utf8_lossy(&printer.bus().written).to_string();
        assert!(written.contains("1. one"));
        assert!(written.contains("2. two"));
    }

    #[test]
    fn test_unmapped_chars_become_question_marks() {
        let mut printer = printer();
        print_markdown(&mut printer, "x \u{2014} y").unwrap();
        assert!(printer.bus().written.contains(&b'?'));
    }

    #[test]
    fn test_missing_image_falls_back_to_alt_text() {
        let mut printer = printer();
        print_markdown(&mut printer, "![fallback text](/no/such/file.png)").unwrap();
        let written = String::from_utf8_lossy(&printer.bus().written).to_string();
        assert!(written.contains("fallback text"));
    }
}
