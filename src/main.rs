//! # Aguja CLI
//!
//! Prints a markdown or plain-text file on a 9-pin ESC/P printer hanging
//! off an I2C GPIO expander.
//!
//! ## Usage
//!
//! ```bash
//! # Print a markdown file
//! aguja README.md
//!
//! # Print from stdin, plain text, no markdown interpretation
//! cat notes.txt | aguja --plain
//!
//! # Different bus or expander address
//! aguja --device /dev/i2c-0 --address 0x21 page.md
//!
//! # Inspect the byte stream without hardware
//! aguja --dry-run page.md
//! ```
//!
//! On a device fault (paper out, offline) the CLI prompts on the terminal
//! whether to resume; everything else is a hard error.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use aguja::error::PrintError;
use aguja::markdown;
use aguja::printer::{
    FaultRecovery, HandshakeEngine, LineEnding, Printer, RecoveryAction, Timings,
};
use aguja::protocol::commands::{CharTable, Pitch};
use aguja::status::FaultFlags;
use aguja::transport::{MockBus, ParallelBus};

/// Aguja - 9-pin dot-matrix printing over an emulated parallel port
#[derive(Parser, Debug)]
#[command(name = "aguja")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to print (stdin when omitted)
    file: Option<PathBuf>,

    /// I2C adapter device path
    #[arg(long, default_value = "/dev/i2c-1")]
    device: String,

    /// GPIO expander address on the bus
    #[arg(long, default_value_t = 0x20, value_parser = parse_address)]
    address: u16,

    /// Line-ending policy
    #[arg(long, value_enum, default_value_t = LineEndingArg::Soft)]
    line_ending: LineEndingArg,

    /// Print the input verbatim instead of interpreting markdown
    #[arg(long)]
    plain: bool,

    /// Build the byte stream against an in-memory bus and hex-dump it
    #[arg(long)]
    dry_run: bool,

    /// Give up after this many status polls per byte instead of waiting
    /// indefinitely
    #[arg(long)]
    max_polls: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LineEndingArg {
    /// CR only; the AUTOFEED line makes the printer feed
    Hard,
    /// CR + LF from the host
    Soft,
    /// CR only; line feeds must appear in the input
    None,
}

impl From<LineEndingArg> for LineEnding {
    fn from(arg: LineEndingArg) -> Self {
        match arg {
            LineEndingArg::Hard => LineEnding::Hard,
            LineEndingArg::Soft => LineEnding::Soft,
            LineEndingArg::None => LineEnding::None,
        }
    }
}

/// Accept decimal or 0x-prefixed hex expander addresses.
fn parse_address(s: &str) -> Result<u16, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|_| format!("invalid I2C address: {}", s))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PrintError> {
    let cli = Cli::parse();
    let source = read_source(cli.file.as_deref())?;

    if cli.dry_run {
        // No hardware pacing needed against the in-memory bus.
        let engine = HandshakeEngine::with_timings(
            MockBus::new(),
            Box::new(ConsoleRecovery),
            Timings::IMMEDIATE,
        );
        let mut printer = Printer::with_engine(engine)?;
        print_job(&mut printer, &cli, &source)?;
        hex_dump(&printer.bus().written);
        return Ok(());
    }

    print_to_device(&cli, &source)
}

#[cfg(unix)]
fn print_to_device(cli: &Cli, source: &str) -> Result<(), PrintError> {
    use aguja::transport::{LinuxI2cDev, Mcp23017Port};

    let i2c = LinuxI2cDev::open(&cli.device)?;
    let port = Mcp23017Port::new(i2c, cli.address)?;
    let mut printer = Printer::new(port, Box::new(ConsoleRecovery))?;
    let result = print_job(&mut printer, cli, source);

    // Float the expander pins whatever happened; a held AUTOFEED line
    // makes the printer misbehave after we exit.
    if let Err(e) = printer.into_bus().release() {
        eprintln!("Warning: could not release the port: {}", e);
    }
    result
}

#[cfg(not(unix))]
fn print_to_device(_cli: &Cli, _source: &str) -> Result<(), PrintError> {
    Err(PrintError::Bus(aguja::error::BusError::Open(
        "the I2C transport is only available on Unix hosts".to_string(),
    )))
}

/// Session preamble plus the document itself.
fn print_job<B: ParallelBus>(
    printer: &mut Printer<B>,
    cli: &Cli,
    source: &str,
) -> Result<(), PrintError> {
    printer.set_max_polls(cli.max_polls);
    printer.set_line_ending(cli.line_ending.into())?;

    printer.reset()?;
    printer.set_right_margin(65)?;
    printer.set_page_length_inches(12)?;
    printer.set_bottom_margin(4)?;
    printer.set_char_table(CharTable::Symbol)?;
    printer.set_pitch(Pitch::Cpi12)?;

    if cli.plain {
        for line in source.lines() {
            printer.writeln(line)?;
        }
        Ok(())
    } else {
        markdown::print_markdown(printer, source)
    }
}

fn read_source(file: Option<&std::path::Path>) -> Result<String, PrintError> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn hex_dump(bytes: &[u8]) {
    for chunk in bytes.chunks(16) {
        for byte in chunk {
            print!("{:02x} ", byte);
        }
        println!();
    }
    println!("({} bytes)", bytes.len());
}

/// Ask the operator on the terminal whether to resume after a fault.
struct ConsoleRecovery;

impl FaultRecovery for ConsoleRecovery {
    fn decide(&mut self, fault: FaultFlags) -> RecoveryAction {
        eprintln!("Printer reported: {}", fault);
        eprint!("Resume printing? (y/n): ");
        io::stderr().flush().ok();
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return RecoveryAction::Abort;
        }
        if answer.trim().eq_ignore_ascii_case("y") {
            RecoveryAction::Retry
        } else {
            RecoveryAction::Abort
        }
    }
}
