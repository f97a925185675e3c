//! # MCP23017 Parallel Port
//!
//! Emulates a Centronics parallel port with an MCP23017 16-bit I2C GPIO
//! expander. PORTA drives the eight data lines D0–D7; PORTB carries the
//! control and status lines.
//!
//! ## PORTB Wiring
//!
//! | Bit | Line | Direction | Active |
//! |-----|------|-----------|--------|
//! | 0 | STROBE | out | low |
//! | 1 | ACK | in | high |
//! | 2 | BUSY | in | high |
//! | 3 | PAPEREND | in | high |
//! | 4 | SELECT | in | high |
//! | 5 | AUTOFEED | out | low |
//! | 6 | ERROR | in | low |
//! | 7 | INIT | out | low |
//!
//! The parallel SELECTIN pin (DB25 pin 17) is hardware-grounded and not
//! routed through the expander.
//!
//! ## Output Latching
//!
//! The port keeps a shadow of the PORTB output latch so that driving one
//! line rewrites the whole register with every other output held at its
//! current level. That is what lets AUTOFEED stay asserted across strobe
//! pulses.

use crate::error::BusError;
use crate::status::PrinterStatus;
use crate::transport::{I2cBus, OutputLine, ParallelBus};

/// Default MCP23017 address with all three address pins grounded.
pub const DEFAULT_ADDRESS: u16 = 0x20;

// Register addresses with IOCON.BANK = 0 (the power-on default).
const IODIRA: u8 = 0x00;
const IODIRB: u8 = 0x01;
const GPIOA: u8 = 0x12;
const GPIOB: u8 = 0x13;

// PORTB bit positions.
const STROBE: u8 = 0;
const ACK: u8 = 1;
const BUSY: u8 = 2;
const PAPER_END: u8 = 3;
const SELECT: u8 = 4;
const AUTOFEED: u8 = 5;
const ERROR: u8 = 6;
const INIT: u8 = 7;

/// PORTB direction mask: status lines are inputs, the rest outputs.
const PORTB_INPUTS: u8 = 1 << ACK | 1 << BUSY | 1 << PAPER_END | 1 << SELECT | 1 << ERROR;

/// A Centronics port emulated by an MCP23017 expander.
pub struct Mcp23017Port<B: I2cBus> {
    bus: B,
    address: u16,
    /// Shadow of the PORTB output latch. Outputs idle high (all lines are
    /// active-low), so the port powers up with everything released.
    portb: u8,
}

impl<B: I2cBus> Mcp23017Port<B> {
    /// Configure the expander and return the port.
    ///
    /// The device is assumed to be in its power-on/reset state (BANK = 0).
    /// PORTA is set to all outputs, PORTB to the wiring's input/output
    /// split, and every output line released.
    pub fn new(bus: B, address: u16) -> Result<Self, BusError> {
        let mut port = Self {
            bus,
            address,
            portb: 0xFF,
        };
        port.bus.write_register(address, IODIRA, 0x00)?;
        port.bus.write_register(address, IODIRB, PORTB_INPUTS)?;
        port.flush_portb()?;
        Ok(port)
    }

    /// Configure the expander at the default address (0x20).
    pub fn with_default_address(bus: B) -> Result<Self, BusError> {
        Self::new(bus, DEFAULT_ADDRESS)
    }

    /// Return every expander pin to high impedance and give the bus back.
    ///
    /// Call before dropping the port so the printer sees released lines
    /// rather than whatever the latch last held.
    pub fn release(mut self) -> Result<B, BusError> {
        self.bus.write_register(self.address, IODIRB, 0xFF)?;
        self.bus.write_register(self.address, IODIRA, 0xFF)?;
        Ok(self.bus)
    }

    fn flush_portb(&mut self) -> Result<(), BusError> {
        self.bus.write_register(self.address, GPIOB, self.portb)
    }

    fn line_bit(line: OutputLine) -> u8 {
        match line {
            OutputLine::Strobe => STROBE,
            OutputLine::Autofeed => AUTOFEED,
            OutputLine::Init => INIT,
        }
    }
}

impl<B: I2cBus> ParallelBus for Mcp23017Port<B> {
    fn write_data(&mut self, value: u8) -> Result<(), BusError> {
        self.bus.write_register(self.address, GPIOA, value)
    }

    fn set_line(&mut self, line: OutputLine, asserted: bool) -> Result<(), BusError> {
        let bit = Self::line_bit(line);
        // All three output lines are active-low: asserted = drive low.
        if asserted {
            self.portb &= !(1 << bit);
        } else {
            self.portb |= 1 << bit;
        }
        self.flush_portb()
    }

    fn read_status(&mut self) -> Result<PrinterStatus, BusError> {
        let value = self.bus.read_register(self.address, GPIOB)?;
        Ok(PrinterStatus {
            ack: value >> ACK & 1 == 1,
            busy: value >> BUSY & 1 == 1,
            paper_end: value >> PAPER_END & 1 == 1,
            select: value >> SELECT & 1 == 1,
            error: value >> ERROR & 1 == 1,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory register file standing in for the expander.
    struct FakeI2c {
        regs: [u8; 0x16],
        writes: Vec<(u8, u8)>,
    }

    impl FakeI2c {
        fn new() -> Self {
            Self {
                regs: [0; 0x16],
                writes: Vec::new(),
            }
        }
    }

    impl I2cBus for FakeI2c {
        fn write_byte(&mut self, _addr: u16, _value: u8) -> Result<(), BusError> {
            unreachable!("MCP23017 access is register-based")
        }

        fn read_byte(&mut self, _addr: u16) -> Result<u8, BusError> {
            unreachable!("MCP23017 access is register-based")
        }

        fn write_register(&mut self, _addr: u16, register: u8, value: u8) -> Result<(), BusError> {
            self.regs[register as usize] = value;
            self.writes.push((register, value));
            Ok(())
        }

        fn read_register(&mut self, _addr: u16, register: u8) -> Result<u8, BusError> {
            Ok(self.regs[register as usize])
        }
    }

    #[test]
    fn test_new_configures_directions_and_releases_outputs() {
        let port = Mcp23017Port::with_default_address(FakeI2c::new()).unwrap();
        assert_eq!(port.bus.regs[IODIRA as usize], 0x00);
        assert_eq!(port.bus.regs[IODIRB as usize], 0b0101_1110);
        assert_eq!(port.bus.regs[GPIOB as usize], 0xFF);
    }

    #[test]
    fn test_write_data_hits_porta() {
        let mut port = Mcp23017Port::with_default_address(FakeI2c::new()).unwrap();
        port.write_data(0x5A).unwrap();
        assert_eq!(port.bus.regs[GPIOA as usize], 0x5A);
    }

    #[test]
    fn test_strobe_is_active_low_and_preserves_autofeed() {
        let mut port = Mcp23017Port::with_default_address(FakeI2c::new()).unwrap();
        port.set_line(OutputLine::Autofeed, true).unwrap();
        assert_eq!(port.bus.regs[GPIOB as usize], 0xFF & !(1 << AUTOFEED));

        port.set_line(OutputLine::Strobe, true).unwrap();
        assert_eq!(
            port.bus.regs[GPIOB as usize],
            0xFF & !(1 << AUTOFEED) & !(1 << STROBE)
        );

        port.set_line(OutputLine::Strobe, false).unwrap();
        assert_eq!(port.bus.regs[GPIOB as usize], 0xFF & !(1 << AUTOFEED));
    }

    #[test]
    fn test_read_status_maps_portb_bits() {
        let mut port = Mcp23017Port::with_default_address(FakeI2c::new()).unwrap();
        // ACK + SELECT + ERROR high, BUSY + PAPEREND low: ready, no fault.
        port.bus.regs[GPIOB as usize] = 1 << ACK | 1 << SELECT | 1 << ERROR;
        let status = port.read_status().unwrap();
        assert!(status.ack && status.select && status.error);
        assert!(!status.busy && !status.paper_end);
        assert!(status.is_ready(true));
        assert!(!status.is_fault());
    }

    #[test]
    fn test_release_floats_both_ports() {
        let port = Mcp23017Port::with_default_address(FakeI2c::new()).unwrap();
        let bus = port.release().unwrap();
        assert_eq!(bus.regs[IODIRA as usize], 0xFF);
        assert_eq!(bus.regs[IODIRB as usize], 0xFF);
    }
}
