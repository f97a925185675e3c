//! # Byte Handshake Engine
//!
//! Transfers octets across the emulated parallel bus one at a time,
//! enforcing the Centronics strobe/busy/ack protocol and surfacing device
//! faults.
//!
//! ## Per-Byte Protocol
//!
//! ```text
//! SetData ──► SettleDelay ──► StrobeAssert ──► StrobeRelease ──► WaitReady
//!    ▲                          (pulse width)                       │
//!    │                                                   ready ────┼──► next byte
//!    └──────────────── retry (recovery said resume) ◄─── fault ────┘
//!                                                         abort ──► PrintError::Fault
//! ```
//!
//! The printer is a strict request/acknowledge peer: at most one byte is
//! ever in flight, and the engine only advances after readiness is
//! observed. That is the flow control — the device has none beyond its
//! BUSY/ACK lines.
//!
//! ## Faults vs Bus Errors
//!
//! A device fault (paper out, deselected, error line) is recoverable: the
//! injected [`FaultRecovery`] strategy decides between resuming and
//! aborting, per fault. A [`BusError`] from the transport is not — it
//! aborts the whole transfer immediately, without consulting the strategy.
//!
//! On resume the engine re-drives the faulted byte from SetData. The
//! printer has not latched it (it was busy faulting), so the byte is still
//! pending at the protocol level; no byte is skipped or reordered.

use std::thread;
use std::time::Duration;

use crate::error::{BusError, PrintError};
use crate::status::{FaultFlags, PrinterStatus};
use crate::transport::{OutputLine, ParallelBus};

// ============================================================================
// TIMINGS
// ============================================================================

/// Handshake timing parameters.
///
/// The defaults match the original MCP23017 build: 1 ms data settle
/// (datasheet maximum is 3.45 µs, the rest is margin), 1 ms strobe pulse,
/// 1 ms between busy polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Delay between latching the data byte and asserting strobe, so the
    /// value is valid at the peripheral before it is told to look.
    pub settle: Duration,
    /// Width of the strobe pulse.
    pub strobe_pulse: Duration,
    /// Delay between status polls while waiting for ready.
    pub poll_interval: Duration,
}

impl Timings {
    /// All-zero delays, for tests against in-memory transports.
    pub const IMMEDIATE: Self = Self {
        settle: Duration::ZERO,
        strobe_pulse: Duration::ZERO,
        poll_interval: Duration::ZERO,
    };
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(1),
            strobe_pulse: Duration::from_millis(1),
            poll_interval: Duration::from_millis(1),
        }
    }
}

// ============================================================================
// FAULT RECOVERY
// ============================================================================

/// What to do about a device fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Re-drive the faulted byte once the operator/automation has
    /// intervened.
    Retry,
    /// Unwind the transfer; `send` returns the fault.
    Abort,
}

/// Caller-supplied policy for device faults.
///
/// Decouples the engine from any particular user interface: a CLI can
/// prompt the operator, a daemon can wait-and-retry, tests can script
/// decisions. `decide` is called once per observed fault, synchronously,
/// and may block (the transfer is paused until it returns).
pub trait FaultRecovery {
    fn decide(&mut self, fault: FaultFlags) -> RecoveryAction;
}

/// The non-interactive default: abort on any fault.
pub struct AbortOnFault;

impl FaultRecovery for AbortOnFault {
    fn decide(&mut self, _fault: FaultFlags) -> RecoveryAction {
        RecoveryAction::Abort
    }
}

/// Adapter turning a closure into a recovery strategy.
pub struct RecoverWith<F>(pub F);

impl<F: FnMut(FaultFlags) -> RecoveryAction> FaultRecovery for RecoverWith<F> {
    fn decide(&mut self, fault: FaultFlags) -> RecoveryAction {
        (self.0)(fault)
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Outcome of one WaitReady loop.
enum WaitOutcome {
    Ready,
    RetryByte,
}

/// The byte-transfer state machine over a [`ParallelBus`].
///
/// Owns the bus exclusively; every transfer in the process funnels through
/// `&mut self`, so byte-level writes can never interleave.
pub struct HandshakeEngine<B: ParallelBus> {
    bus: B,
    timings: Timings,
    recovery: Box<dyn FaultRecovery>,
    /// Whether the transport has a distinguishable ACK line. Without one,
    /// readiness is BUSY-only.
    has_ack: bool,
    /// Optional safety bound on WaitReady polls per byte. `None` polls
    /// indefinitely, relying on fault detection to bound the wait.
    max_polls: Option<u32>,
}

impl<B: ParallelBus> HandshakeEngine<B> {
    /// Engine with default timings.
    pub fn new(bus: B, recovery: Box<dyn FaultRecovery>) -> Self {
        Self::with_timings(bus, recovery, Timings::default())
    }

    /// Engine with explicit timings.
    pub fn with_timings(bus: B, recovery: Box<dyn FaultRecovery>, timings: Timings) -> Self {
        Self {
            bus,
            timings,
            recovery,
            has_ack: true,
            max_polls: None,
        }
    }

    /// Declare whether the transport wires a distinguishable ACK line.
    pub fn set_has_ack(&mut self, has_ack: bool) {
        self.has_ack = has_ack;
    }

    /// Bound WaitReady to `max` polls per byte, surfacing exhaustion as
    /// [`PrintError::Timeout`]. `None` (the default) polls indefinitely.
    pub fn set_max_polls(&mut self, max: Option<u32>) {
        self.max_polls = max;
    }

    /// Drive the AUTOFEED line; the level persists across transfers.
    pub fn set_autofeed(&mut self, asserted: bool) -> Result<(), PrintError> {
        self.bus
            .set_line(OutputLine::Autofeed, asserted)
            .map_err(PrintError::from)
    }

    /// Current status snapshot.
    pub fn poll_status(&mut self) -> Result<PrinterStatus, BusError> {
        self.bus.read_status()
    }

    /// Pulse the INIT line to hardware-reset the printer.
    pub fn pulse_init(&mut self) -> Result<(), PrintError> {
        self.bus.set_line(OutputLine::Init, true)?;
        thread::sleep(self.timings.strobe_pulse);
        self.bus.set_line(OutputLine::Init, false)?;
        Ok(())
    }

    /// Transfer `bytes` in order, blocking until the printer has accepted
    /// every one.
    ///
    /// ## Errors
    ///
    /// - [`PrintError::Bus`]: the transport failed; the transfer stops at
    ///   the failing byte, nothing beyond it is transmitted.
    /// - [`PrintError::Fault`]: the printer faulted and the recovery
    ///   strategy chose to abort; carries the flags observed at that
    ///   moment.
    /// - [`PrintError::Timeout`]: the configured poll bound ran out.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), PrintError> {
        for &byte in bytes {
            self.send_byte(byte)?;
        }
        Ok(())
    }

    /// Run the per-byte state machine, including fault-retry loops.
    fn send_byte(&mut self, byte: u8) -> Result<(), PrintError> {
        loop {
            // SetData: a failure here is a bus error and aborts outright.
            self.bus.write_data(byte)?;
            // SettleDelay: value must be stable before the strobe edge.
            thread::sleep(self.timings.settle);
            // StrobeAssert/StrobeRelease. AUTOFEED and friends keep their
            // latched levels; only the strobe toggles.
            self.bus.set_line(OutputLine::Strobe, true)?;
            thread::sleep(self.timings.strobe_pulse);
            self.bus.set_line(OutputLine::Strobe, false)?;
            // WaitReady.
            match self.wait_ready()? {
                WaitOutcome::Ready => return Ok(()),
                WaitOutcome::RetryByte => continue,
            }
        }
    }

    /// Poll until the printer is ready, a fault is aborted, or the poll
    /// budget runs out. Fault classification wins over readiness.
    fn wait_ready(&mut self) -> Result<WaitOutcome, PrintError> {
        let mut polls: u32 = 0;
        loop {
            thread::sleep(self.timings.poll_interval);
            let status = self.bus.read_status()?;

            if let Some(fault) = status.fault_flags() {
                match self.recovery.decide(fault) {
                    RecoveryAction::Retry => return Ok(WaitOutcome::RetryByte),
                    RecoveryAction::Abort => return Err(PrintError::Fault(fault)),
                }
            }
            if status.is_ready(self.has_ack) {
                return Ok(WaitOutcome::Ready);
            }

            polls += 1;
            if let Some(max) = self.max_polls {
                if polls >= max {
                    return Err(PrintError::Timeout(polls));
                }
            }
        }
    }

    /// The underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the underlying bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Tear down the engine and hand the bus back.
    pub fn into_bus(self) -> B {
        self.bus
    }
}

// ============================================================================
// TESTS
// ============================================================================
