//! # Mock Transport
//!
//! A scripted in-memory [`ParallelBus`] for exercising the handshake engine
//! and codec without hardware. Records every data byte and line transition,
//! replays a queue of status snapshots, and can inject a write failure at a
//! chosen byte index.

use std::collections::VecDeque;

use crate::error::BusError;
use crate::status::PrinterStatus;
use crate::transport::{OutputLine, ParallelBus};

/// Status snapshot for a printer that is ready and fault-free.
pub const READY: PrinterStatus = PrinterStatus {
    ack: true,
    busy: false,
    paper_end: false,
    select: true,
    error: true,
};

/// In-memory bus: all writes are recorded, status reads come from a script.
///
/// When the script runs dry, every poll returns [`READY`], so plain codec
/// tests never stall.
pub struct MockBus {
    /// Every octet latched onto the data lines, in order (retries included).
    pub written: Vec<u8>,
    /// Every output-line transition, in order.
    pub line_events: Vec<(OutputLine, bool)>,
    statuses: VecDeque<PrinterStatus>,
    fail_write_at: Option<usize>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            written: Vec::new(),
            line_events: Vec::new(),
            statuses: VecDeque::new(),
            fail_write_at: None,
        }
    }

    /// Queue a status snapshot; polls consume the queue front-to-back.
    pub fn push_status(&mut self, status: PrinterStatus) {
        self.statuses.push_back(status);
    }

    /// Fail the data write once `index` bytes have already been accepted.
    pub fn fail_write_at(&mut self, index: usize) {
        self.fail_write_at = Some(index);
    }

    /// Current level of an output line, if it was ever driven.
    pub fn line_level(&self, line: OutputLine) -> Option<bool> {
        self.line_events
            .iter()
            .rev()
            .find(|(l, _)| *l == line)
            .map(|&(_, asserted)| asserted)
    }

    /// Number of strobe assert edges seen, i.e. byte transmission attempts.
    pub fn strobe_count(&self) -> usize {
        self.line_events
            .iter()
            .filter(|&&(l, asserted)| l == OutputLine::Strobe && asserted)
            .count()
    }
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ParallelBus for MockBus {
    fn write_data(&mut self, value: u8) -> Result<(), BusError> {
        if self.fail_write_at == Some(self.written.len()) {
            return Err(BusError::Write("injected failure".to_string()));
        }
        self.written.push(value);
        Ok(())
    }

    fn set_line(&mut self, line: OutputLine, asserted: bool) -> Result<(), BusError> {
        self.line_events.push((line, asserted));
        Ok(())
    }

    fn read_status(&mut self) -> Result<PrinterStatus, BusError> {
        Ok(self.statuses.pop_front().unwrap_or(READY))
    }
}
