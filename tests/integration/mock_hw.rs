//! Mock adapters for integration tests.
//!
//! Records every frame and save so tests can assert on the full I/O
//! history without touching real GPIO/UART/flash.

use std::collections::VecDeque;

use lotwatch::app::events::AppEvent;
use lotwatch::app::ports::{
    DelayPort, DisplayLink, EventSink, LedgerStorePort, LinkError, LoopSensorPort, StorageError,
    TelemetryLink,
};
use lotwatch::ledger::OccupancyState;
use lotwatch::sensors::Lane;

// ── MockHardware ──────────────────────────────────────────────

/// Scripted loop lines + recorded delays.
///
/// Each `is_low` read pops the next scripted level for that lane; an
/// exhausted script reads as idle (HIGH).  An accepted crossing consumes
/// two reads: the initial sample and the settle confirm.
pub struct MockHardware {
    entry_levels: VecDeque<bool>,
    exit_levels: VecDeque<bool>,
    pub slept_ms: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            entry_levels: VecDeque::new(),
            exit_levels: VecDeque::new(),
            slept_ms: 0,
        }
    }

    pub fn script_entry(&mut self, levels: &[bool]) {
        self.entry_levels.extend(levels.iter().copied());
    }

    pub fn script_exit(&mut self, levels: &[bool]) {
        self.exit_levels.extend(levels.iter().copied());
    }

    /// Script one clean vehicle crossing (sample + confirm both active).
    pub fn script_entry_crossing(&mut self) {
        self.script_entry(&[true, true]);
    }

    pub fn script_exit_crossing(&mut self) {
        self.script_exit(&[true, true]);
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopSensorPort for MockHardware {
    fn is_low(&mut self, lane: Lane) -> bool {
        let levels = match lane {
            Lane::Entry => &mut self.entry_levels,
            Lane::Exit => &mut self.exit_levels,
        };
        levels.pop_front().unwrap_or(false)
    }
}

impl DelayPort for MockHardware {
    fn delay_ms(&mut self, ms: u32) {
        self.slept_ms += ms;
    }
}

// ── MockLinks ─────────────────────────────────────────────────

/// Records outbound frames on both channels; replays queued inbound bytes.
pub struct MockLinks {
    pub display_frames: Vec<Vec<u8>>,
    pub telemetry_frames: Vec<Vec<u8>>,
    pub inbound: VecDeque<u8>,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockLinks {
    pub fn new() -> Self {
        Self {
            display_frames: Vec::new(),
            telemetry_frames: Vec::new(),
            inbound: VecDeque::new(),
            fail_writes: false,
        }
    }

    pub fn push_inbound(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes.iter().copied());
    }

    pub fn last_display_frame(&self) -> Option<&[u8]> {
        self.display_frames.last().map(Vec::as_slice)
    }

    pub fn last_telemetry_frame(&self) -> Option<&[u8]> {
        self.telemetry_frames.last().map(Vec::as_slice)
    }
}

impl Default for MockLinks {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayLink for MockLinks {
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        if self.fail_writes {
            return Err(LinkError::WriteFailed);
        }
        self.display_frames.push(frame.to_vec());
        Ok(())
    }

    fn read_pending(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() {
            match self.inbound.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }
}

impl TelemetryLink for MockLinks {
    fn send_status(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        if self.fail_writes {
            return Err(LinkError::WriteFailed);
        }
        self.telemetry_frames.push(frame.to_vec());
        Ok(())
    }
}

// ── MockStore ─────────────────────────────────────────────────

/// In-memory ledger store with programmable failure.
pub struct MockStore {
    pub loaded: OccupancyState,
    pub saved: Vec<OccupancyState>,
    pub fail_saves: bool,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self {
            loaded: OccupancyState::fallback(),
            saved: Vec::new(),
            fail_saves: false,
        }
    }

    pub fn last_saved(&self) -> Option<&OccupancyState> {
        self.saved.last()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStorePort for MockStore {
    fn load(&self) -> OccupancyState {
        self.loaded
    }

    fn save(&mut self, state: &OccupancyState) -> Result<(), StorageError> {
        if self.fail_saves {
            return Err(StorageError::IoError);
        }
        self.saved.push(*state);
        Ok(())
    }
}

// ── LogSink ───────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<String>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.contains(needle))
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(format!("{:?}", event));
    }
}
