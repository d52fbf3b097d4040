//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the occupancy ledger, both loop detectors, and the
//! inbound command receiver.  It exposes a clean, hardware-agnostic API.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//! LoopSensorPort ──▶ ┌────────────────────────┐ ──▶ DisplayLink
//!                    │       AppService        │ ──▶ TelemetryLink
//! DisplayLink (rx) ─▶│  Detectors · Ledger ·   │ ──▶ LedgerStorePort
//!                    │  CommandReceiver        │ ──▶ EventSink
//!                    └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::diagnostics::RuntimeCounters;
use crate::ledger::{OccupancyLedger, OccupancyState};
use crate::proto::command::CommandReceiver;
use crate::proto::{display, telemetry};
use crate::sensors::{Lane, LoopDetector};

use super::commands::AppCommand;
use super::events::{AppEvent, LotStatus};
use super::ports::{
    DelayPort, DisplayLink, EventSink, LedgerStorePort, LoopSensorPort, TelemetryLink,
};

/// Chunk size for draining the display link's inbound buffer.  A command is
/// 7 bytes; one chunk per cycle covers several queued commands.
const INBOUND_CHUNK: usize = 32;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    ledger: OccupancyLedger,
    entry_detector: LoopDetector,
    exit_detector: LoopDetector,
    receiver: CommandReceiver,
    /// Blocking pause after an accepted crossing (lets the vehicle clear
    /// the loop before the next sample).
    event_cooldown_ms: u32,
    tick_count: u64,
    counters: RuntimeCounters,
}

impl AppService {
    /// Construct the service around a loaded (or fallback) occupancy state.
    pub fn new(config: &SystemConfig, initial: OccupancyState) -> Self {
        Self {
            ledger: OccupancyLedger::new(initial),
            entry_detector: LoopDetector::new(Lane::Entry, config.debounce_ms, config.settle_ms),
            exit_detector: LoopDetector::new(Lane::Exit, config.debounce_ms, config.settle_ms),
            receiver: CommandReceiver::new(config.command_max_age_ms),
            event_cooldown_ms: config.event_cooldown_ms,
            tick_count: 0,
            counters: RuntimeCounters::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the initial state: one display frame so the sign shows the
    /// loaded count immediately, plus a `Started` event.
    pub fn start(&mut self, io: &mut impl DisplayLink, sink: &mut impl EventSink) {
        let status = self.status();
        self.send_display(io);
        sink.emit(&AppEvent::Started(status));
        info!(
            "AppService started: {}/{} vacant, lifetime {}↑ {}↓",
            status.vacant_slots, status.total_slots, status.total_entry, status.total_exit
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full poll cycle: sample both loops, apply crossings, drain
    /// inbound command bytes.  `now_ms` is monotonic wall time; blocking
    /// waits (settle confirm, post-event cool-down) go through the `hw`
    /// delay port so tests can run on synthetic time.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl LoopSensorPort + DelayPort),
        io: &mut (impl DisplayLink + TelemetryLink),
        store: &mut impl LedgerStorePort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Entry lane
        if self.entry_detector.poll(&mut *hw, now_ms).is_some() {
            if self.ledger.record_entry() {
                let status = self.status();
                info!("Vehicle entered: {} vacant", status.vacant_slots);
                self.send_display(&mut *io);
                self.send_telemetry(&mut *io);
                self.persist(&mut *store, &mut *sink);
                sink.emit(&AppEvent::VehicleEntered(status));
                hw.delay_ms(self.event_cooldown_ms);
            } else {
                self.counters.rejected_entries += 1;
                sink.emit(&AppEvent::EntryIgnoredLotFull);
            }
        }

        // 2. Exit lane
        if self.exit_detector.poll(&mut *hw, now_ms).is_some() {
            if self.ledger.record_exit() {
                let status = self.status();
                info!("Vehicle exited: {} vacant", status.vacant_slots);
                self.send_display(&mut *io);
                self.send_telemetry(&mut *io);
                self.persist(&mut *store, &mut *sink);
                sink.emit(&AppEvent::VehicleExited(status));
                hw.delay_ms(self.event_cooldown_ms);
            } else {
                self.counters.rejected_exits += 1;
                sink.emit(&AppEvent::ExitIgnoredLotEmpty);
            }
        }

        // 3. Inbound command bytes from the display link
        self.receiver.expire(now_ms);
        let mut buf = [0u8; INBOUND_CHUNK];
        loop {
            let n = io.read_pending(&mut buf);
            if n == 0 {
                break;
            }
            for &byte in &buf[..n] {
                if let Some(cmd) = self.receiver.feed(byte, now_ms) {
                    self.handle_command(cmd, &mut *io, &mut *store, &mut *sink);
                }
            }
        }
        self.counters.command_parse_errors = self.receiver.parse_errors();
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a parsed external command.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        io: &mut impl DisplayLink,
        store: &mut impl LedgerStorePort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::SetCapacity { total, vacant } => {
                if self.ledger.apply_capacity_reset(total, vacant) {
                    let status = self.status();
                    info!(
                        "Capacity reset: total={} vacant={}",
                        status.total_slots, status.vacant_slots
                    );
                    // The sign gets the new count; the telemetry side
                    // learns of it with the next crossing.
                    self.send_display(&mut *io);
                    self.persist(&mut *store, &mut *sink);
                    sink.emit(&AppEvent::CapacityReset(status));
                } else {
                    self.counters.rejected_commands += 1;
                    warn!(
                        "Capacity reset rejected: total={} vacant={}",
                        total, vacant
                    );
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of the current occupancy counters.
    pub fn status(&self) -> LotStatus {
        LotStatus::from(self.ledger.state())
    }

    /// Total poll cycles executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Health counters for the periodic diagnostics log.
    pub fn counters(&self) -> &RuntimeCounters {
        &self.counters
    }

    // ── Internal ──────────────────────────────────────────────

    fn send_display(&self, io: &mut impl DisplayLink) {
        let frame = display::encode_vacancy_frame(self.ledger.state().vacant_slots());
        if let Err(e) = io.send_frame(frame.as_bytes()) {
            warn!("Display frame not sent: {}", e);
        }
    }

    fn send_telemetry(&self, io: &mut impl TelemetryLink) {
        let frame = telemetry::encode_status_frame(self.ledger.state());
        if let Err(e) = io.send_status(&frame) {
            warn!("Telemetry frame not sent: {}", e);
        }
    }

    /// Best-effort save.  A failure is logged and counted; the in-memory
    /// ledger stays authoritative, at the cost of losing the newest values
    /// if power drops before the next successful save.
    fn persist(&mut self, store: &mut impl LedgerStorePort, sink: &mut impl EventSink) {
        if let Err(e) = store.save(self.ledger.state()) {
            warn!("Ledger save failed: {}", e);
            self.counters.persist_failures += 1;
            sink.emit(&AppEvent::PersistFailed);
        }
    }
}
