//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (loop sensors, serial links, storage, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::config::SystemConfig;
use crate::ledger::OccupancyState;
use crate::sensors::Lane;

// ───────────────────────────────────────────────────────────────
// Loop sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the two loop-detector lines.
pub trait LoopSensorPort {
    /// Raw digital level of a lane's line.  The loops are active-low:
    /// `true` (LOW) means a vehicle is on the loop.
    fn is_low(&mut self, lane: Lane) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Delay port (blocking waits, mockable with synthetic time)
// ───────────────────────────────────────────────────────────────

/// Blocking wait used for the settle re-read and the post-event cool-down.
/// The whole poll cycle stalls for the duration — the single-lane design
/// accepts that (see the loop detector docs).
pub trait DelayPort {
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Serial link ports (domain → wire, plus the display's inbound side)
// ───────────────────────────────────────────────────────────────

/// Channel A: half-duplex ASCII link to the vacant-slot sign.  The same
/// transport carries the inbound capacity-reset command.
pub trait DisplayLink {
    /// Write one complete display frame.
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), LinkError>;

    /// Drain whatever inbound bytes are available right now into `buf`
    /// without blocking.  Returns the number of bytes written.
    fn read_pending(&mut self, buf: &mut [u8]) -> usize;
}

/// Channel B: unidirectional binary link to the downstream controller.
pub trait TelemetryLink {
    /// Write one complete status frame.
    fn send_status(&mut self, frame: &[u8]) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Ledger storage port (domain ↔ persistent record)
// ───────────────────────────────────────────────────────────────

/// Durable storage for the four-counter occupancy record.
pub trait LedgerStorePort {
    /// Load the persisted record.  Fails soft: any I/O error or malformed
    /// content yields [`OccupancyState::fallback`], never an error — an
    /// unattended controller must come up counting, not crash on a corrupt
    /// flash sector.
    fn load(&self) -> OccupancyState;

    /// Persist the record, whole-record overwrite.  A failed save is the
    /// caller's to log and count; in-memory state stays authoritative.
    fn save(&mut self, state: &OccupancyState) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`LedgerStorePort::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Underlying filesystem write/rename failed.
    IoError,
    /// Stored record failed structural validation.
    Malformed,
}

/// Errors from serial link writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The UART (or simulated transport) rejected the write.
    WriteFailed,
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IoError => write!(f, "I/O error"),
            Self::Malformed => write!(f, "malformed record"),
        }
    }
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "serial write failed"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
