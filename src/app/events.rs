//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — today they go to the serial log; a
//! future network adapter would implement the same trait.

use crate::ledger::OccupancyState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries the loaded or fallback state).
    Started(LotStatus),

    /// A vehicle entered and a slot was claimed.
    VehicleEntered(LotStatus),

    /// A vehicle exited and a slot was freed.
    VehicleExited(LotStatus),

    /// An entry crossing was ignored because the lot is full.
    EntryIgnoredLotFull,

    /// An exit crossing was ignored because the lot is already empty.
    ExitIgnoredLotEmpty,

    /// A remote capacity reset was accepted.
    CapacityReset(LotStatus),

    /// Persisting the ledger failed; in-memory state stays authoritative.
    PersistFailed,
}

/// A point-in-time occupancy snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotStatus {
    pub total_slots: u16,
    pub vacant_slots: u16,
    pub total_entry: u32,
    pub total_exit: u32,
}

impl From<&OccupancyState> for LotStatus {
    fn from(state: &OccupancyState) -> Self {
        Self {
            total_slots: state.total_slots(),
            vacant_slots: state.vacant_slots(),
            total_entry: state.total_entry(),
            total_exit: state.total_exit(),
        }
    }
}
