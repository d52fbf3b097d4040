//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC console in production).  A future network
//! or MQTT adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(s) => {
                info!(
                    "START | vacant={}/{} | entries={} exits={}",
                    s.vacant_slots, s.total_slots, s.total_entry, s.total_exit
                );
            }
            AppEvent::VehicleEntered(s) => {
                info!(
                    "ENTRY | vacant={}/{} | lifetime={}",
                    s.vacant_slots, s.total_slots, s.total_entry
                );
            }
            AppEvent::VehicleExited(s) => {
                info!(
                    "EXIT  | vacant={}/{} | lifetime={}",
                    s.vacant_slots, s.total_slots, s.total_exit
                );
            }
            AppEvent::EntryIgnoredLotFull => {
                info!("ENTRY | ignored (lot full)");
            }
            AppEvent::ExitIgnoredLotEmpty => {
                info!("EXIT  | ignored (lot empty)");
            }
            AppEvent::CapacityReset(s) => {
                info!(
                    "RESET | capacity set to {}/{} vacant",
                    s.vacant_slots, s.total_slots
                );
            }
            AppEvent::PersistFailed => {
                warn!("STORE | ledger save failed, running from memory");
            }
        }
    }
}
