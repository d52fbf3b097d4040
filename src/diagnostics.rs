//! Runtime health counters.
//!
//! Nothing in this controller is allowed to crash the loop: failed saves
//! are skipped, malformed commands discarded, out-of-bounds crossings
//! ignored.  These counters make those otherwise-silent recoveries
//! observable — they are logged periodically from the main loop and on
//! demand for field debugging.

use log::info;

use crate::app::events::LotStatus;

/// Counts of locally-recovered failures since boot.  Monotonic, in-memory
/// only; a reboot clears them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeCounters {
    /// Ledger saves that failed (state kept in memory, durability at risk).
    pub persist_failures: u32,
    /// Inbound command bytes discarded as malformed or stale.
    pub command_parse_errors: u32,
    /// Well-formed capacity resets rejected for invalid bounds.
    pub rejected_commands: u32,
    /// Entry crossings ignored because the lot was full.
    pub rejected_entries: u32,
    /// Exit crossings ignored because the lot was already empty.
    pub rejected_exits: u32,
}

impl RuntimeCounters {
    pub fn any_failures(&self) -> bool {
        self.persist_failures > 0 || self.command_parse_errors > 0
    }

    /// One-line summary for the periodic status log.
    pub fn log_summary(&self, cycles: u64, status: &LotStatus) {
        info!(
            "HEALTH | cycles={} | vacant={}/{} | entries={} exits={} | \
             persist_fail={} parse_err={} cmd_rej={} entry_rej={} exit_rej={}",
            cycles,
            status.vacant_slots,
            status.total_slots,
            status.total_entry,
            status.total_exit,
            self.persist_failures,
            self.command_parse_errors,
            self.rejected_commands,
            self.rejected_entries,
            self.rejected_exits,
        );
    }
}
