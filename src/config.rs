//! System configuration parameters
//!
//! All tunable parameters for the LotWatch controller.
//! Values can be overridden via the persisted config blob (see
//! `adapters::storage::FileConfigStore`).

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Loop detection ---
    /// Minimum gap between accepted crossings on one lane (milliseconds)
    pub debounce_ms: u32,
    /// Settle delay before the confirmation re-read (milliseconds)
    pub settle_ms: u32,
    /// Cool-down after an accepted crossing (milliseconds)
    pub event_cooldown_ms: u32,

    // --- Poll cycle ---
    /// Inter-cycle sleep of the main poll loop (milliseconds)
    pub poll_interval_ms: u32,

    // --- Inbound commands ---
    /// Maximum age of a buffered partial command before it is discarded
    /// (milliseconds)
    pub command_max_age_ms: u32,

    // --- Diagnostics ---
    /// Poll cycles between diagnostics summary log lines
    pub status_log_interval_cycles: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Loop detection
            debounce_ms: 50,
            settle_ms: 50,
            event_cooldown_ms: 1000,

            // Poll cycle
            poll_interval_ms: 100, // 10 Hz

            // Inbound commands — a full 7-byte command takes <8 ms at
            // 9600 baud, so anything older than this is line noise.
            command_max_age_ms: 500,

            // Diagnostics
            status_log_interval_cycles: 600, // ~1/min at 10 Hz
        }
    }
}
