//! Channel B — binary status frame for the downstream controller.
//!
//! Wire format, 6 bytes, no length field or checksum:
//!
//! ```text
//! ┌──────┬───────┬────────┬───────┬──────┬──────┐
//! │ 0xAA │ total │ vacant │ entry │ exit │ 0xCC │
//! └──────┴───────┴────────┴───────┴──────┴──────┘
//! ```
//!
//! Each value is one byte.  Counters beyond 255 are saturated, not wrapped —
//! a wrapped lifetime counter would look freshly rebooted to the receiver,
//! while a pinned 255 reads as "at or beyond range".

use crate::ledger::OccupancyState;

pub const FRAME_START: u8 = 0xAA;
pub const FRAME_END: u8 = 0xCC;
pub const FRAME_LEN: usize = 6;

/// Build the telemetry frame for the current occupancy state.
pub fn encode_status_frame(state: &OccupancyState) -> [u8; FRAME_LEN] {
    [
        FRAME_START,
        sat8(u32::from(state.total_slots())),
        sat8(u32::from(state.vacant_slots())),
        sat8(state.total_entry()),
        sat8(state.total_exit()),
        FRAME_END,
    ]
}

fn sat8(value: u32) -> u8 {
    value.min(255) as u8
}
