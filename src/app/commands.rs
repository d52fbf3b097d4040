//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (today only the
//! display link's serial command channel) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Remote recalibration: replace the lot's total and vacant slot
    /// counts.  Bounds are enforced by the ledger; an out-of-range pair is
    /// silently dropped (no state change, no report).
    SetCapacity { total: u16, vacant: u16 },
}
