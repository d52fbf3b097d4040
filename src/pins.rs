//! GPIO / peripheral pin assignments for the LotWatch controller board.
//!
//! Single source of truth — every adapter references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Loop detectors (inductive ground sensors, active-low with pull-up)
// ---------------------------------------------------------------------------

/// Entry-lane loop detector. LOW = vehicle present on the loop.
pub const ENTRY_LOOP_GPIO: i32 = 5;
/// Exit-lane loop detector. LOW = vehicle present on the loop.
pub const EXIT_LOOP_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Display link (Channel A) — half-duplex ASCII serial to the slot-count sign
// ---------------------------------------------------------------------------

pub const DISPLAY_UART_TX_GPIO: i32 = 16;
pub const DISPLAY_UART_RX_GPIO: i32 = 17;

// ---------------------------------------------------------------------------
// Telemetry link (Channel B) — unidirectional binary serial downstream
// ---------------------------------------------------------------------------

pub const TELEMETRY_UART_TX_GPIO: i32 = 33;
/// RX is wired but unused — the telemetry link is outbound-only.
pub const TELEMETRY_UART_RX_GPIO: i32 = 32;

// ---------------------------------------------------------------------------
// Serial configuration
// ---------------------------------------------------------------------------

/// Both links run 9600 baud 8N1 by convention of the attached equipment.
pub const SERIAL_BAUD: u32 = 9600;
