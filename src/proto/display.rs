//! Channel A — ASCII frame for the vacant-slot display.
//!
//! Wire format (pipe-delimited command envelope, no terminator):
//!
//! ```text
//! |C|1|4|1|28-0-#u{NN}|
//! ```
//!
//! `C` addresses the sign controller, `1|4|1` selects window/line/style on
//! the sign, `28-0-#u` is the draw command, and `NN` is the vacant count
//! zero-padded to two digits.  The sign renders exactly two digits, so
//! counts above 99 are clamped to 99.

use core::fmt::Write;

/// Everything before the two count digits.
const FRAME_PREFIX: &str = "|C|1|4|1|28-0-#u";

/// Largest count the two-digit sign can render.
const MAX_DISPLAY_COUNT: u16 = 99;

/// Build the display frame for a vacant-slot count.
pub fn encode_vacancy_frame(vacant: u16) -> heapless::String<24> {
    let mut frame = heapless::String::new();
    let shown = vacant.min(MAX_DISPLAY_COUNT);
    let _ = write!(frame, "{}{:02}|", FRAME_PREFIX, shown);
    frame
}
