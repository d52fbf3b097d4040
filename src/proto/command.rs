//! Inbound capacity-reset command parser.
//!
//! Wire format on the display link, no terminator:
//!
//! ```text
//! 'S' + 3 ASCII digits (total) + 3 ASCII digits (vacant)
//! ```
//!
//! The receiver is a streaming state machine fed one byte at a time, so a
//! command split across poll cycles still parses.  Partial input older than
//! the max-age window is discarded — at 9600 baud the full 7 bytes arrive in
//! under 8 ms, so an old partial is line noise, not latency.  A non-digit in
//! the digit positions discards the partial command; if that byte is itself
//! the marker it starts a fresh command, so one corrupt command never eats
//! the next good one.

use crate::app::commands::AppCommand;

/// Command marker byte.
const MARKER: u8 = b'S';

/// Digits following the marker: 3 for total, 3 for vacant.
const DIGIT_COUNT: usize = 6;

struct Partial {
    digits: heapless::Vec<u8, DIGIT_COUNT>,
    started_ms: u32,
}

/// Streaming parser for the capacity-reset command.
pub struct CommandReceiver {
    partial: Option<Partial>,
    max_age_ms: u32,
    parse_errors: u32,
}

impl CommandReceiver {
    pub fn new(max_age_ms: u32) -> Self {
        Self {
            partial: None,
            max_age_ms,
            parse_errors: 0,
        }
    }

    /// Feed one inbound byte.  Returns a command when the final digit of a
    /// well-formed command arrives.
    pub fn feed(&mut self, byte: u8, now_ms: u32) -> Option<AppCommand> {
        self.expire(now_ms);

        let Some(partial) = &mut self.partial else {
            if byte == MARKER {
                self.partial = Some(Partial {
                    digits: heapless::Vec::new(),
                    started_ms: now_ms,
                });
            }
            // Bytes between commands are not errors — the display side of
            // the link is half-duplex and echoes are expected.
            return None;
        };

        if !byte.is_ascii_digit() {
            self.partial = None;
            self.parse_errors += 1;
            if byte == MARKER {
                self.partial = Some(Partial {
                    digits: heapless::Vec::new(),
                    started_ms: now_ms,
                });
            }
            return None;
        }

        // Capacity is exactly DIGIT_COUNT; the push cannot fail before the
        // command completes below.
        let _ = partial.digits.push(byte);
        if partial.digits.len() < DIGIT_COUNT {
            return None;
        }

        let total = three_digits(&partial.digits[0..3]);
        let vacant = three_digits(&partial.digits[3..6]);
        self.partial = None;
        Some(AppCommand::SetCapacity { total, vacant })
    }

    /// Drop a buffered partial command once it exceeds the max-age window.
    /// Called every poll cycle so a stale partial cannot linger while the
    /// line is quiet.
    pub fn expire(&mut self, now_ms: u32) {
        if let Some(partial) = &self.partial {
            if now_ms.wrapping_sub(partial.started_ms) > self.max_age_ms {
                self.partial = None;
                self.parse_errors += 1;
            }
        }
    }

    /// Malformed or stale partial commands discarded so far.
    pub fn parse_errors(&self) -> u32 {
        self.parse_errors
    }
}

fn three_digits(digits: &[u8]) -> u16 {
    debug_assert_eq!(digits.len(), 3);
    digits
        .iter()
        .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'))
}
