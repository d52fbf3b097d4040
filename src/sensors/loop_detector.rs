//! Debounced edge detector for an inductive-loop presence sensor.
//!
//! ## Hardware
//!
//! Active-low digital line with pull-up: LOW = vehicle on the loop.  The
//! line is polled, not interrupt-driven — loop detectors are slow compared
//! to the 10 Hz control cycle.
//!
//! ## Detection
//!
//! A crossing fires only when all three hold:
//!
//! 1. the raw line currently reads active (LOW);
//! 2. at least the debounce window has elapsed since the last accepted
//!    crossing on this lane;
//! 3. a confirmation re-read after the settle delay still reads active.
//!
//! The settle re-read blocks the poll cycle for `settle_ms`.  That is a
//! deliberate trade-off: at one lane of low-traffic in and out, simplicity
//! wins over cycle-time determinism.  Do not reuse this detector unexamined
//! for a multi-lane or high-throughput lot.

use crate::app::ports::{DelayPort, LoopSensorPort};

/// Which physical loop a detector watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Entry,
    Exit,
}

/// One confirmed vehicle crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossingEvent {
    pub lane: Lane,
}

pub struct LoopDetector {
    lane: Lane,
    debounce_ms: u32,
    settle_ms: u32,
    /// Monotonic milliseconds of the last accepted crossing (wrapping).
    last_event_ms: u32,
}

impl LoopDetector {
    pub fn new(lane: Lane, debounce_ms: u32, settle_ms: u32) -> Self {
        Self {
            lane,
            debounce_ms,
            settle_ms,
            last_event_ms: 0,
        }
    }

    /// Lane this detector watches.
    pub fn lane(&self) -> Lane {
        self.lane
    }

    /// Call once per control cycle with the current monotonic time.
    /// Returns a crossing event after the two-stage confirm, if any.
    ///
    /// The `hw` parameter satisfies **both** [`LoopSensorPort`] and
    /// [`DelayPort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn poll(
        &mut self,
        hw: &mut (impl LoopSensorPort + DelayPort),
        now_ms: u32,
    ) -> Option<CrossingEvent> {
        if !hw.is_low(self.lane) {
            return None;
        }
        if now_ms.wrapping_sub(self.last_event_ms) < self.debounce_ms {
            return None;
        }

        // Stage two: wait out contact bounce / electrical noise, then make
        // sure the vehicle is still on the loop.
        hw.delay_ms(self.settle_ms);
        if !hw.is_low(self.lane) {
            return None;
        }

        self.last_event_ms = now_ms;
        Some(CrossingEvent { lane: self.lane })
    }
}
