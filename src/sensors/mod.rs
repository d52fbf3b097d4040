//! Sensor subsystem — the debounced loop detectors.
//!
//! One [`LoopDetector`](loop_detector::LoopDetector) instance per lane;
//! both are owned by the [`AppService`](crate::app::service::AppService)
//! and polled every control cycle.

pub mod loop_detector;

pub use loop_detector::{CrossingEvent, Lane, LoopDetector};
