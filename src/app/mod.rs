//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the LotWatch controller:
//! the occupancy ledger, loop-crossing detection, report triggering, and
//! capacity-reset handling.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
