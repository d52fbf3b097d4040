//! Hardware adapter — loop-detector GPIO lines and blocking delays.
//!
//! Implements [`LoopSensorPort`] and [`DelayPort`].  This is the only
//! module that touches real GPIO.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the two pulled-up input pins through `embedded-hal`'s
//! `InputPin` and delays via FreeRTOS.  On host/test: line levels come from
//! simulation statics and delays sleep the calling thread, so a sim run
//! paces like the real device.

use crate::app::ports::{DelayPort, LoopSensorPort};
use crate::sensors::Lane;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use embedded_hal::digital::InputPin;
#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::FreeRtos;
#[cfg(target_os = "espidf")]
use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};

#[cfg(not(target_os = "espidf"))]
static SIM_ENTRY_LOW: AtomicBool = AtomicBool::new(false);
#[cfg(not(target_os = "espidf"))]
static SIM_EXIT_LOW: AtomicBool = AtomicBool::new(false);

/// Drive the simulated entry loop (LOW = vehicle present).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_entry_low(low: bool) {
    SIM_ENTRY_LOW.store(low, Ordering::Relaxed);
}

/// Drive the simulated exit loop (LOW = vehicle present).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_exit_low(low: bool) {
    SIM_EXIT_LOW.store(low, Ordering::Relaxed);
}

pub struct HardwareAdapter {
    #[cfg(target_os = "espidf")]
    entry: PinDriver<'static, AnyIOPin, Input>,
    #[cfg(target_os = "espidf")]
    exit: PinDriver<'static, AnyIOPin, Input>,
}

impl HardwareAdapter {
    /// Configure both loop lines as pulled-up inputs.
    #[cfg(target_os = "espidf")]
    pub fn new(
        entry_pin: AnyIOPin,
        exit_pin: AnyIOPin,
    ) -> Result<Self, esp_idf_svc::sys::EspError> {
        let mut entry = PinDriver::input(entry_pin)?;
        entry.set_pull(Pull::Up)?;
        let mut exit = PinDriver::input(exit_pin)?;
        exit.set_pull(Pull::Up)?;
        Ok(Self { entry, exit })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        log::info!("HardwareAdapter: simulation backend");
        Self {}
    }
}

impl LoopSensorPort for HardwareAdapter {
    #[cfg(target_os = "espidf")]
    fn is_low(&mut self, lane: Lane) -> bool {
        // A read error is treated as "no vehicle" — the loop line failing
        // open must not count phantom crossings.
        match lane {
            Lane::Entry => InputPin::is_low(&mut self.entry).unwrap_or(false),
            Lane::Exit => InputPin::is_low(&mut self.exit).unwrap_or(false),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_low(&mut self, lane: Lane) -> bool {
        match lane {
            Lane::Entry => SIM_ENTRY_LOW.load(Ordering::Relaxed),
            Lane::Exit => SIM_EXIT_LOW.load(Ordering::Relaxed),
        }
    }
}

impl DelayPort for HardwareAdapter {
    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
