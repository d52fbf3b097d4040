//! LotWatch Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single fixed-period poll loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   SerialLinks       FileLedgerStore           │
//! │  (loops + delays)  (display+telem)   FileConfigStore           │
//! │  LogEventSink      Esp32TimeAdapter  Watchdog                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  LoopDetector ×2 · OccupancyLedger · CommandReceiver   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod diagnostics;
mod ledger;
mod pins;
mod proto;
mod sensors;

pub mod app;
mod adapters;
mod drivers;

// ── Imports ───────────────────────────────────────────────────
use std::path::Path;

use anyhow::Result;
use log::{info, warn};

use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::serial::SerialLinks;
use adapters::storage::{FileConfigStore, FileLedgerStore};
use adapters::time::Esp32TimeAdapter;
use app::ports::{ConfigPort, LedgerStorePort};
use app::service::AppService;
use config::SystemConfig;
use drivers::watchdog::Watchdog;

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::IOPin;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_hal::units::Hertz;

/// SPIFFS mount point carrying the occupancy record and config blob.
const STORAGE_MOUNT: &str = "/spiffs";

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  LotWatch v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    info!(
        "Loops: entry=GPIO{} exit=GPIO{} | display UART tx={}/rx={} | telemetry UART tx={}/rx={} @ {} baud",
        pins::ENTRY_LOOP_GPIO,
        pins::EXIT_LOOP_GPIO,
        pins::DISPLAY_UART_TX_GPIO,
        pins::DISPLAY_UART_RX_GPIO,
        pins::TELEMETRY_UART_TX_GPIO,
        pins::TELEMETRY_UART_RX_GPIO,
        pins::SERIAL_BAUD,
    );

    // ── 2. Mount persistent storage ───────────────────────────
    // A failed mount is survivable: loads fall back to defaults and every
    // save fails soft, so the lot still counts — it just forgets on reboot.
    if let Err(e) = mount_spiffs() {
        warn!("SPIFFS mount failed ({e}); counters will not survive power loss");
    }

    let storage_dir = Path::new(STORAGE_MOUNT);
    let mut ledger_store = FileLedgerStore::new(storage_dir);
    let config_store = FileConfigStore::new(storage_dir);

    // ── 3. Load config (or seed defaults on first boot) ───────
    let config = match config_store.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };
    if !config_store.exists() {
        if let Err(e) = config_store.save(&config) {
            warn!("Could not seed default config: {}", e);
        }
    }

    // ── 4. Construct adapters ─────────────────────────────────
    let peripherals = Peripherals::take()?;
    let gpio = peripherals.pins;

    let mut hw = HardwareAdapter::new(gpio.gpio5.downgrade(), gpio.gpio4.downgrade())?;

    let uart_config = UartConfig::new().baudrate(Hertz(pins::SERIAL_BAUD));
    let display_uart = UartDriver::new(
        peripherals.uart2,
        gpio.gpio16,
        gpio.gpio17,
        Option::<esp_idf_hal::gpio::AnyIOPin>::None,
        Option::<esp_idf_hal::gpio::AnyIOPin>::None,
        &uart_config,
    )?;
    let telemetry_uart = UartDriver::new(
        peripherals.uart1,
        gpio.gpio33,
        gpio.gpio32,
        Option::<esp_idf_hal::gpio::AnyIOPin>::None,
        Option::<esp_idf_hal::gpio::AnyIOPin>::None,
        &uart_config,
    )?;
    let mut links = SerialLinks::new(display_uart, telemetry_uart);

    let mut sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();
    let watchdog = Watchdog::new();

    // ── 5. Construct app service ──────────────────────────────
    let initial = ledger_store.load();
    let mut app = AppService::new(&config, initial);
    app.start(&mut links, &mut sink);

    info!("System ready. Entering poll loop.");

    // ── 6. Poll loop ──────────────────────────────────────────
    loop {
        let now_ms = clock.uptime_ms();
        app.tick(now_ms, &mut hw, &mut links, &mut ledger_store, &mut sink);

        if app.tick_count() % u64::from(config.status_log_interval_cycles) == 0 {
            let counters = app.counters();
            counters.log_summary(app.tick_count(), &app.status());
            if counters.any_failures() {
                warn!("Degraded: persistence or command channel has been failing, see HEALTH line");
            }
        }

        // Feed the watchdog on every iteration.
        watchdog.feed();

        FreeRtos::delay_ms(config.poll_interval_ms);
    }
}

/// Register the SPIFFS partition on the ESP-IDF virtual filesystem so the
/// storage adapters can use plain `std::fs`.
fn mount_spiffs() -> Result<()> {
    use esp_idf_svc::sys::{esp_vfs_spiffs_conf_t, esp_vfs_spiffs_register, ESP_OK};

    let conf = esp_vfs_spiffs_conf_t {
        base_path: c"/spiffs".as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: true,
    };

    // SAFETY: called once from the main task before any filesystem access.
    let ret = unsafe { esp_vfs_spiffs_register(&conf) };
    if ret != ESP_OK {
        anyhow::bail!("esp_vfs_spiffs_register returned {}", ret);
    }
    Ok(())
}
