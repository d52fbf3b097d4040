//! Filesystem storage adapters.
//!
//! Implements both [`LedgerStorePort`] and [`ConfigPort`] on top of a
//! mounted filesystem (SPIFFS on the device, any directory on the host).
//!
//! - The occupancy record is one human-inspectable CSV line
//!   (`total,vacant,entry,exit`) — the format field technicians expect to
//!   find when they pull the flash.
//! - Writes go through a temp file + rename so a power cut mid-save leaves
//!   the previous record intact, never a torn one.
//! - Loads fail soft: an unattended controller must come up counting, not
//!   crash on a corrupt sector.
//! - Config is a postcard blob, range-validated before every save.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, LedgerStorePort, StorageError};
use crate::config::SystemConfig;
use crate::ledger::OccupancyState;

const RECORD_FILE: &str = "metadata.txt";
const ENTRY_DUMP_FILE: &str = "total_entry.txt";
const EXIT_DUMP_FILE: &str = "total_exit.txt";
const CONFIG_FILE: &str = "config.bin";

// ───────────────────────────────────────────────────────────────
// Ledger store
// ───────────────────────────────────────────────────────────────

/// File-backed store for the four-counter occupancy record.
pub struct FileLedgerStore {
    record_path: PathBuf,
    entry_dump_path: PathBuf,
    exit_dump_path: PathBuf,
}

impl FileLedgerStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            record_path: dir.join(RECORD_FILE),
            entry_dump_path: dir.join(ENTRY_DUMP_FILE),
            exit_dump_path: dir.join(EXIT_DUMP_FILE),
        }
    }

    fn parse_record(content: &str) -> Result<OccupancyState, StorageError> {
        let line = content.lines().next().ok_or(StorageError::Malformed)?;
        let mut fields = line.trim().split(',');
        let mut next_int = || -> Result<u32, StorageError> {
            fields
                .next()
                .ok_or(StorageError::Malformed)?
                .trim()
                .parse::<u32>()
                .map_err(|_| StorageError::Malformed)
        };
        let total = next_int()?;
        let vacant = next_int()?;
        let entry = next_int()?;
        let exit = next_int()?;
        if fields.next().is_some() {
            return Err(StorageError::Malformed);
        }
        if total > u32::from(u16::MAX) || vacant > u32::from(u16::MAX) {
            return Err(StorageError::Malformed);
        }
        OccupancyState::new(total as u16, vacant as u16, entry, exit)
            .map_err(|_| StorageError::Malformed)
    }

    fn encode_record(state: &OccupancyState) -> String {
        format!(
            "{},{},{},{}\n",
            state.total_slots(),
            state.vacant_slots(),
            state.total_entry(),
            state.total_exit()
        )
    }
}

impl LedgerStorePort for FileLedgerStore {
    fn load(&self) -> OccupancyState {
        match fs::read_to_string(&self.record_path) {
            Ok(content) => match Self::parse_record(&content) {
                Ok(state) => {
                    info!(
                        "Ledger loaded: {}/{} vacant, lifetime {}↑ {}↓",
                        state.vacant_slots(),
                        state.total_slots(),
                        state.total_entry(),
                        state.total_exit()
                    );
                    state
                }
                Err(e) => {
                    warn!("Ledger record malformed ({}), using fallback", e);
                    OccupancyState::fallback()
                }
            },
            Err(e) => {
                info!("No ledger record ({}), using fallback", e);
                OccupancyState::fallback()
            }
        }
    }

    fn save(&mut self, state: &OccupancyState) -> Result<(), StorageError> {
        // Whole-record overwrite, staged through a temp file so a power cut
        // mid-write can never leave a torn record behind.
        let tmp = self.record_path.with_extension("tmp");
        fs::write(&tmp, Self::encode_record(state)).map_err(|_| StorageError::IoError)?;
        fs::rename(&tmp, &self.record_path).map_err(|_| StorageError::IoError)?;

        // Side channel for external inspection: raw lifetime counters, one
        // per file.  Best-effort and never read back.
        let _ = fs::write(&self.entry_dump_path, state.total_entry().to_string());
        let _ = fs::write(&self.exit_dump_path, state.total_exit().to_string());
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Config store
// ───────────────────────────────────────────────────────────────

/// File-backed store for [`SystemConfig`] (postcard blob).
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(CONFIG_FILE),
        }
    }

    /// Whether a stored config blob exists (used to seed defaults on
    /// first boot).
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

fn validate_config(cfg: &SystemConfig) -> Result<(), ConfigError> {
    if !(10..=1000).contains(&cfg.debounce_ms) {
        return Err(ConfigError::ValidationFailed("debounce_ms must be 10–1000"));
    }
    if !(10..=1000).contains(&cfg.settle_ms) {
        return Err(ConfigError::ValidationFailed("settle_ms must be 10–1000"));
    }
    if !(50..=5000).contains(&cfg.poll_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "poll_interval_ms must be 50–5000",
        ));
    }
    if cfg.event_cooldown_ms > 10_000 {
        return Err(ConfigError::ValidationFailed(
            "event_cooldown_ms must be ≤ 10000",
        ));
    }
    if !(100..=10_000).contains(&cfg.command_max_age_ms) {
        return Err(ConfigError::ValidationFailed(
            "command_max_age_ms must be 100–10000",
        ));
    }
    if cfg.status_log_interval_cycles == 0 {
        return Err(ConfigError::ValidationFailed(
            "status_log_interval_cycles must be ≥ 1",
        ));
    }
    Ok(())
}

impl ConfigPort for FileConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(_) => {
                info!("No stored config, using defaults");
                return Ok(SystemConfig::default());
            }
        };
        let cfg: SystemConfig =
            postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
        validate_config(&cfg).map_err(|_| ConfigError::Corrupted)?;
        info!("Config loaded from storage ({} bytes)", bytes.len());
        Ok(cfg)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes).map_err(|_| ConfigError::IoError)?;
        fs::rename(&tmp, &self.path).map_err(|_| ConfigError::IoError)?;
        info!("Config saved ({} bytes)", bytes.len());
        Ok(())
    }
}
