//! Integration tests for the AppService poll cycle.
//!
//! These run on the host (x86_64) and verify the full chain from scripted
//! loop-sensor levels down to emitted frames and persisted records,
//! without any real hardware.

use crate::mock_hw::{LogSink, MockHardware, MockLinks, MockStore};

use lotwatch::app::service::AppService;
use lotwatch::config::SystemConfig;
use lotwatch::ledger::OccupancyState;

fn make_app(total: u16, vacant: u16) -> (AppService, MockHardware, MockLinks, MockStore, LogSink) {
    let config = SystemConfig::default();
    let state = OccupancyState::new(total, vacant, 0, 0).unwrap();
    let app = AppService::new(&config, state);
    (
        app,
        MockHardware::new(),
        MockLinks::new(),
        MockStore::new(),
        LogSink::new(),
    )
}

// ── Startup reporting ────────────────────────────────────────

#[test]
fn startup_reports_initial_vacancy_on_display() {
    let (mut app, _hw, mut links, _store, mut sink) = make_app(99, 99);
    app.start(&mut links, &mut sink);

    assert_eq!(links.display_frames.len(), 1);
    assert_eq!(links.last_display_frame().unwrap(), b"|C|1|4|1|28-0-#u99|");
    assert!(sink.contains("Started"));
    // No crossing happened yet — telemetry stays quiet.
    assert!(links.telemetry_frames.is_empty());
}

// ── End-to-end: three entries into a five-slot lot ───────────

#[test]
fn three_entries_report_and_persist() {
    let (mut app, mut hw, mut links, mut store, mut sink) = make_app(5, 5);
    app.start(&mut links, &mut sink);

    for i in 0..3u32 {
        hw.script_entry_crossing();
        app.tick(i * 2000, &mut hw, &mut links, &mut store, &mut sink);
    }

    let status = app.status();
    assert_eq!(status.vacant_slots, 2);
    assert_eq!(status.total_entry, 3);
    assert_eq!(status.total_exit, 0);

    assert_eq!(links.last_display_frame().unwrap(), b"|C|1|4|1|28-0-#u02|");
    assert_eq!(
        links.last_telemetry_frame().unwrap(),
        &[0xAA, 5, 2, 3, 0, 0xCC]
    );

    // Every accepted crossing persisted the whole record.
    assert_eq!(store.saved.len(), 3);
    assert_eq!(
        store.last_saved().unwrap(),
        &OccupancyState::new(5, 2, 3, 0).unwrap()
    );

    // Each crossing paid the settle confirm plus the cool-down.
    assert_eq!(hw.slept_ms, 3 * (50 + 1000));
}

// ── Exits free slots ─────────────────────────────────────────

#[test]
fn exit_frees_a_slot_and_reports() {
    let (mut app, mut hw, mut links, mut store, mut sink) = make_app(5, 2);
    hw.script_exit_crossing();
    app.tick(0, &mut hw, &mut links, &mut store, &mut sink);

    let status = app.status();
    assert_eq!(status.vacant_slots, 3);
    assert_eq!(status.total_exit, 1);
    assert_eq!(links.last_display_frame().unwrap(), b"|C|1|4|1|28-0-#u03|");
    assert_eq!(
        links.last_telemetry_frame().unwrap(),
        &[0xAA, 5, 3, 0, 1, 0xCC]
    );
    assert_eq!(store.saved.len(), 1);
}

// ── Capacity bounds ──────────────────────────────────────────

#[test]
fn entry_into_full_lot_changes_nothing() {
    let (mut app, mut hw, mut links, mut store, mut sink) = make_app(3, 0);
    hw.script_entry_crossing();
    app.tick(0, &mut hw, &mut links, &mut store, &mut sink);

    let status = app.status();
    assert_eq!(status.vacant_slots, 0);
    assert_eq!(status.total_entry, 0, "rejected entries are not counted");
    assert!(links.display_frames.is_empty(), "no report on a rejected crossing");
    assert!(links.telemetry_frames.is_empty());
    assert!(store.saved.is_empty(), "nothing to persist");
    assert!(sink.contains("EntryIgnoredLotFull"));
    assert_eq!(app.counters().rejected_entries, 1);
    assert_eq!(hw.slept_ms, 50, "settle confirm ran, cool-down did not");
}

#[test]
fn exit_from_empty_lot_changes_nothing() {
    let (mut app, mut hw, mut links, mut store, mut sink) = make_app(5, 5);
    hw.script_exit_crossing();
    app.tick(0, &mut hw, &mut links, &mut store, &mut sink);

    let status = app.status();
    assert_eq!(status.vacant_slots, 5);
    assert_eq!(status.total_exit, 0, "rejected exits are not counted");
    assert!(links.telemetry_frames.is_empty());
    assert!(store.saved.is_empty());
    assert!(sink.contains("ExitIgnoredLotEmpty"));
    assert_eq!(app.counters().rejected_exits, 1);
}

// ── Sensor noise ─────────────────────────────────────────────

#[test]
fn noise_that_fails_the_confirm_read_is_ignored() {
    let (mut app, mut hw, mut links, mut store, mut sink) = make_app(5, 5);
    // Active on the first sample, gone by the settle confirm.
    hw.script_entry(&[true, false]);
    app.tick(0, &mut hw, &mut links, &mut store, &mut sink);

    assert_eq!(app.status().vacant_slots, 5);
    assert!(links.telemetry_frames.is_empty());
    assert!(store.saved.is_empty());
}

#[test]
fn simultaneous_entry_and_exit_both_count() {
    let (mut app, mut hw, mut links, mut store, mut sink) = make_app(5, 3);
    hw.script_entry_crossing();
    hw.script_exit_crossing();
    app.tick(0, &mut hw, &mut links, &mut store, &mut sink);

    let status = app.status();
    assert_eq!(status.vacant_slots, 3, "one in, one out nets to zero");
    assert_eq!(status.total_entry, 1);
    assert_eq!(status.total_exit, 1);
    assert_eq!(store.saved.len(), 2, "each crossing persisted separately");
}

// ── Persistence failure ──────────────────────────────────────

#[test]
fn failed_save_is_counted_and_survived() {
    let (mut app, mut hw, mut links, mut store, mut sink) = make_app(5, 5);
    store.fail_saves = true;

    hw.script_entry_crossing();
    app.tick(0, &mut hw, &mut links, &mut store, &mut sink);

    // In-memory state stays authoritative.
    assert_eq!(app.status().vacant_slots, 4);
    assert_eq!(app.counters().persist_failures, 1);
    assert!(sink.contains("PersistFailed"));
    // Frames still went out.
    assert_eq!(links.last_display_frame().unwrap(), b"|C|1|4|1|28-0-#u04|");

    // The loop keeps running and later saves succeed again.
    store.fail_saves = false;
    hw.script_entry_crossing();
    app.tick(2000, &mut hw, &mut links, &mut store, &mut sink);
    assert_eq!(store.saved.len(), 1);
    assert_eq!(app.counters().persist_failures, 1);
}

// ── Link failure ─────────────────────────────────────────────

#[test]
fn failed_frame_writes_do_not_stop_counting() {
    let (mut app, mut hw, mut links, mut store, mut sink) = make_app(5, 5);
    links.fail_writes = true;

    hw.script_entry_crossing();
    app.tick(0, &mut hw, &mut links, &mut store, &mut sink);

    // The ledger and the persisted record still advanced.
    assert_eq!(app.status().vacant_slots, 4);
    assert_eq!(store.saved.len(), 1);
    assert!(links.display_frames.is_empty());
}

// ── Display clamp ────────────────────────────────────────────

#[test]
fn vacancy_above_display_range_is_clamped_on_the_sign() {
    let (mut app, mut hw, mut links, mut store, mut sink) = make_app(150, 120);
    hw.script_entry_crossing();
    app.tick(0, &mut hw, &mut links, &mut store, &mut sink);

    assert_eq!(app.status().vacant_slots, 119);
    // The sign renders two digits; the true count still reaches telemetry
    // (saturated at u8 range).
    assert_eq!(links.last_display_frame().unwrap(), b"|C|1|4|1|28-0-#u99|");
    assert_eq!(
        links.last_telemetry_frame().unwrap(),
        &[0xAA, 150, 119, 1, 0, 0xCC]
    );
}
