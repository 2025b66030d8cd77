//! Offline integration tests for the refresh cycle.
//!
//! Every feed URL points at a closed local port, so each cycle exercises the
//! fallback path: the bundled `data/events.csv` for seismic data and the
//! synthetic series for solar data. No network access is needed.
//!
//! Run with: cargo test --test pipeline

use chrono::{TimeZone, Utc};

use supt_monitor::analysis::thresholds::RpamPhase;
use supt_monitor::clean::{clean_rows, to_rows};
use supt_monitor::config::MonitorConfig;
use supt_monitor::cycle::run_cycle_at;
use supt_monitor::ingest::{build_client, local};
use supt_monitor::report::{render_text, to_json};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const UNREACHABLE: &str = "http://127.0.0.1:9/unreachable";

fn fixture_path() -> String {
    format!("{}/data/events.csv", env!("CARGO_MANIFEST_DIR"))
}

fn offline_config() -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.feeds.noaa_kp_url = UNREACHABLE.to_string();
    config.feeds.noaa_plasma_url = UNREACHABLE.to_string();
    config.feeds.ingv_event_url = UNREACHABLE.to_string();
    config.feeds.timeout_secs = 2;
    config.seismic.local_events_path = fixture_path();
    config
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 21, 6, 0, 0).unwrap()
}

// ---------------------------------------------------------------------------
// Fallback behaviour
// ---------------------------------------------------------------------------

#[test]
fn test_offline_cycle_uses_local_and_synthetic_fallbacks() {
    let config = offline_config();
    let client = build_client(&config.feeds).expect("client builds");

    let context = run_cycle_at(&client, &config, fixed_now());

    assert!(!context.seismic.is_live());
    assert!(!context.solar.is_live());
    assert!(context.seismic.fallback_reason().is_some());

    // 12 rows in the fixture, one with an unparseable magnitude and one
    // with an empty depth.
    assert_eq!(context.seismic.data().len(), 10);
    assert_eq!(context.solar.data().len(), 24);
    assert!(context.solar.data().iter().all(|s| s.kp_index == config.solar.fallback_kp));
}

#[test]
fn test_offline_cycle_snapshot() {
    let config = offline_config();
    let client = build_client(&config.feeds).expect("client builds");

    let snapshot = run_cycle_at(&client, &config, fixed_now()).snapshot;

    // The Md 4.4 event alone saturates the index.
    assert_eq!(snapshot.eii, 1.0);
    assert_eq!(snapshot.rpam, RpamPhase::Active);
    assert!((0.0..=1.0).contains(&snapshot.cci));
    assert_eq!(snapshot.forecast.len(), 48);
    assert!(snapshot.forecast.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn test_offline_cycle_uses_configured_default_psi() {
    let mut config = offline_config();
    let client = build_client(&config.feeds).expect("client builds");

    let context = run_cycle_at(&client, &config, fixed_now());
    assert_eq!(context.diagnostics.psi_s, config.solar.default_psi_s);

    // independent of how much history is synthesized
    config.solar.history_hours = 7;
    let context = run_cycle_at(&client, &config, fixed_now());
    assert_eq!(context.solar.data().len(), 7);
    assert_eq!(context.diagnostics.psi_s, config.solar.default_psi_s);
}

#[test]
fn test_offline_cycle_is_deterministic() {
    let config = offline_config();
    let client = build_client(&config.feeds).expect("client builds");

    let a = run_cycle_at(&client, &config, fixed_now());
    let b = run_cycle_at(&client, &config, fixed_now());
    assert_eq!(a.snapshot, b.snapshot);
    assert_eq!(a.diagnostics, b.diagnostics);
}

#[test]
fn test_missing_local_file_gives_neutral_snapshot() {
    let mut config = offline_config();
    config.seismic.local_events_path = "/nonexistent/events.csv".to_string();
    let client = build_client(&config.feeds).expect("client builds");

    let context = run_cycle_at(&client, &config, fixed_now());

    assert!(context.seismic.data().is_empty());
    assert_eq!(context.snapshot.eii, 0.0);
    assert_eq!(context.snapshot.rpam, RpamPhase::Monitoring);
    assert_eq!(context.snapshot.cci, 0.0);
    assert_eq!(context.snapshot.forecast.len(), 48);
    // solar fallback is independent of the seismic failure
    assert_eq!(context.solar.data().len(), 24);
}

// ---------------------------------------------------------------------------
// Cleaning the bundled file
// ---------------------------------------------------------------------------

#[test]
fn test_fixture_cleaning_invariants() {
    let rows = local::read_events_file(fixture_path()).expect("fixture is readable");
    let events = clean_rows(&rows);

    assert!(events.iter().all(|e| e.depth_km >= 0.0 && e.magnitude.is_finite()));
    assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(clean_rows(&to_rows(&events)), events);
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

#[test]
fn test_offline_cycle_renders() {
    let config = offline_config();
    let client = build_client(&config.feeds).expect("client builds");
    let context = run_cycle_at(&client, &config, fixed_now());

    let text = render_text(&context);
    assert!(text.contains("ACTIVE"));
    assert!(text.contains("Events loaded: 10"));
    assert!(text.contains("INGV: fallback"));

    let json = to_json(&context).expect("serializable");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["snapshot"]["rpam"], "ACTIVE");
    assert_eq!(value["solar_source"]["live"], false);
}
