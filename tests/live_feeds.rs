//! Live Feed Integration Tests
//!
//! These tests hit the real NOAA SWPC and INGV services and document which
//! feeds are reachable right now. They need internet access and are ignored
//! by default.
//!
//! Run with: cargo test --test live_feeds -- --ignored --nocapture

use supt_monitor::config::MonitorConfig;
use supt_monitor::cycle::run_cycle;
use supt_monitor::ingest::{build_client, noaa};
use supt_monitor::verify::{VerificationStatus, print_summary, verify_feeds};

fn live_config() -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.feeds.timeout_secs = 30;
    config.seismic.local_events_path = format!("{}/data/events.csv", env!("CARGO_MANIFEST_DIR"));
    config
}

#[test]
#[ignore]
fn test_noaa_kp_feed() {
    let config = live_config();
    let client = build_client(&config.feeds).unwrap();

    let kp = noaa::fetch_kp_series(&client, &config.feeds.noaa_kp_url)
        .expect("Kp product should be available");

    println!("\n🔍 NOAA Kp: {} readings, latest {:?}", kp.len(), kp.last());
    assert!(kp.iter().all(|r| (0.0..=9.0).contains(&r.kp)));
}

#[test]
#[ignore]
fn test_noaa_plasma_feed() {
    let config = live_config();
    let client = build_client(&config.feeds).unwrap();

    let plasma = noaa::fetch_plasma_series(&client, &config.feeds.noaa_plasma_url)
        .expect("plasma product should be available");
    let samples = noaa::assemble_solar_samples(&plasma, &[], 0.0, 10.0);

    println!("\n🔍 NOAA plasma: {} readings → {} hourly samples", plasma.len(), samples.len());
    assert!(!samples.is_empty());
    assert!(samples.iter().all(|s| (0.0..=1.0).contains(&s.psi_s)));
}

#[test]
#[ignore]
fn test_feed_verification() {
    let config = live_config();
    let client = build_client(&config.feeds).unwrap();

    let report = verify_feeds(&client, &config);
    print_summary(&report);

    // The bundled local file must always verify.
    let local = report
        .results
        .iter()
        .find(|r| r.name == "Local events file")
        .expect("local file is always checked");
    assert_eq!(local.status, VerificationStatus::Success);
}

#[test]
#[ignore]
fn test_live_cycle() {
    let config = live_config();
    let client = build_client(&config.feeds).unwrap();

    let context = run_cycle(&client, &config);

    println!("\nSeismic live: {}, solar live: {}", context.seismic.is_live(), context.solar.is_live());
    println!("EII {:.3} | {} | CCI {:.3}", context.snapshot.eii, context.snapshot.rpam, context.snapshot.cci);
    assert_eq!(context.snapshot.forecast.len(), 48);
    assert!((0.0..=1.0).contains(&context.snapshot.eii));
}
