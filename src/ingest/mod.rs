/// Data loading for one refresh cycle.
///
/// Each source is tried once. A failed live fetch is never retried within
/// the cycle; the loader inspects the `Result` and substitutes the fallback
/// for that source only:
///
/// - seismic: INGV FDSN → local events file → empty set
/// - solar:   NOAA plasma + Kp → synthetic series (Kp alone falls back to
///            the configured default)
///
/// Submodules:
/// - `noaa`: SWPC Kp and plasma products, hourly `SolarSample`s.
/// - `ingv`: FDSN event queries.
/// - `local`: static events file.
/// - `synthetic`: deterministic solar fallback series.
/// - `table`: delimited table parsing shared by `ingv` and `local`.

pub mod ingv;
pub mod local;
pub mod noaa;
pub mod synthetic;
pub mod table;

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::clean::{clean_rows, within_window_at};
use crate::config::{FeedConfig, MonitorConfig};
use crate::logging::{self, DataSource};
use crate::model::{RawSeismicRow, SeismicEvent, SolarSample, SourceError, SourceOutcome};
use crate::regions::region_or_default;

/// Builds the blocking HTTP client shared by every feed in a cycle.
pub fn build_client(feeds: &FeedConfig) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(feeds.timeout_secs))
        .user_agent(concat!("supt_monitor/", env!("CARGO_PKG_VERSION")))
        .build()
}

// ---------------------------------------------------------------------------
// Seismic
// ---------------------------------------------------------------------------

fn clean_and_log(source: DataSource, rows: &[RawSeismicRow]) -> Vec<SeismicEvent> {
    let events = clean_rows(rows);
    let dropped = rows.len() - events.len();
    if dropped > 0 {
        logging::debug(
            source,
            None,
            &format!("dropped {} of {} rows during cleaning", dropped, rows.len()),
        );
    }
    events
}

fn live_seismic(
    client: &reqwest::blocking::Client,
    config: &MonitorConfig,
    now: DateTime<Utc>,
) -> Result<Vec<SeismicEvent>, SourceError> {
    let region = region_or_default(&config.seismic.region);
    let rows = ingv::fetch_events(
        client,
        &config.feeds.ingv_event_url,
        region,
        config.seismic.window_days,
        now,
    )?;
    let events = within_window_at(
        clean_and_log(DataSource::Ingv, &rows),
        config.seismic.window_days,
        now,
    );
    if events.is_empty() {
        return Err(SourceError::Empty("no usable INGV events after cleaning".to_string()));
    }
    Ok(events)
}

/// Reads the local file. The window is anchored at the newest event in the
/// file, since a static export has no relation to the wall clock.
fn local_seismic(config: &MonitorConfig) -> Result<Vec<SeismicEvent>, SourceError> {
    let rows = local::read_events_file(&config.seismic.local_events_path)?;
    let events = clean_and_log(DataSource::Local, &rows);
    let newest = events
        .last()
        .map(|e| e.timestamp)
        .ok_or_else(|| SourceError::Empty("no usable rows in local events file".to_string()))?;
    Ok(within_window_at(events, config.seismic.window_days, newest))
}

/// Loads the seismic event window for the cycle.
pub fn load_seismic_at(
    client: &reqwest::blocking::Client,
    config: &MonitorConfig,
    now: DateTime<Utc>,
) -> SourceOutcome<Vec<SeismicEvent>> {
    let live_err = match live_seismic(client, config, now) {
        Ok(events) => {
            logging::info(
                DataSource::Ingv,
                Some(config.seismic.region.as_str()),
                &format!("Using live INGV data ({} events)", events.len()),
            );
            return SourceOutcome::Live(events);
        }
        Err(e) => e,
    };
    logging::log_fetch_failure(DataSource::Ingv, "INGV event fetch", &live_err);

    match local_seismic(config) {
        Ok(events) => {
            logging::info(
                DataSource::Local,
                Some(config.seismic.local_events_path.as_str()),
                &format!("Loaded local INGV dataset ({} events)", events.len()),
            );
            SourceOutcome::Fallback {
                data: events,
                reason: live_err.to_string(),
            }
        }
        Err(local_err) => {
            logging::error(
                DataSource::Local,
                Some(config.seismic.local_events_path.as_str()),
                &format!("Local events fallback failed: {}", local_err),
            );
            SourceOutcome::Fallback {
                data: Vec::new(),
                reason: format!("{}; local fallback: {}", live_err, local_err),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Solar
// ---------------------------------------------------------------------------

fn keep_recent(mut samples: Vec<SolarSample>, hours: i64) -> Vec<SolarSample> {
    let keep = usize::try_from(hours.max(0)).unwrap_or(0);
    if samples.len() > keep {
        samples.drain(..samples.len() - keep);
    }
    samples
}

/// Loads the hourly solar series for the cycle.
pub fn load_solar_at(
    client: &reqwest::blocking::Client,
    config: &MonitorConfig,
    now: DateTime<Utc>,
) -> SourceOutcome<Vec<SolarSample>> {
    let solar = &config.solar;

    let kp = noaa::fetch_kp_series(client, &config.feeds.noaa_kp_url);
    if let Err(e) = &kp {
        logging::log_fetch_failure(DataSource::Noaa, "Kp index fetch", e);
    }

    let plasma = noaa::fetch_plasma_series(client, &config.feeds.noaa_plasma_url);
    if let Err(e) = &plasma {
        logging::log_fetch_failure(DataSource::Noaa, "Solar wind plasma fetch", e);
    }

    match (plasma, kp) {
        (Ok(plasma), Ok(kp)) => {
            let samples = noaa::assemble_solar_samples(
                &plasma,
                &kp,
                solar.fallback_kp,
                solar.reference_pressure_npa,
            );
            SourceOutcome::Live(keep_recent(samples, solar.history_hours))
        }
        (Ok(plasma), Err(kp_err)) => {
            let samples = noaa::assemble_solar_samples(
                &plasma,
                &[],
                solar.fallback_kp,
                solar.reference_pressure_npa,
            );
            SourceOutcome::Fallback {
                data: keep_recent(samples, solar.history_hours),
                reason: format!("Kp: {}", kp_err),
            }
        }
        (Err(plasma_err), kp) => {
            let kp_now = kp
                .as_ref()
                .ok()
                .and_then(|series| noaa::kp_at(series, now))
                .unwrap_or(solar.fallback_kp);
            logging::info(
                DataSource::Synthetic,
                None,
                &format!("Using synthetic solar series around ψₛ={:.2}", solar.default_psi_s),
            );
            let reason = match kp {
                Ok(_) => format!("plasma: {}", plasma_err),
                Err(kp_err) => format!("plasma: {}; Kp: {}", plasma_err, kp_err),
            };
            SourceOutcome::Fallback {
                data: synthetic::solar_series_at(
                    solar.default_psi_s,
                    kp_now,
                    solar.history_hours,
                    now,
                ),
                reason,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn sample(hour: u32) -> SolarSample {
        SolarSample {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 10, hour, 0, 0).unwrap(),
            psi_s: 0.5,
            wind_speed: 400.0,
            kp_index: 2.0,
        }
    }

    #[test]
    fn test_keep_recent_drops_oldest() {
        let samples: Vec<SolarSample> = (0..10).map(sample).collect();
        let kept = keep_recent(samples, 4);
        assert_eq!(kept.len(), 4);
        assert_eq!(kept[0].timestamp.format("%H").to_string(), "06");
    }

    #[test]
    fn test_keep_recent_short_series_untouched() {
        let samples: Vec<SolarSample> = (0..3).map(sample).collect();
        assert_eq!(keep_recent(samples, 24).len(), 3);
    }

    #[test]
    fn test_local_window_is_anchored_at_newest_event() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let newest = Utc.with_ymd_and_hms(2020, 1, 10, 0, 0, 0).unwrap();
        let text = format!(
            "Time,Magnitude,Depth\n{},1.0,2.0\n{},2.0,1.0\n",
            (newest - ChronoDuration::days(30)).to_rfc3339(),
            newest.to_rfc3339(),
        );
        std::io::Write::write_all(&mut file, text.as_bytes()).unwrap();

        let mut config = MonitorConfig::default();
        config.seismic.local_events_path = file.path().display().to_string();
        config.seismic.window_days = 7;

        let events = local_seismic(&config).expect("local file loads");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].magnitude, 2.0);
    }
}
