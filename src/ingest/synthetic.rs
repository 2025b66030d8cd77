//! Synthetic solar series used when NOAA cannot be reached.
//!
//! A gentle diurnal wave around the configured default ψₛ, so the CCI still
//! has a series with non-zero variance to correlate against.

use chrono::{DateTime, Duration, DurationRound, TimeDelta, Utc};
use std::f64::consts::TAU;

use crate::model::SolarSample;

const DIURNAL_AMPLITUDE: f64 = 0.05;
const NOMINAL_WIND_SPEED_KMS: f64 = 400.0;

/// `hours` hourly samples ending at the hour containing `now`, oldest first.
pub fn solar_series_at(
    default_psi_s: f64,
    kp_index: f64,
    hours: i64,
    now: DateTime<Utc>,
) -> Vec<SolarSample> {
    let end = now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now);
    (0..hours.max(0))
        .map(|i| {
            let offset = hours - 1 - i;
            // phased so the newest sample sits exactly on the default
            let phase = -TAU * offset as f64 / 24.0;
            SolarSample {
                timestamp: end - Duration::hours(offset),
                psi_s: (default_psi_s + DIURNAL_AMPLITUDE * phase.sin()).clamp(0.0, 1.0),
                wind_speed: NOMINAL_WIND_SPEED_KMS,
                kp_index: kp_index.clamp(0.0, 9.0),
            }
        })
        .collect()
}
