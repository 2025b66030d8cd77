//! 48-hour ψₛ harmonic projection.

use chrono::{DateTime, Duration, Utc};
use std::f64::consts::TAU;

use crate::model::{FORECAST_HOURS, ForecastPoint};

/// Projects ψₛ over the next 48 hours as `ψₛ + amplitude·sin(2π·k/period)`
/// for k = 1..=48, stamped `now + k` hours.
///
/// A non-positive period yields a flat projection at ψₛ.
pub fn harmonic_forecast(
    psi_s: f64,
    amplitude: f64,
    period_hours: f64,
    now: DateTime<Utc>,
) -> Vec<ForecastPoint> {
    (1..=FORECAST_HOURS)
        .map(|k| {
            let wave = if period_hours > 0.0 {
                amplitude * (TAU * k as f64 / period_hours).sin()
            } else {
                0.0
            };
            ForecastPoint {
                timestamp: now + Duration::hours(k as i64),
                psi_s: psi_s + wave,
            }
        })
        .collect()
}
