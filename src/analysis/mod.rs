/// Metric engine for the SUPT continuum monitor.
///
/// A pure function of the cleaned event window, the hourly solar series,
/// the engine parameters and the cycle clock. No I/O, no state.
///
/// Submodules:
/// - `eii`: Energetic Instability Index.
/// - `coherence`: Coupling Coherence Index (squared Pearson correlation).
/// - `forecast`: 48-hour ψₛ harmonic projection.
/// - `thresholds`: RPAM phase, CCI band and geomagnetic state.
/// - `summary`: event window summary.

pub mod coherence;
pub mod eii;
pub mod forecast;
pub mod summary;
pub mod thresholds;

use chrono::{DateTime, Utc};

use crate::model::{MetricSnapshot, SeismicEvent, SolarSample};
use eii::{WindowStats, clamp_psi};
use thresholds::RpamPhase;

/// Rolling mean window applied to depths before correlating.
pub const DEPTH_SMOOTHING_EVENTS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineParams {
    /// Events strictly shallower than this count towards Shallow_ratio.
    pub shallow_depth_km: f64,
    /// Upper clip for the smoothed depth signal.
    pub depth_clip_km: f64,
    pub forecast_amplitude: f64,
    pub forecast_period_hours: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            shallow_depth_km: 2.5,
            depth_clip_km: 5.0,
            forecast_amplitude: 0.3,
            forecast_period_hours: 48.0,
        }
    }
}

/// Computes the snapshot for one cycle.
///
/// The latest ψₛ is the last sample of `solar`. An empty event window or an
/// empty solar series yields the neutral snapshot (EII 0, MONITORING,
/// CCI 0); the forecast is still produced around the latest ψₛ, or 0 when
/// there is none.
pub fn compute_snapshot(
    events: &[SeismicEvent],
    solar: &[SolarSample],
    params: &EngineParams,
    now: DateTime<Utc>,
) -> MetricSnapshot {
    let psi_s = solar.last().map(|s| clamp_psi(s.psi_s)).unwrap_or(0.0);
    let forecast = forecast::harmonic_forecast(
        psi_s,
        params.forecast_amplitude,
        params.forecast_period_hours,
        now,
    );

    let stats = match WindowStats::from_events(events, params.shallow_depth_km) {
        Some(stats) if !solar.is_empty() => stats,
        _ => {
            return MetricSnapshot {
                eii: 0.0,
                rpam: RpamPhase::Monitoring,
                cci: 0.0,
                forecast,
            };
        }
    };

    let eii = stats.eii(psi_s);

    let psi_series: Vec<f64> = solar.iter().map(|s| clamp_psi(s.psi_s)).collect();
    let depths: Vec<f64> = events.iter().map(|e| e.depth_km).collect();
    let cci = coherence::compute_cci(
        &psi_series,
        &depths,
        DEPTH_SMOOTHING_EVENTS,
        params.depth_clip_km,
    );

    MetricSnapshot {
        eii,
        rpam: RpamPhase::from_eii(eii),
        cci,
        forecast,
    }
}
