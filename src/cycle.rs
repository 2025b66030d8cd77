//! One refresh cycle.
//!
//! A `CycleContext` is built from scratch on every refresh and carries the
//! loaded inputs, where they came from, and the derived snapshot through to
//! presentation. Nothing survives into the next cycle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::summary::{EventSummary, summarize};
use crate::analysis::thresholds::{CoherenceBand, GeomagneticState, psi_scale};
use crate::analysis::{compute_snapshot, eii::clamp_psi};
use crate::config::MonitorConfig;
use crate::ingest;
use crate::logging;
use crate::model::{MetricSnapshot, SeismicEvent, SolarSample, SourceOutcome};
use crate::staleness::latest_sample_is_stale_at;

/// Secondary readouts derived alongside the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub psi_s: f64,
    pub kp_index: f64,
    /// Kp-derived ψₛ amplification, in [1, 1.25].
    pub psi_scale: f64,
    pub coherence: CoherenceBand,
    pub geomagnetic: GeomagneticState,
    pub solar_stale: bool,
    pub events: EventSummary,
}

#[derive(Debug, Clone)]
pub struct CycleContext {
    pub started_at: DateTime<Utc>,
    pub region: String,
    pub seismic: SourceOutcome<Vec<SeismicEvent>>,
    pub solar: SourceOutcome<Vec<SolarSample>>,
    pub snapshot: MetricSnapshot,
    pub diagnostics: Diagnostics,
}

impl CycleContext {
    /// Runs the engine over already-loaded inputs.
    pub fn assemble(
        config: &MonitorConfig,
        seismic: SourceOutcome<Vec<SeismicEvent>>,
        solar: SourceOutcome<Vec<SolarSample>>,
        now: DateTime<Utc>,
    ) -> Self {
        let events = seismic.data();
        let samples = solar.data();

        let snapshot = compute_snapshot(events, samples, &config.engine.params(), now);

        let latest = samples.last();
        let kp_index = latest.map(|s| s.kp_index).unwrap_or(config.solar.fallback_kp);
        let diagnostics = Diagnostics {
            psi_s: latest.map(|s| clamp_psi(s.psi_s)).unwrap_or(0.0),
            kp_index,
            psi_scale: psi_scale(kp_index),
            coherence: CoherenceBand::from_cci(snapshot.cci),
            geomagnetic: GeomagneticState::from_kp(kp_index),
            solar_stale: latest_sample_is_stale_at(
                samples,
                config.solar.max_sample_age_minutes,
                now,
            ),
            events: summarize(events),
        };

        CycleContext {
            started_at: now,
            region: config.seismic.region.clone(),
            seismic,
            solar,
            snapshot,
            diagnostics,
        }
    }

    pub fn live_source_count(&self) -> usize {
        usize::from(self.seismic.is_live()) + usize::from(self.solar.is_live())
    }
}

/// Loads both sources, cleans, and computes. Each source falls back
/// independently of the other.
pub fn run_cycle_at(
    client: &reqwest::blocking::Client,
    config: &MonitorConfig,
    now: DateTime<Utc>,
) -> CycleContext {
    let seismic = ingest::load_seismic_at(client, config, now);
    let solar = ingest::load_solar_at(client, config, now);

    let context = CycleContext::assemble(config, seismic, solar, now);
    logging::log_snapshot(&context.region, &context.snapshot);

    if context.diagnostics.solar_stale {
        logging::warn(
            logging::DataSource::Noaa,
            None,
            &format!(
                "latest solar sample older than {} minutes",
                config.solar.max_sample_age_minutes
            ),
        );
    }
    logging::log_cycle_summary(
        context.seismic.data().len(),
        context.solar.data().len(),
        context.live_source_count(),
        2,
    );
    context
}

pub fn run_cycle(client: &reqwest::blocking::Client, config: &MonitorConfig) -> CycleContext {
    run_cycle_at(client, config, Utc::now())
}
