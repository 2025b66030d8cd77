//! Terminal rendering and JSON export of a cycle.
//!
//! The charting front-end is external; it can consume `to_json`. The text
//! panel is what the interactive binary prints after each refresh.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

use crate::cycle::{CycleContext, Diagnostics};
use crate::model::{MetricSnapshot, SourceOutcome};

const GAUGE_WIDTH: usize = 30;
const SPARK_LEVELS: &[char] = &['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Serialize)]
pub struct SourceStatus {
    pub live: bool,
    pub fallback_reason: Option<String>,
}

impl<T> From<&SourceOutcome<T>> for SourceStatus {
    fn from(outcome: &SourceOutcome<T>) -> Self {
        SourceStatus {
            live: outcome.is_live(),
            fallback_reason: outcome.fallback_reason().map(String::from),
        }
    }
}

/// Serializable view of one cycle, for the presentation layer.
#[derive(Debug, Serialize)]
pub struct CycleReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub region: &'a str,
    pub seismic_source: SourceStatus,
    pub solar_source: SourceStatus,
    pub snapshot: &'a MetricSnapshot,
    pub diagnostics: &'a Diagnostics,
}

impl<'a> From<&'a CycleContext> for CycleReport<'a> {
    fn from(context: &'a CycleContext) -> Self {
        CycleReport {
            generated_at: context.started_at,
            region: &context.region,
            seismic_source: SourceStatus::from(&context.seismic),
            solar_source: SourceStatus::from(&context.solar),
            snapshot: &context.snapshot,
            diagnostics: &context.diagnostics,
        }
    }
}

pub fn to_json(context: &CycleContext) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CycleReport::from(context))
}

/// Horizontal bar for a value in [0, 1].
pub fn gauge_bar(value: f64, width: usize) -> String {
    let filled = ((value.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// One character per value, scaled between the series min and max.
pub fn sparkline(values: &[f64]) -> String {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    values
        .iter()
        .map(|v| {
            let level = if span > 0.0 {
                (((v - min) / span) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
            } else {
                0
            };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

fn source_line(name: &str, status: &SourceStatus) -> String {
    match &status.fallback_reason {
        None => format!("{}: live", name),
        Some(reason) => format!("{}: fallback ({})", name, reason),
    }
}

/// Renders the text panel for one cycle.
pub fn render_text(context: &CycleContext) -> String {
    let snapshot = &context.snapshot;
    let diag = &context.diagnostics;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "═══════════════════════════════════════════════════════════");
    let _ = writeln!(out, " SUPT Continuum Monitor - {}", context.region);
    let _ = writeln!(out, "═══════════════════════════════════════════════════════════");
    let _ = writeln!(out, " EII   {:.3}", snapshot.eii);
    let _ = writeln!(out, " RPAM  {}", snapshot.rpam.label());
    let stale = if diag.solar_stale { "  (stale)" } else { "" };
    let _ = writeln!(
        out,
        " Kp    {:.1}   ψₛ {:.2}   ψₛ-scale {:.3}{}",
        diag.kp_index, diag.psi_s, diag.psi_scale, stale
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        " CCI   {:.3} {} {} ({})",
        snapshot.cci,
        gauge_bar(snapshot.cci, GAUGE_WIDTH),
        diag.coherence.label(),
        diag.coherence.color()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, " Diagnostic");
    let _ = writeln!(out, "   {}", snapshot.rpam.interpretation());
    let _ = writeln!(out, "   {}", diag.coherence.note());
    let _ = writeln!(out, "   {}", diag.geomagnetic.description());
    let _ = writeln!(out);

    let summary = &diag.events;
    match &summary.latest {
        Some(latest) => {
            let _ = writeln!(
                out,
                " Latest event: {} | Md {:.1} | Depth {:.1} km",
                latest.timestamp.format("%Y-%m-%d %H:%M UTC"),
                latest.magnitude,
                latest.depth_km
            );
            let _ = writeln!(
                out,
                " Events loaded: {} | Mean Md {:.2} | Mean depth {:.2} km",
                summary.count,
                summary.mean_magnitude.unwrap_or(0.0),
                summary.mean_depth_km.unwrap_or(0.0)
            );
        }
        None => {
            let _ = writeln!(out, " No valid INGV events in the current window.");
        }
    }
    let _ = writeln!(out);

    let forecast: Vec<f64> = snapshot.forecast.iter().map(|p| p.psi_s).collect();
    let _ = writeln!(out, " 48h ψₛ forecast");
    let _ = writeln!(out, "   {}", sparkline(&forecast));
    if let (Some(first), Some(last)) = (snapshot.forecast.first(), snapshot.forecast.last()) {
        let _ = writeln!(
            out,
            "   {} → {}",
            first.timestamp.format("%m-%d %H:%M"),
            last.timestamp.format("%m-%d %H:%M")
        );
    }
    let _ = writeln!(out);

    let report = CycleReport::from(context);
    let _ = writeln!(out, " {}", source_line("INGV", &report.seismic_source));
    let _ = writeln!(out, " {}", source_line("NOAA", &report.solar_source));
    let _ = writeln!(
        out,
        " Updated {}",
        context.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out
}
