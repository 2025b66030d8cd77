/// SeismicEvent, SolarSample, MetricSnapshot, SourceOutcome, SourceError
/// core data structures and error handling
///
/// Core data types for the SUPT continuum monitor.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond small accessors, and no I/O.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::analysis::thresholds::RpamPhase;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of hourly points in every forecast.
pub const FORECAST_HOURS: usize = 48;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// One cleaned seismic event.
///
/// Produced only by `clean::clean_rows` / `clean::normalize_events`, which
/// guarantee a finite magnitude and `depth_km >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeismicEvent {
    pub timestamp: DateTime<Utc>,
    pub magnitude: f64,
    pub depth_km: f64,
}

/// A seismic row exactly as read from the INGV feed or the local file.
///
/// Every cell is optional text; nothing is validated until cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeismicRow {
    pub time: Option<String>,
    pub magnitude: Option<String>,
    pub depth: Option<String>,
}

impl From<&SeismicEvent> for RawSeismicRow {
    /// Renders a clean event back into the canonical textual row shape.
    /// `f64` Display output round-trips exactly through `str::parse`.
    fn from(event: &SeismicEvent) -> Self {
        RawSeismicRow {
            time: Some(event.timestamp.to_rfc3339()),
            magnitude: Some(event.magnitude.to_string()),
            depth: Some(event.depth_km.to_string()),
        }
    }
}

/// One hourly solar / geomagnetic sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarSample {
    pub timestamp: DateTime<Utc>,
    /// Normalized solar wind pressure proxy, nominally in [0, 1].
    pub psi_s: f64,
    /// Bulk solar wind speed, km/s.
    pub wind_speed: f64,
    /// Planetary K-index, 0–9.
    pub kp_index: f64,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One point of the ψₛ harmonic projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub psi_s: f64,
}

/// Everything the presentation layer needs for one refresh.
///
/// Created fresh every cycle and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub eii: f64,
    pub rpam: RpamPhase,
    pub cci: f64,
    pub forecast: Vec<ForecastPoint>,
}

// ---------------------------------------------------------------------------
// Source outcomes
// ---------------------------------------------------------------------------

/// Result of loading one data source for the current cycle.
///
/// The loader always produces data; `Fallback` records why the live feed
/// was not used.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome<T> {
    Live(T),
    Fallback { data: T, reason: String },
}

impl<T> SourceOutcome<T> {
    pub fn data(&self) -> &T {
        match self {
            SourceOutcome::Live(data) => data,
            SourceOutcome::Fallback { data, .. } => data,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, SourceOutcome::Live(_))
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            SourceOutcome::Live(_) => None,
            SourceOutcome::Fallback { reason, .. } => Some(reason),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Coarse failure taxonomy shared by every source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NetworkFailure,
    MalformedInput,
    EmptyDataset,
}

/// Errors that can arise when fetching or reading a data source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Non-2xx HTTP response.
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Connection, TLS or timeout failure, or an undecodable body.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response or file was readable but not in the expected shape.
    #[error("Parse error: {0}")]
    Malformed(String),

    /// The source answered but contained no usable rows.
    #[error("No data: {0}")]
    Empty(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Csv(#[from] csv::Error),
}

impl SourceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SourceError::Http(_) | SourceError::Network(_) | SourceError::Io(_) => {
                FailureKind::NetworkFailure
            }
            SourceError::Malformed(_) | SourceError::Csv(_) => FailureKind::MalformedInput,
            SourceError::Empty(_) => FailureKind::EmptyDataset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_source_error_kinds() {
        assert_eq!(SourceError::Http(503).kind(), FailureKind::NetworkFailure);
        assert_eq!(
            SourceError::Malformed("bad row".to_string()).kind(),
            FailureKind::MalformedInput
        );
        assert_eq!(
            SourceError::Empty("INGV".to_string()).kind(),
            FailureKind::EmptyDataset
        );
    }

    #[test]
    fn test_fallback_outcome_exposes_reason() {
        let outcome = SourceOutcome::Fallback {
            data: vec![1, 2],
            reason: "HTTP error: 500".to_string(),
        };
        assert!(!outcome.is_live());
        assert_eq!(outcome.data(), &vec![1, 2]);
        assert_eq!(outcome.fallback_reason(), Some("HTTP error: 500"));
    }

    #[test]
    fn test_raw_row_from_event_is_canonical() {
        let event = SeismicEvent {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 20, 18, 10, 0).unwrap(),
            magnitude: 4.4,
            depth_km: 2.6,
        };
        let row = RawSeismicRow::from(&event);
        assert_eq!(row.time.as_deref(), Some("2024-05-20T18:10:00+00:00"));
        assert_eq!(row.magnitude.as_deref(), Some("4.4"));
        assert_eq!(row.depth.as_deref(), Some("2.6"));
    }
}
