//! Seismic record cleaning.
//!
//! Turns raw rows of arbitrary shape into `SeismicEvent`s with a parsed UTC
//! timestamp, a finite magnitude and a non-negative depth, in chronological
//! order. Rows that cannot be coerced are dropped. Cleaning is idempotent.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::model::{RawSeismicRow, SeismicEvent};

// INGV exports magnitudes as e.g. "Md 0.5±0.3" or "ML -0.2"; the first signed
// decimal is the value.
static MAGNITUDE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("static regex"));

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

/// Parses a timestamp in RFC 3339 or one of the naive INGV/NOAA layouts.
/// Naive timestamps are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Extracts the first number in a magnitude cell.
pub fn parse_magnitude(value: &str) -> Option<f64> {
    MAGNITUDE_REGEX
        .find(value)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parses a depth cell, clamping hypocentres above sea level to 0 km.
pub fn parse_depth(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.max(0.0))
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

fn clean_row(row: &RawSeismicRow) -> Option<SeismicEvent> {
    let timestamp = parse_timestamp(row.time.as_deref()?)?;
    let magnitude = parse_magnitude(row.magnitude.as_deref()?)?;
    let depth_km = parse_depth(row.depth.as_deref()?)?;
    Some(SeismicEvent {
        timestamp,
        magnitude,
        depth_km,
    })
}

/// Cleans raw rows into chronologically ordered events, dropping any row
/// whose time, magnitude or depth cannot be coerced.
pub fn clean_rows(rows: &[RawSeismicRow]) -> Vec<SeismicEvent> {
    let events: Vec<SeismicEvent> = rows.iter().filter_map(clean_row).collect();
    normalize_events(events)
}

/// Re-applies the cleaning invariants to already-typed events.
///
/// Non-finite values are dropped, negative depths clamp to 0 and the result
/// is stable-sorted by timestamp. A no-op on clean input.
pub fn normalize_events(events: Vec<SeismicEvent>) -> Vec<SeismicEvent> {
    let mut events: Vec<SeismicEvent> = events
        .into_iter()
        .filter(|e| e.magnitude.is_finite() && e.depth_km.is_finite())
        .map(|e| SeismicEvent {
            depth_km: e.depth_km.max(0.0),
            ..e
        })
        .collect();
    events.sort_by_key(|e| e.timestamp);
    events
}

/// Renders events back into raw rows, e.g. to feed them through
/// `clean_rows` again.
pub fn to_rows(events: &[SeismicEvent]) -> Vec<RawSeismicRow> {
    events.iter().map(RawSeismicRow::from).collect()
}

/// Start of the `days`-day window ending at `now`. A span reaching past
/// chrono's range starts at the earliest representable instant; negative
/// spans are empty.
pub fn window_start(days: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    TimeDelta::try_days(days.max(0))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Keeps events no older than `days` days before `now`.
pub fn within_window_at(
    events: Vec<SeismicEvent>,
    days: i64,
    now: DateTime<Utc>,
) -> Vec<SeismicEvent> {
    let cutoff = window_start(days, now);
    events.into_iter().filter(|e| e.timestamp >= cutoff).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
