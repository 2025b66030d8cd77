/// Solar sample staleness detection.
///
/// The NOAA plasma product updates every minute and the K-index every three
/// hours. A latest sample far older than that means the feed has stalled and
/// the ψₛ readout no longer describes current conditions.
///
/// # Clock injection
/// All functions accept a `now: DateTime<Utc>` parameter rather than calling
/// `Utc::now()` internally, so staleness is deterministic in tests.

use chrono::{DateTime, Utc};

use crate::model::SolarSample;

/// Returns `true` if `timestamp` is older than `max_age_minutes` relative to
/// `now`.
///
/// Staleness is strictly greater than the threshold:
///   age > max_age_minutes  →  stale
///   age == max_age_minutes →  not stale
pub fn is_stale_at(timestamp: DateTime<Utc>, max_age_minutes: u64, now: DateTime<Utc>) -> bool {
    let age_minutes = (now - timestamp).num_minutes();
    age_minutes > 0 && age_minutes as u64 > max_age_minutes
}

/// Checks the newest sample of a series. An empty series counts as stale.
pub fn latest_sample_is_stale_at(
    samples: &[SolarSample],
    max_age_minutes: u64,
    now: DateTime<Utc>,
) -> bool {
    samples
        .last()
        .map(|s| is_stale_at(s.timestamp, max_age_minutes, now))
        .unwrap_or(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
