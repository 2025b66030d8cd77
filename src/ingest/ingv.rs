/// INGV FDSN event web service client.
///
/// Queries the Istituto Nazionale di Geofisica e Vulcanologia event catalogue
/// for a region bounding box over the last few days, in the pipe-delimited
/// `format=text` export.
///
/// API Documentation: https://webservices.ingv.it/swagger-ui/dist/?url=https://ingv.github.io/openapi/fdsnws/event/0.0.1/event.yaml

use chrono::{DateTime, Utc};

use crate::clean::window_start;
use crate::ingest::table::parse_table;
use crate::model::{RawSeismicRow, SourceError};
use crate::regions::Region;

/// FDSN returns 204 No Content when the query matched nothing.
const FDSN_NO_CONTENT: u16 = 204;

/// Builds the FDSN event query URL for `region` covering the `days` days
/// before `now`.
pub fn build_event_url(base_url: &str, region: &Region, days: i64, now: DateTime<Utc>) -> String {
    let start = window_start(days, now);
    format!(
        "{}?starttime={}&endtime={}&minlat={}&maxlat={}&minlon={}&maxlon={}&orderby=time-asc&format=text",
        base_url,
        start.format("%Y-%m-%dT%H:%M:%S"),
        now.format("%Y-%m-%dT%H:%M:%S"),
        region.min_latitude,
        region.max_latitude,
        region.min_longitude,
        region.max_longitude,
    )
}

/// Fetch raw event rows for a region.
///
/// An empty catalogue answer is reported as `SourceError::Empty` so the
/// loader can fall back to the local file.
pub fn fetch_events(
    client: &reqwest::blocking::Client,
    base_url: &str,
    region: &Region,
    days: i64,
    now: DateTime<Utc>,
) -> Result<Vec<RawSeismicRow>, SourceError> {
    let url = build_event_url(base_url, region, days, now);

    let response = client.get(&url).header("Accept", "text/plain").send()?;

    let status = response.status().as_u16();
    if status == FDSN_NO_CONTENT {
        return Err(SourceError::Empty(format!("no INGV events for {}", region.name)));
    }
    if !response.status().is_success() {
        return Err(SourceError::Http(status));
    }

    let text = response.text()?;
    if text.trim().is_empty() {
        return Err(SourceError::Empty(format!("no INGV events for {}", region.name)));
    }

    let rows = parse_table(&text, b'|')?;
    if rows.is_empty() {
        return Err(SourceError::Empty(format!("no INGV events for {}", region.name)));
    }
    Ok(rows)
}
