/// NOAA SWPC Data API Client
///
/// Retrieves the planetary K-index and real-time solar wind plasma
/// (density, speed) from the Space Weather Prediction Center product feeds,
/// and reduces them to hourly `SolarSample`s.
///
/// Products: https://services.swpc.noaa.gov/products/
///   - noaa-planetary-k-index.json     (3-hourly Kp)
///   - solar-wind/plasma-1-day.json    (1-minute DSCOVR/ACE plasma)
///
/// SWPC has served these both as an array of arrays whose first row is the
/// header, and as an array of objects. Both shapes are accepted.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::clean::parse_timestamp;
use crate::model::{SolarSample, SourceError};

/// Proton mass times unit conversions: P[nPa] = 1.6726e-6 · n[cm⁻³] · v[km/s]².
const DYNAMIC_PRESSURE_FACTOR: f64 = 1.6726e-6;

// ============================================================================
// Parsed Records
// ============================================================================

/// One Kp index value.
#[derive(Debug, Clone, PartialEq)]
pub struct KpReading {
    pub timestamp: DateTime<Utc>,
    pub kp: f64,
}

/// One solar wind plasma measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaReading {
    pub timestamp: DateTime<Utc>,
    /// Proton density, cm⁻³.
    pub density: f64,
    /// Bulk speed, km/s.
    pub speed: f64,
}

impl PlasmaReading {
    /// Solar wind dynamic pressure in nPa.
    pub fn dynamic_pressure_npa(&self) -> f64 {
        DYNAMIC_PRESSURE_FACTOR * self.density * self.speed * self.speed
    }
}

// ============================================================================
// API Client Functions
// ============================================================================

fn fetch_body(client: &reqwest::blocking::Client, url: &str) -> Result<String, SourceError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()?;

    if !response.status().is_success() {
        return Err(SourceError::Http(response.status().as_u16()));
    }

    Ok(response.text()?)
}

/// Fetch the planetary K-index series, oldest first.
pub fn fetch_kp_series(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<Vec<KpReading>, SourceError> {
    let body = fetch_body(client, url)?;
    parse_kp_json(&body)
}

/// Fetch the last day of solar wind plasma, oldest first.
pub fn fetch_plasma_series(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<Vec<PlasmaReading>, SourceError> {
    let body = fetch_body(client, url)?;
    parse_plasma_json(&body)
}

// ============================================================================
// Response Parsing
// ============================================================================

/// Flattens either product shape into one JSON object per data row.
fn product_records(body: &str) -> Result<Vec<Map<String, Value>>, SourceError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))?;

    let rows = value
        .as_array()
        .ok_or_else(|| SourceError::Malformed("expected a JSON array".to_string()))?;

    match rows.first() {
        None => Err(SourceError::Empty("product contained no rows".to_string())),
        Some(Value::Array(header)) => {
            let names: Vec<String> = header
                .iter()
                .map(|h| h.as_str().unwrap_or_default().to_string())
                .collect();
            Ok(rows[1..]
                .iter()
                .filter_map(Value::as_array)
                .map(|cells| {
                    names
                        .iter()
                        .cloned()
                        .zip(cells.iter().cloned())
                        .collect::<Map<String, Value>>()
                })
                .collect())
        }
        Some(Value::Object(_)) => Ok(rows
            .iter()
            .filter_map(Value::as_object)
            .cloned()
            .collect()),
        Some(other) => Err(SourceError::Malformed(format!(
            "unexpected row type: {}",
            other
        ))),
    }
}

/// Reads a numeric cell that SWPC may encode as a number, a string, or null.
fn number_field(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|k| record.get(*k))
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .filter(|v: &f64| v.is_finite())
}

fn time_field(record: &Map<String, Value>) -> Option<DateTime<Utc>> {
    record
        .get("time_tag")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
}

/// Parse a K-index product body. Rows without a time or Kp are skipped.
pub fn parse_kp_json(body: &str) -> Result<Vec<KpReading>, SourceError> {
    let mut readings: Vec<KpReading> = product_records(body)?
        .iter()
        .filter_map(|record| {
            Some(KpReading {
                timestamp: time_field(record)?,
                kp: number_field(record, &["Kp", "kp", "kp_index"])?.clamp(0.0, 9.0),
            })
        })
        .collect();

    if readings.is_empty() {
        return Err(SourceError::Empty("no usable Kp rows".to_string()));
    }
    readings.sort_by_key(|r| r.timestamp);
    Ok(readings)
}

/// Parse a plasma product body. Rows with null density or speed are skipped.
pub fn parse_plasma_json(body: &str) -> Result<Vec<PlasmaReading>, SourceError> {
    let mut readings: Vec<PlasmaReading> = product_records(body)?
        .iter()
        .filter_map(|record| {
            Some(PlasmaReading {
                timestamp: time_field(record)?,
                density: number_field(record, &["density"])?,
                speed: number_field(record, &["speed"])?,
            })
        })
        .filter(|r| r.density >= 0.0 && r.speed >= 0.0)
        .collect();

    if readings.is_empty() {
        return Err(SourceError::Empty("no usable plasma rows".to_string()));
    }
    readings.sort_by_key(|r| r.timestamp);
    Ok(readings)
}

// ============================================================================
// Solar Sample Assembly
// ============================================================================

/// Maps a dynamic pressure onto the [0, 1] ψₛ scale.
pub fn normalize_pressure(pressure_npa: f64, reference_pressure_npa: f64) -> f64 {
    if reference_pressure_npa <= 0.0 || !pressure_npa.is_finite() {
        return 0.0;
    }
    (pressure_npa / reference_pressure_npa).clamp(0.0, 1.0)
}

/// Most recent Kp at or before `at`; `kp` must be sorted oldest first.
pub fn kp_at(kp: &[KpReading], at: DateTime<Utc>) -> Option<f64> {
    kp.iter()
        .take_while(|r| r.timestamp <= at)
        .last()
        .map(|r| r.kp)
}

/// Buckets plasma readings per UTC hour and builds one `SolarSample` per
/// bucket, oldest first.
///
/// ψₛ is the normalized mean dynamic pressure of the bucket; wind speed is
/// the mean speed; Kp is the latest value at or before the bucket start, or
/// `fallback_kp` when the K-index series does not reach back that far.
pub fn assemble_solar_samples(
    plasma: &[PlasmaReading],
    kp: &[KpReading],
    fallback_kp: f64,
    reference_pressure_npa: f64,
) -> Vec<SolarSample> {
    let mut buckets: BTreeMap<DateTime<Utc>, (f64, f64, usize)> = BTreeMap::new();

    for reading in plasma {
        let hour = reading
            .timestamp
            .duration_trunc(TimeDelta::hours(1))
            .unwrap_or(reading.timestamp);
        let entry = buckets.entry(hour).or_insert((0.0, 0.0, 0));
        entry.0 += reading.dynamic_pressure_npa();
        entry.1 += reading.speed;
        entry.2 += 1;
    }

    buckets
        .into_iter()
        .map(|(hour, (pressure_sum, speed_sum, count))| {
            let n = count as f64;
            SolarSample {
                timestamp: hour,
                psi_s: normalize_pressure(pressure_sum / n, reference_pressure_npa),
                wind_speed: speed_sum / n,
                kp_index: kp_at(kp, hour).unwrap_or(fallback_kp),
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const KP_ARRAYS: &str = r#"[
        ["time_tag","Kp","a_running","station_count"],
        ["2024-05-10 12:00:00.000","5.67","80","8"],
        ["2024-05-10 15:00:00.000","8.00","300","8"],
        ["2024-05-10 18:00:00.000",null,"300","8"]
    ]"#;

    const KP_OBJECTS: &str = r#"[
        {"time_tag":"2024-05-10T12:00:00","Kp":5.67,"a_running":80,"station_count":8},
        {"time_tag":"2024-05-10T15:00:00","Kp":8.0,"a_running":300,"station_count":8}
    ]"#;

    const PLASMA: &str = r#"[
        ["time_tag","density","speed","temperature"],
        ["2024-05-10 15:01:00.000","10.0","500.0","100000"],
        ["2024-05-10 15:30:00.000","20.0","500.0","100000"],
        ["2024-05-10 16:05:00.000",null,"480.0","90000"],
        ["2024-05-10 16:10:00.000","4.0","400.0","90000"]
    ]"#;

    #[test]
    fn test_parse_kp_array_form() {
        let kp = parse_kp_json(KP_ARRAYS).expect("valid product");
        assert_eq!(kp.len(), 2, "null Kp row is skipped");
        assert_eq!(kp[1].kp, 8.0);
        assert_eq!(kp[0].timestamp, Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_kp_object_form() {
        let kp = parse_kp_json(KP_OBJECTS).expect("valid product");
        assert_eq!(kp.len(), 2);
        assert_eq!(kp[0].kp, 5.67);
    }

    #[test]
    fn test_parse_kp_rejects_non_array() {
        let result = parse_kp_json(r#"{"error":"maintenance"}"#);
        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }

    #[test]
    fn test_parse_kp_header_only_is_empty() {
        let result = parse_kp_json(r#"[["time_tag","Kp"]]"#);
        assert!(matches!(result, Err(SourceError::Empty(_))));
    }

    #[test]
    fn test_parse_plasma_skips_null_cells() {
        let plasma = parse_plasma_json(PLASMA).expect("valid product");
        assert_eq!(plasma.len(), 3);
    }

    #[test]
    fn test_dynamic_pressure() {
        let reading = PlasmaReading {
            timestamp: Utc::now(),
            density: 5.0,
            speed: 400.0,
        };
        // 1.6726e-6 * 5 * 160000 = 1.33808 nPa
        assert!((reading.dynamic_pressure_npa() - 1.33808).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_pressure_clamps() {
        assert_eq!(normalize_pressure(25.0, 10.0), 1.0);
        assert_eq!(normalize_pressure(-1.0, 10.0), 0.0);
        assert_eq!(normalize_pressure(5.0, 10.0), 0.5);
        assert_eq!(normalize_pressure(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_assemble_hourly_samples() {
        let plasma = parse_plasma_json(PLASMA).unwrap();
        let kp = parse_kp_json(KP_ARRAYS).unwrap();
        let samples = assemble_solar_samples(&plasma, &kp, 1.0, 10.0);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp, Utc.with_ymd_and_hms(2024, 5, 10, 15, 0, 0).unwrap());
        assert_eq!(samples[0].wind_speed, 500.0);
        assert_eq!(samples[0].kp_index, 8.0);
        // mean of 4.1815 and 8.363 nPa over a 10 nPa reference
        assert!((samples[0].psi_s - 0.627225).abs() < 1e-9);
        assert_eq!(samples[1].kp_index, 8.0);
    }

    #[test]
    fn test_kp_before_series_uses_fallback() {
        let plasma = vec![PlasmaReading {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 10, 3, 20, 0).unwrap(),
            density: 5.0,
            speed: 400.0,
        }];
        let kp = parse_kp_json(KP_ARRAYS).unwrap();
        let samples = assemble_solar_samples(&plasma, &kp, 2.5, 10.0);
        assert_eq!(samples[0].kp_index, 2.5);
    }
}
