/// Delimited seismic table parsing.
///
/// The INGV FDSN `format=text` export and the local events file are both
/// delimited tables with a header row, but column names vary between
/// exports ("Time", "Time (UTC)", "Magnitude", "MD", "Depth/Km", ...). The
/// header is scanned once to locate the three columns the cleaner needs.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::model::{RawSeismicRow, SourceError};

/// Indices of the time, magnitude and depth columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub time: usize,
    pub magnitude: usize,
    pub depth: usize,
}

fn normalized_headers(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .map(|h| h.trim().trim_start_matches('#').trim().to_ascii_lowercase())
        .collect()
}

impl ColumnMap {
    /// Locates the required columns in a header row.
    pub fn detect(headers: &StringRecord) -> Result<Self, SourceError> {
        let names = normalized_headers(headers);
        let position = |pred: &dyn Fn(&str) -> bool| names.iter().position(|n| pred(n.as_str()));

        let time = position(&|n: &str| n.contains("time") || n.contains("utc"))
            .ok_or_else(|| SourceError::Malformed("no time column in header".to_string()))?;

        let magnitude = position(&|n: &str| matches!(n, "magnitude" | "md" | "mag" | "ml"))
            .or_else(|| {
                position(&|n: &str| n.contains("mag") && !n.contains("type") && !n.contains("author"))
            })
            .ok_or_else(|| SourceError::Malformed("no magnitude column in header".to_string()))?;

        let depth = position(&|n: &str| n.contains("depth"))
            .ok_or_else(|| SourceError::Malformed("no depth column in header".to_string()))?;

        Ok(ColumnMap {
            time,
            magnitude,
            depth,
        })
    }
}

/// Picks `|` for FDSN text exports and `,` for everything else, based on
/// the header line.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if header.contains('|') { b'|' } else { b',' }
}

fn cell(record: &StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Parses a delimited table into raw rows.
///
/// Records the csv reader cannot decode are skipped; a missing or
/// unrecognizable header is an error.
pub fn parse_table(text: &str, delimiter: u8) -> Result<Vec<RawSeismicRow>, SourceError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let columns = ColumnMap::detect(reader.headers()?)?;

    let rows = reader
        .records()
        .filter_map(Result::ok)
        .map(|record| RawSeismicRow {
            time: cell(&record, columns.time),
            magnitude: cell(&record, columns.magnitude),
            depth: cell(&record, columns.depth),
        })
        .collect();

    Ok(rows)
}
