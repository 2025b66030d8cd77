//! Local static events file.
//!
//! The fallback seismic source: an INGV export saved next to the binary,
//! either as the pipe-delimited FDSN text or as a comma-separated table.

use std::path::Path;

use crate::ingest::table::{detect_delimiter, parse_table};
use crate::model::{RawSeismicRow, SourceError};

pub fn read_events_text(text: &str) -> Result<Vec<RawSeismicRow>, SourceError> {
    if text.trim().is_empty() {
        return Err(SourceError::Empty("local events file is empty".to_string()));
    }
    let rows = parse_table(text, detect_delimiter(text))?;
    if rows.is_empty() {
        return Err(SourceError::Empty("local events file has no rows".to_string()));
    }
    Ok(rows)
}

pub fn read_events_file(path: impl AsRef<Path>) -> Result<Vec<RawSeismicRow>, SourceError> {
    let text = std::fs::read_to_string(path)?;
    read_events_text(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_comma_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Time,Magnitude,Depth").unwrap();
        writeln!(file, "2024-05-20 18:10:00,Md 4.4,2.6").unwrap();
        let rows = read_events_file(file.path()).expect("readable file");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_events_file("/nonexistent/events.csv");
        assert!(matches!(result, Err(SourceError::Io(_))));
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let result = read_events_text("Time,Magnitude,Depth\n");
        assert!(matches!(result, Err(SourceError::Empty(_))));
    }
}
