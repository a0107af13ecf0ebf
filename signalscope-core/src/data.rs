//! CSV bar loading.
//!
//! Expected header: `timestamp,open,high,low,close,volume` (`date` is accepted
//! for `timestamp`). Timestamps may be RFC 3339, `YYYY-MM-DD`,
//! `YYYY-MM-DD HH:MM:SS` (UTC), or integer epoch milliseconds. An empty volume
//! cell means volume is unavailable and loads as `NaN`.
//!
//! Loading does not validate; run [`crate::validate::validate_series`] (or
//! [`crate::analyze`]) on the result.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use serde::Deserialize;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::domain::{Bar, Series, SeriesMeta};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("{path}: {source}")]
    Open {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: unrecognised timestamp '{value}'")]
    Timestamp { row: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct CsvBar {
    #[serde(alias = "date")]
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: Option<f64>,
}

/// Load a series from a CSV file.
pub fn load_csv(path: &Path, meta: SeriesMeta) -> Result<Series, DataError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DataError::Open {
            path: path.display().to_string(),
            source,
        })?;
    let series = read_bars(reader, meta)?;
    debug!("loaded {} bars from {}", series.len(), path.display());
    Ok(series)
}

/// Load a series from any CSV reader.
pub fn read_csv<R: io::Read>(input: R, meta: SeriesMeta) -> Result<Series, DataError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    read_bars(reader, meta)
}

fn read_bars<R: io::Read>(mut reader: csv::Reader<R>, meta: SeriesMeta) -> Result<Series, DataError> {
    let mut bars = Vec::new();
    for (row, record) in reader.deserialize::<CsvBar>().enumerate() {
        let record = record.map_err(|source| DataError::Row { row, source })?;
        let timestamp =
            parse_timestamp(&record.timestamp).ok_or_else(|| DataError::Timestamp {
                row,
                value: record.timestamp.clone(),
            })?;
        bars.push(Bar {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume.unwrap_or(f64::NAN),
        });
    }
    Ok(Series::new(meta, bars))
}

/// Parse one of the accepted timestamp forms.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(ts.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|ts| ts.and_utc());
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    fn meta() -> SeriesMeta {
        SeriesMeta::new("ETHUSDT", "1d")
    }

    #[test]
    fn reads_rows_in_order() {
        let csv = "timestamp,open,high,low,close,volume\n\
                   2024-01-02,10,11,9,10.5,1200\n\
                   2024-01-03,10.5,12,10,11.5,1500\n";
        let series = read_csv(csv.as_bytes(), meta()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.meta, meta());
        assert_eq!(
            series.bars[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(series.bars[1].close, 11.5);
        assert_eq!(series.bars[1].volume, 1500.0);
    }

    #[test]
    fn empty_volume_is_nan() {
        let csv = "timestamp,open,high,low,close,volume\n\
                   2024-01-02,10,11,9,10.5,\n";
        let series = read_csv(csv.as_bytes(), meta()).unwrap();
        assert!(series.bars[0].volume.is_nan());
    }

    #[test]
    fn accepts_every_timestamp_form() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 12:30:00"), Some(expected));
        assert_eq!(
            parse_timestamp(&expected.timestamp_millis().to_string()),
            Some(expected)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn bad_timestamp_reports_row() {
        let csv = "timestamp,open,high,low,close,volume\n\
                   2024-01-02,10,11,9,10.5,1\n\
                   soon,10,11,9,10.5,1\n";
        let err = read_csv(csv.as_bytes(), meta()).unwrap_err();
        assert!(matches!(err, DataError::Timestamp { row: 1, .. }));
    }

    #[test]
    fn bad_number_reports_row() {
        let csv = "timestamp,open,high,low,close,volume\n\
                   2024-01-02,10,eleven,9,10.5,1\n";
        let err = read_csv(csv.as_bytes(), meta()).unwrap_err();
        assert!(matches!(err, DataError::Row { row: 0, .. }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date,open,high,low,close,volume").unwrap();
        writeln!(file, "1704153600000,10,11,9,10.5,100").unwrap();
        let series = load_csv(file.path(), meta()).unwrap();
        assert_eq!(
            series.bars[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_csv(Path::new("/nonexistent/bars.csv"), meta()).unwrap_err();
        assert!(matches!(err, DataError::Open { .. }));
    }
}
