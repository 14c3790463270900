use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use csv::{StringRecord, StringRecordsIntoIter};
use thiserror::Error;

use crate::data_mgmt::models::{Geometry, ObservationRecord, Properties, RtValue};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("file format error: {0}")]
    FileFormat(String),
    #[error(transparent)]
    FileRead(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Chrono(#[from] chrono::ParseError),
}

const FILE_TYPE_MARKER: &str = "TOA5";
const TIMESTAMP_COLUMN: &str = "TIMESTAMP";
const RECORD_COLUMN: &str = "RECORD";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
// Logger clocks at the field station run on MST all year round
const LOGGER_TIMEZONE: Tz = chrono_tz::America::Phoenix;

fn next_header(
    rows: &mut StringRecordsIntoIter<impl Read>,
    what: &str,
) -> Result<StringRecord, ParseError> {
    rows.next()
        .ok_or_else(|| ParseError::FileFormat(format!("missing {what} row")))?
        .map_err(Into::into)
}

/// Opens a flow meter file, returning a lazy sequence of its observations
pub fn parse_file(
    path: impl AsRef<Path>,
    coordinates: &[f64],
) -> Result<IrrigationRecords<File>, ParseError> {
    parse_reader(File::open(path)?, coordinates)
}

pub fn parse_reader<R: Read>(
    reader: R,
    coordinates: &[f64],
) -> Result<IrrigationRecords<R>, ParseError> {
    let mut rows = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_records();

    let file_info = next_header(&mut rows, "file information")?;
    if file_info.get(0) != Some(FILE_TYPE_MARKER) {
        return Err(ParseError::FileFormat(format!(
            "expected {FILE_TYPE_MARKER} file, found {:?}",
            file_info.get(0).unwrap_or_default()
        )));
    }
    let names = next_header(&mut rows, "column name")?;
    next_header(&mut rows, "units")?;
    next_header(&mut rows, "processing")?;

    let timestamp_index = names
        .iter()
        .position(|n| n == TIMESTAMP_COLUMN)
        .ok_or_else(|| ParseError::FileFormat(format!("no {TIMESTAMP_COLUMN} column")))?;
    let columns = names
        .iter()
        .enumerate()
        .filter(|(i, n)| *i != timestamp_index && *n != RECORD_COLUMN)
        .map(|(i, n)| (i, n.to_string()))
        .collect();

    Ok(IrrigationRecords {
        rows,
        failed: false,
        timestamp_index,
        columns,
        geometry: Geometry::point(coordinates),
        previous: None,
        line: 4,
    })
}

/// Iterator over the observations of one file. Rows that cannot be
/// interpreted are logged and skipped; a read failure is yielded once and
/// ends the sequence.
pub struct IrrigationRecords<R: Read> {
    rows: StringRecordsIntoIter<R>,
    failed: bool,
    timestamp_index: usize,
    columns: Vec<(usize, String)>,
    geometry: Geometry,
    previous: Option<DateTime<Utc>>,
    line: usize,
}

impl<R: Read> IrrigationRecords<R> {
    fn parse_row(&self, row: &StringRecord) -> Result<(DateTime<Utc>, Properties), ParseError> {
        let timestamp = parse_timestamp(row.get(self.timestamp_index).ok_or_else(|| {
            ParseError::FileFormat("timestamp value not present".into())
        })?)?;

        let properties = self
            .columns
            .iter()
            .filter_map(|(index, name)| {
                row.get(*index)
                    .and_then(parse_value)
                    .map(|value| (name.clone(), value))
            })
            .collect();

        Ok((timestamp, properties))
    }
}

impl<R: Read> Iterator for IrrigationRecords<R> {
    type Item = Result<ObservationRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let row = self.rows.next()?;
            self.line += 1;
            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_io_error() => {
                    log::error!("error reading CSV at line {}: {}", self.line, e);
                    self.failed = true;
                    return Some(Err(e.into()));
                }
                Err(e) => {
                    log::warn!("skipping CSV line {}: {}", self.line, e);
                    continue;
                }
            };
            match self.parse_row(&row) {
                Ok((end_time, properties)) => {
                    let start_time = self.previous.unwrap_or(end_time);
                    self.previous = Some(end_time);
                    return Some(Ok(ObservationRecord::new(
                        start_time,
                        end_time,
                        self.geometry.clone(),
                        properties,
                    )));
                }
                Err(e) => log::warn!("error parsing CSV line {}: {}", self.line, e),
            }
        }
    }
}

fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>, ParseError> {
    let naive = NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT)?;
    LOGGER_TIMEZONE
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ParseError::FileFormat(format!("ambiguous local time {timestamp}")))
}

fn parse_value(raw: &str) -> Option<RtValue> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return None;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Some(RtValue::Int(i));
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(RtValue::Float(f)),
        Ok(_) => None,
        Err(_) => Some(RtValue::String(raw.to_string())),
    }
}
