use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use super::{columns, RecorderError, RowError};
use crate::sample::{Reading, Sample};

/// Outcome of loading one persisted row
pub type LogRow = Result<Sample, RowError>;

/// Positions of the required columns in a log header
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    wall_time: usize,
    elapsed_s: usize,
    temperature_c: usize,
    humidity_pct: usize,
    ok: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, RecorderError> {
        let names: Vec<String> = headers
            .iter()
            .map(|s| s.trim().trim_start_matches('\u{feff}').to_lowercase())
            .collect();

        let find = |column: &'static str| {
            columns::aliases(column)
                .iter()
                .find_map(|alias| names.iter().position(|n| n == alias))
                .ok_or_else(|| RecorderError::MissingColumn(column.to_string()))
        };

        Ok(Self {
            wall_time: find(columns::WALL_TIME)?,
            elapsed_s: find(columns::ELAPSED_S)?,
            temperature_c: find(columns::TEMPERATURE_C)?,
            humidity_pct: find(columns::HUMIDITY_PCT)?,
            ok: find(columns::OK)?,
        })
    }

    fn parse(&self, record: &csv::StringRecord, line: u64) -> LogRow {
        let field = |index: usize, column: &'static str| -> Result<&str, RowError> {
            match record.get(index).map(str::trim) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(RowError::MissingValue { line, column }),
            }
        };
        let number = |index: usize, column: &'static str| -> Result<f64, RowError> {
            let raw = field(index, column)?;
            match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(RowError::InvalidNumber {
                    line,
                    column,
                    value: raw.to_string(),
                }),
            }
        };

        let ok = match field(self.ok, columns::OK)? {
            "1" => true,
            "0" => false,
            other => {
                return Err(RowError::InvalidFlag {
                    line,
                    value: other.to_string(),
                })
            }
        };
        let wall_time = number(self.wall_time, columns::WALL_TIME)?;
        let elapsed_s = number(self.elapsed_s, columns::ELAPSED_S)?;

        if !ok {
            return Ok(Sample::failed(wall_time, elapsed_s));
        }

        let temperature_c = number(self.temperature_c, columns::TEMPERATURE_C)?;
        let humidity_pct = number(self.humidity_pct, columns::HUMIDITY_PCT)?;
        Ok(Sample::valid(
            wall_time,
            elapsed_s,
            Reading::new(temperature_c, humidity_pct),
        ))
    }
}

/// Loads a persisted sample log row by row.
///
/// Only a broken header or an I/O failure is fatal; a bad data row becomes a
/// [`RowError`] in the output so it can be counted.
pub struct LogReader<R: Read> {
    reader: csv::Reader<R>,
    columns: ColumnIndex,
}

impl LogReader<File> {
    /// Open a log file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RecorderError> {
        let file = File::open(path.as_ref())?;
        debug!("Opened sample log {}", path.as_ref().display());
        Self::new(file)
    }
}

impl<R: Read> LogReader<R> {
    /// Read the header from `inner` and resolve column positions
    pub fn new(inner: R) -> Result<Self, RecorderError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(inner);
        let columns = ColumnIndex::from_headers(reader.headers()?)?;
        Ok(Self { reader, columns })
    }

    /// Load every data row in file order
    pub fn read_rows(&mut self) -> Result<Vec<LogRow>, RecorderError> {
        let mut rows = Vec::new();
        let mut record = csv::StringRecord::new();

        loop {
            let line = self.reader.position().line();
            match self.reader.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => {
                    let line = record.position().map(|p| p.line()).unwrap_or(line);
                    let row = self.columns.parse(&record, line);
                    if let Err(e) = &row {
                        debug!("Skipping row: {}", e);
                    }
                    rows.push(row);
                }
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(line);
                    debug!("Skipping undecodable record at line {}: {}", line, e);
                    rows.push(Err(RowError::Malformed {
                        line,
                        message: e.to_string(),
                    }));
                }
            }
        }

        let bad = rows.iter().filter(|r| r.is_err()).count();
        info!("Loaded {} rows ({} unparsable)", rows.len(), bad);
        Ok(rows)
    }
}

/// Load all rows of the log at `path`
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<Vec<LogRow>, RecorderError> {
    LogReader::open(path)?.read_rows()
}
