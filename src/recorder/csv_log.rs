use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;

use super::{columns, RecorderError, SampleSink};
use crate::sample::Sample;

/// Append-only CSV sample log.
///
/// The header is written on creation and every row is flushed as soon as it
/// is recorded, so a run killed mid-way leaves a readable prefix.
pub struct CsvRecorder<W: Write> {
    writer: csv::Writer<W>,
    rows_written: usize,
}

impl CsvRecorder<File> {
    /// Create (or truncate) a log file at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, RecorderError> {
        let file = File::create(path.as_ref())?;
        debug!("Created sample log {}", path.as_ref().display());
        Self::new(file)
    }
}

impl<W: Write> CsvRecorder<W> {
    /// Wrap a writer and emit the header row
    pub fn new(inner: W) -> Result<Self, RecorderError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(columns::HEADER)?;
        writer.flush()?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Number of sample rows written so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W, RecorderError> {
        self.writer.into_inner().map_err(|e| {
            let err = e.error();
            RecorderError::IoError(std::io::Error::new(err.kind(), err.to_string()))
        })
    }

    fn format_optional(value: Option<f64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }
}

impl<W: Write> SampleSink for CsvRecorder<W> {
    fn record(&mut self, sample: &Sample) -> Result<(), RecorderError> {
        self.writer.write_record([
            sample.wall_time.to_string(),
            sample.elapsed_s.to_string(),
            Self::format_optional(sample.temperature_c()),
            Self::format_optional(sample.humidity_pct()),
            if sample.ok() { "1" } else { "0" }.to_string(),
        ])?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecorderError> {
        self.writer.flush()?;
        debug!("Sample log closed after {} rows", self.rows_written);
        Ok(())
    }
}
