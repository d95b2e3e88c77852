//! # Sample Recorder
//!
//! Persists samples as an append-only CSV log and loads them back for
//! analysis.
//!
//! ## Log Format
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | wall_time | float | Seconds since the Unix epoch |
//! | elapsed_s | float | Seconds since the run started |
//! | temperature_c | float or empty | Temperature, empty when `ok = 0` |
//! | humidity_pct | float or empty | Relative humidity, empty when `ok = 0` |
//! | ok | 0 or 1 | Whether the tick obtained a valid reading |
//!
//! Logs written by older tooling used `unix_time` and `humidity` as column
//! names; [`LogReader`] accepts both.

pub mod columns;
mod csv_log;
mod error;
mod reader;
mod sink;


pub use csv_log::CsvRecorder;
pub use error::{RecorderError, RowError};
pub use reader::{read_log, LogReader, LogRow};
pub use sink::SampleSink;
