/// Errors that stop recording or loading a log
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// I/O error on the log file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV encoding/decoding error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The log header lacks a required column
    #[error("Missing required log column: {0}")]
    MissingColumn(String),

    /// A sample was offered to a series whose run has already ended
    #[error("Series is sealed; sample at {elapsed_s:.1}s rejected")]
    SeriesSealed {
        /// Elapsed time of the rejected sample
        elapsed_s: f64,
    },
}

/// A persisted row that could not be turned into a sample.
///
/// Row errors are data: the analyzer counts them as error rows.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    /// The CSV record itself could not be decoded
    #[error("line {line}: malformed record: {message}")]
    Malformed {
        /// 1-based line number in the log
        line: u64,
        /// Decoder message
        message: String,
    },

    /// A required field is empty or absent
    #[error("line {line}: missing value for {column}")]
    MissingValue {
        /// 1-based line number in the log
        line: u64,
        /// Column name
        column: &'static str,
    },

    /// A numeric field does not parse as a finite number
    #[error("line {line}: invalid number {value:?} in {column}")]
    InvalidNumber {
        /// 1-based line number in the log
        line: u64,
        /// Column name
        column: &'static str,
        /// Raw field text
        value: String,
    },

    /// The `ok` flag is neither `0` nor `1`
    #[error("line {line}: invalid ok flag {value:?}")]
    InvalidFlag {
        /// 1-based line number in the log
        line: u64,
        /// Raw field text
        value: String,
    },
}
