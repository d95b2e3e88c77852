use crate::recorder::RecorderError;

/// Errors that can stop an acquisition run.
///
/// Sensor failures are not among them: they end up as `ok = false` samples.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    /// Invalid acquisition configuration
    #[error("Invalid acquisition config: {0}")]
    InvalidConfig(String),

    /// The sample sink failed to persist a sample
    #[error("Recorder error: {0}")]
    Recorder(#[from] RecorderError),
}
