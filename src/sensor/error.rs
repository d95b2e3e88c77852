/// A failed sensor read.
///
/// Deliberately opaque: the only thing a caller may do with it is log it and
/// retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Sensor read failed: {message}")]
pub struct SensorError {
    message: String,
}

impl SensorError {
    /// Create a read failure with a diagnostic message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic message
    pub fn message(&self) -> &str {
        &self.message
    }
}
