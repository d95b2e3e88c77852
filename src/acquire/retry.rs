use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AcquireError;
use crate::sample::Reading;
use crate::sensor::SensorError;

/// How many times to try the sensor per tick and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Attempts per tick, at least 1
    pub max_attempts: u32,
    /// Fixed wait between consecutive attempts
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// One attempt per tick, no waiting
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            retry_delay: Duration::ZERO,
        }
    }

    /// Check that at least one attempt is allowed
    pub fn validate(&self) -> Result<(), AcquireError> {
        if self.max_attempts == 0 {
            return Err(AcquireError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of one bounded-retry read
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOutcome {
    /// The reading, if an attempt succeeded
    pub reading: Option<Reading>,
    /// Number of sensor reads performed
    pub attempts: u32,
    /// Error of the last failed attempt
    pub last_error: Option<SensorError>,
}

impl RetryOutcome {
    /// Whether an attempt succeeded
    pub fn is_ok(&self) -> bool {
        self.reading.is_some()
    }
}
