use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AcquireError, RetryPolicy};

/// How retry time interacts with the sampling interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CadencePolicy {
    /// Sleep the full interval after every tick, however long the tick took.
    ///
    /// Consecutive ticks are spaced by `interval + tick duration`, so retries
    /// stretch the spacing.
    #[default]
    SleepAfter,

    /// Sleep `interval - tick duration` (never negative).
    ///
    /// Ticks start on a fixed grid; retries eat into the interval instead of
    /// extending it. A tick longer than the interval starts the next one
    /// immediately.
    FixedRate,
}

impl CadencePolicy {
    /// Time to wait after a tick that took `tick_time`
    pub fn wait_after(&self, interval: Duration, tick_time: Duration) -> Duration {
        match self {
            CadencePolicy::SleepAfter => interval,
            CadencePolicy::FixedRate => interval.saturating_sub(tick_time),
        }
    }
}

/// Configuration for an acquisition run
#[derive(Debug, Clone, PartialEq)]
pub struct AcquireConfig {
    /// Nominal time between ticks
    pub sample_interval: Duration,
    /// Total run duration; `None` runs until the process is terminated
    pub duration: Option<Duration>,
    /// Per-tick retry budget
    pub retry: RetryPolicy,
    /// Sleep policy between ticks
    pub cadence: CadencePolicy,
    /// Log a one-time prompt to apply the heat step once this many seconds
    /// have elapsed
    pub step_notice_s: Option<f64>,
    /// Stop after this many ticks even if the duration has not elapsed
    pub max_ticks: Option<u64>,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_secs(2),
            duration: Some(Duration::from_secs(10 * 60)),
            retry: RetryPolicy::default(),
            cadence: CadencePolicy::default(),
            step_notice_s: None,
            max_ticks: None,
        }
    }
}

impl AcquireConfig {
    /// Check the configuration before a run
    pub fn validate(&self) -> Result<(), AcquireError> {
        self.retry.validate()?;

        if self.sample_interval.is_zero() {
            return Err(AcquireError::InvalidConfig(
                "sample_interval must be greater than zero".to_string(),
            ));
        }

        if let Some(notice) = self.step_notice_s {
            if !notice.is_finite() || notice < 0.0 {
                return Err(AcquireError::InvalidConfig(format!(
                    "step_notice_s must be a non-negative number, got {}",
                    notice
                )));
            }
        }

        Ok(())
    }
}
