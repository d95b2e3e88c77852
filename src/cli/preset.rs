//! Acquisition presets for the standard test procedures.
//!
//! Presets provide sensible defaults for the sampling cadence and retry
//! budget so a run can be started without tuning flags.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use dhtstep::acquire::{AcquireConfig, CadencePolicy, RetryPolicy};

/// Acquisition presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    /// Continuous room monitoring.
    ///
    /// - Interval: 3 s
    /// - Duration: until interrupted
    /// - Retries: 5 attempts, 200 ms apart
    Room,

    /// Sensor stability test (default).
    ///
    /// - Interval: 2 s
    /// - Duration: 10 minutes
    /// - Retries: 5 attempts, 200 ms apart
    #[default]
    Stability,

    /// Step-response test.
    ///
    /// - Interval: 2 s
    /// - Duration: 10 minutes
    /// - Retries: single attempt
    /// - Heat prompt after the 120 s baseline
    Response,
}

impl Preset {
    /// Returns the sampling interval for this preset.
    pub fn sample_interval(&self) -> Duration {
        match self {
            Preset::Room => Duration::from_secs(3),
            Preset::Stability | Preset::Response => Duration::from_secs(2),
        }
    }

    /// Returns the run duration for this preset.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Preset::Room => None,
            Preset::Stability | Preset::Response => Some(Duration::from_secs(10 * 60)),
        }
    }

    /// Returns the per-sample retry policy for this preset.
    pub fn retry(&self) -> RetryPolicy {
        match self {
            Preset::Room | Preset::Stability => RetryPolicy::default(),
            Preset::Response => RetryPolicy::single_attempt(),
        }
    }

    /// Returns when to prompt for the heat step, if at all.
    pub fn step_notice_s(&self) -> Option<f64> {
        match self {
            Preset::Response => Some(120.0),
            Preset::Room | Preset::Stability => None,
        }
    }

    /// Full acquisition configuration for this preset.
    pub fn acquire_config(&self) -> AcquireConfig {
        AcquireConfig {
            sample_interval: self.sample_interval(),
            duration: self.duration(),
            retry: self.retry(),
            cadence: CadencePolicy::SleepAfter,
            step_notice_s: self.step_notice_s(),
            max_ticks: None,
        }
    }

    /// Returns all available preset names.
    pub fn variants() -> &'static [&'static str] {
        &["room", "stability", "response"]
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Room => write!(f, "room"),
            Preset::Stability => write!(f, "stability"),
            Preset::Response => write!(f, "response"),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "room" => Ok(Preset::Room),
            "stability" => Ok(Preset::Stability),
            "response" | "step" => Ok(Preset::Response),
            _ => Err(format!(
                "Unknown preset '{}'. Valid options: {}",
                s,
                Self::variants().join(", ")
            )),
        }
    }
}
