//! TOML configuration file support.
//!
//! Instead of passing many CLI flags, settings can live in a config file.
//! Every field is optional; explicit flags override the file, and the file
//! overrides the preset:
//!
//! ```toml
//! # dhtstep.toml
//! [acquisition]
//! sample_interval_s = 2.0
//! duration_min = 10
//! max_attempts = 5
//! retry_delay_ms = 200
//! cadence = "sleep-after"
//! step_notice_s = 120
//!
//! [analysis]
//! baseline_window_s = 120
//! settle_band = 0.02
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use dhtstep::acquire::CadencePolicy;

/// Root configuration structure for dhtstep.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Acquisition settings.
    #[serde(default)]
    pub acquisition: AcquisitionSection,

    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisSection,
}

/// Settings for `record` and `simulate`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcquisitionSection {
    /// Seconds between samples.
    pub sample_interval_s: Option<f64>,

    /// Run duration in minutes.
    pub duration_min: Option<f64>,

    /// Sensor read attempts per sample.
    pub max_attempts: Option<u32>,

    /// Wait between failed attempts in milliseconds.
    pub retry_delay_ms: Option<u64>,

    /// Sleep policy between samples.
    pub cadence: Option<CadencePolicy>,

    /// Seconds after which to prompt for the heat step.
    pub step_notice_s: Option<f64>,
}

/// Settings for `analyze`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisSection {
    /// Baseline window in seconds.
    pub baseline_window_s: Option<f64>,

    /// Settle band as a fraction of the step.
    pub settle_band: Option<f64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file if a path was given, otherwise use an empty config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
