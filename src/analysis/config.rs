use serde::{Deserialize, Serialize};

use super::AnalysisError;

/// Default baseline window in seconds
pub const DEFAULT_BASELINE_WINDOW_S: f64 = 120.0;

/// Default half-width of the settle band as a fraction of the step
pub const DEFAULT_SETTLE_BAND: f64 = 0.02;

/// Parameters of the step-response analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Initial span (seconds) assumed to precede the step
    pub baseline_window_s: f64,
    /// Settling tolerance as a fraction of the total change (0.02 = ±2 %)
    pub settle_band: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            baseline_window_s: DEFAULT_BASELINE_WINDOW_S,
            settle_band: DEFAULT_SETTLE_BAND,
        }
    }
}

impl AnalysisConfig {
    /// Check parameter ranges
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.baseline_window_s.is_finite() || self.baseline_window_s < 0.0 {
            return Err(AnalysisError::InvalidParameter {
                name: "baseline_window_s",
                message: format!("must be a non-negative number, got {}", self.baseline_window_s),
            });
        }
        if !self.settle_band.is_finite() || !(0.0..1.0).contains(&self.settle_band) {
            return Err(AnalysisError::InvalidParameter {
                name: "settle_band",
                message: format!("must be in [0, 1), got {}", self.settle_band),
            });
        }
        Ok(())
    }
}
