//! # Step-Response Analysis
//!
//! Offline analysis of a completed run: descriptive statistics of the valid
//! samples plus first-order step-response metrics derived from threshold
//! crossings.
//!
//! ## Pipeline
//!
//! 1. **Filter**: fold the rows into a [`FilteredSeries`]. A row contributes
//!    only if it is a valid sample with finite values; everything else is
//!    counted as an error.
//! 2. **Describe**: [`BasicStats`] for temperature and humidity.
//! 3. **Step metrics**: baseline = mean temperature over the baseline window,
//!    final = maximum temperature, then the first sample at or past each
//!    threshold gives τ (63.2 %), t90 (90 %) and the settling time (first
//!    sample inside the settle band around the final value).
//!
//! All derived values are `Option`s: no data means `None`, never a panic or
//! a division by zero.
//!
//! ```rust
//! use dhtstep::analysis::analyze;
//! use dhtstep::sample::{Reading, RunSeries, Sample};
//!
//! let series: RunSeries = [(0.0, 20.0), (60.0, 20.0), (130.0, 26.0), (200.0, 29.0), (260.0, 30.0)]
//!     .into_iter()
//!     .map(|(t, temp)| Sample::valid(t, t, Reading::new(temp, 50.0)))
//!     .collect();
//!
//! let report = analyze(&series, 120.0, 0.02);
//! assert_eq!(report.step.tau_s, Some(80.0));
//! assert_eq!(report.step.settling_s, Some(140.0));
//! ```

mod accumulate;
mod config;
mod error;
mod report;
mod stats;
mod step;


pub use accumulate::{FilteredSeries, Point};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use report::{SampleCounts, StabilityReport, StepResponseReport};
pub use stats::BasicStats;
pub use step::{first_crossing, StepMetrics, StepThresholds};

use crate::recorder::LogRow;
use crate::sample::RunSeries;

/// Step-response analysis with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Create an analyzer after validating its configuration
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze an in-memory series
    pub fn analyze(&self, series: &RunSeries) -> StepResponseReport {
        self.analyze_filtered(&FilteredSeries::from_samples(series.iter().copied()))
    }

    /// Analyze rows loaded from a persisted log
    pub fn analyze_rows<I>(&self, rows: I) -> StepResponseReport
    where
        I: IntoIterator<Item = LogRow>,
    {
        self.analyze_filtered(&FilteredSeries::from_rows(rows))
    }

    /// Analyze an already-filtered series
    pub fn analyze_filtered(&self, filtered: &FilteredSeries) -> StepResponseReport {
        StepResponseReport {
            counts: SampleCounts::from_filtered(filtered),
            temperature: BasicStats::from_values(filtered.temperatures()),
            humidity: BasicStats::from_values(filtered.humidities()),
            step: StepMetrics::compute(filtered, &self.config),
            config: self.config.clone(),
        }
    }
}

/// Analyze a sealed series with the given baseline window and settle band.
///
/// Parameters are used as given; see [`AnalysisConfig::validate`] for the
/// checks the CLI applies.
pub fn analyze(series: &RunSeries, baseline_window_s: f64, settle_band: f64) -> StepResponseReport {
    let analyzer = Analyzer {
        config: AnalysisConfig {
            baseline_window_s,
            settle_band,
        },
    };
    analyzer.analyze(series)
}

/// Descriptive statistics only, without step metrics
pub fn analyze_stability<I>(rows: I) -> StabilityReport
where
    I: IntoIterator<Item = LogRow>,
{
    StabilityReport::from_filtered(&FilteredSeries::from_rows(rows))
}
