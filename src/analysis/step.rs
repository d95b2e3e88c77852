use serde::Serialize;

use super::stats::mean;
use super::{AnalysisConfig, FilteredSeries, Point};

/// Fraction of the total change that defines the time constant
pub const TAU_FRACTION: f64 = 0.632;

/// Fraction of the total change that defines t90
pub const T90_FRACTION: f64 = 0.90;

/// Elapsed time of the first point, in time order, satisfying `predicate`.
///
/// The first match wins even when a later point would fit more closely.
pub fn first_crossing<P>(points: &[Point], predicate: P) -> Option<f64>
where
    P: Fn(&Point) -> bool,
{
    points.iter().find(|p| predicate(p)).map(|p| p.elapsed_s)
}

/// Temperature thresholds derived from the baseline and final values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepThresholds {
    /// 63.2 % of the change
    pub tau_c: f64,
    /// 90 % of the change
    pub t90_c: f64,
    /// Lower edge of the settle band
    pub settle_low_c: f64,
    /// Upper edge of the settle band
    pub settle_high_c: f64,
}

impl StepThresholds {
    /// Thresholds for a step from `initial` by `delta` with settle band `band`
    pub fn new(initial: f64, delta: f64, band: f64) -> Self {
        Self {
            tau_c: initial + TAU_FRACTION * delta,
            t90_c: initial + T90_FRACTION * delta,
            settle_low_c: initial + (1.0 - band) * delta,
            settle_high_c: initial + (1.0 + band) * delta,
        }
    }

    /// Whether `temperature_c` lies inside the settle band, edges included
    pub fn within_settle_band(&self, temperature_c: f64) -> bool {
        (self.settle_low_c..=self.settle_high_c).contains(&temperature_c)
    }
}

/// Step-response characteristics of one run.
///
/// Times are relative to the end of the baseline window, so a value of
/// 80 means 80 s after the window closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StepMetrics {
    /// Mean temperature inside the baseline window
    pub initial_c: Option<f64>,
    /// Highest temperature of the run.
    ///
    /// This is the single highest sample, so a noise spike or overshoot
    /// inflates it; no smoothing is applied.
    pub final_c: Option<f64>,
    /// `final_c - initial_c`
    pub delta_c: Option<f64>,
    /// Crossing thresholds
    pub thresholds: Option<StepThresholds>,
    /// Time constant τ
    pub tau_s: Option<f64>,
    /// 90 % rise time
    pub t90_s: Option<f64>,
    /// First entry into the settle band
    pub settling_s: Option<f64>,
}

impl StepMetrics {
    /// Derive metrics from filtered, time-ordered points
    pub fn compute(filtered: &FilteredSeries, config: &AnalysisConfig) -> Self {
        let points = filtered.points();
        let window = config.baseline_window_s;

        let initial_c = mean(
            points
                .iter()
                .filter(|p| p.elapsed_s <= window)
                .map(|p| p.temperature_c),
        );
        let final_c = points
            .iter()
            .map(|p| p.temperature_c)
            .reduce(f64::max);

        let (Some(initial), Some(final_value)) = (initial_c, final_c) else {
            return Self {
                initial_c,
                final_c,
                ..Self::default()
            };
        };

        let delta = final_value - initial;
        let thresholds = StepThresholds::new(initial, delta, config.settle_band);
        let relative = |t: f64| t - window;

        Self {
            initial_c,
            final_c,
            delta_c: Some(delta),
            thresholds: Some(thresholds),
            tau_s: first_crossing(points, |p| p.temperature_c >= thresholds.tau_c).map(relative),
            t90_s: first_crossing(points, |p| p.temperature_c >= thresholds.t90_c).map(relative),
            settling_s: first_crossing(points, |p| thresholds.within_settle_band(p.temperature_c))
                .map(relative),
        }
    }
}
