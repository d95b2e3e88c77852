use std::fmt::{self, Write};

use serde::Serialize;

#[cfg(feature = "colorized_output")]
use console::style;

use super::{AnalysisConfig, BasicStats, FilteredSeries, StepMetrics};

/// Row counts of an analyzed log
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SampleCounts {
    /// All rows, valid or not
    pub total: usize,
    /// Rows that contributed to the statistics
    pub valid: usize,
    /// Rows that were skipped
    pub errors: usize,
    /// `errors / total` in percent; 0 when there are no rows
    pub error_rate_pct: f64,
}

impl SampleCounts {
    pub(crate) fn from_filtered(filtered: &FilteredSeries) -> Self {
        let total = filtered.total();
        let errors = filtered.errors();
        let error_rate_pct = if total > 0 {
            errors as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total,
            valid: filtered.valid(),
            errors,
            error_rate_pct,
        }
    }
}

/// Descriptive statistics of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilityReport {
    /// Row counts
    pub counts: SampleCounts,
    /// Temperature statistics (°C)
    pub temperature: Option<BasicStats>,
    /// Humidity statistics (%)
    pub humidity: Option<BasicStats>,
}

impl StabilityReport {
    pub(crate) fn from_filtered(filtered: &FilteredSeries) -> Self {
        Self {
            counts: SampleCounts::from_filtered(filtered),
            temperature: BasicStats::from_values(filtered.temperatures()),
            humidity: BasicStats::from_values(filtered.humidities()),
        }
    }

    /// Render with styled headings when the `colorized_output` feature is on
    pub fn format_colored(&self) -> String {
        Colored(self).to_string()
    }

    fn render<W: Write>(&self, out: &mut W, colored: bool) -> fmt::Result {
        heading(out, "======== ANALYSIS REPORT ========", colored)?;
        write_counts(out, &self.counts)?;
        writeln!(out)?;
        section(out, "--- Temperature (°C) ---", colored)?;
        write_stats(out, self.temperature.as_ref())?;
        writeln!(out)?;
        section(out, "--- Humidity (%) ---", colored)?;
        write_stats(out, self.humidity.as_ref())
    }
}

impl fmt::Display for StabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

/// Full result of a step-response analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResponseReport {
    /// Row counts
    pub counts: SampleCounts,
    /// Temperature statistics (°C)
    pub temperature: Option<BasicStats>,
    /// Humidity statistics (%)
    pub humidity: Option<BasicStats>,
    /// Step-response metrics
    pub step: StepMetrics,
    /// Parameters the report was computed with
    pub config: AnalysisConfig,
}

impl StepResponseReport {
    /// `errors / total` in percent
    pub fn error_rate(&self) -> f64 {
        self.counts.error_rate_pct
    }

    /// The descriptive part of the report
    pub fn stability(&self) -> StabilityReport {
        StabilityReport {
            counts: self.counts,
            temperature: self.temperature,
            humidity: self.humidity,
        }
    }

    /// Render with styled headings when the `colorized_output` feature is on
    pub fn format_colored(&self) -> String {
        Colored(self).to_string()
    }

    fn render<W: Write>(&self, out: &mut W, colored: bool) -> fmt::Result {
        let step = &self.step;

        heading(out, "======== STEP RESPONSE ANALYSIS ========", colored)?;
        write_counts(out, &self.counts)?;
        writeln!(out)?;

        section(out, "--- Temperature (°C) Stats ---", colored)?;
        writeln!(out, "{:<21}{}", "Initial temp:", fixed(step.initial_c, 3))?;
        writeln!(out, "{:<21}{}", "Final temp:", fixed(step.final_c, 3))?;
        writeln!(out, "{:<21}{}", "ΔTemp:", fixed(step.delta_c, 3))?;
        write_stats(out, self.temperature.as_ref())?;
        writeln!(out)?;

        section(
            out,
            &format!(
                "--- Response Metrics (after {:.0}s baseline) ---",
                self.config.baseline_window_s
            ),
            colored,
        )?;
        writeln!(out, "{:<21}{}", "Time Constant τ:", seconds(step.tau_s))?;
        writeln!(out, "{:<21}{}", "t90 Response Time:", seconds(step.t90_s))?;
        writeln!(out, "{:<21}{}", "Settling Time:", seconds(step.settling_s))?;
        writeln!(out)?;

        section(out, "--- Humidity (%) Stats ---", colored)?;
        write_stats(out, self.humidity.as_ref())
    }
}

impl fmt::Display for StepResponseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

/// Display adapter selecting the styled rendering
struct Colored<'a, R>(&'a R);

impl fmt::Display for Colored<'_, StabilityReport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f, true)
    }
}

impl fmt::Display for Colored<'_, StepResponseReport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f, true)
    }
}

fn write_counts<W: Write>(out: &mut W, counts: &SampleCounts) -> fmt::Result {
    writeln!(out, "{:<21}{}", "Total samples:", counts.total)?;
    writeln!(out, "{:<21}{}", "Valid samples:", counts.valid)?;
    writeln!(out, "{:<21}{}", "Error samples:", counts.errors)?;
    writeln!(out, "{:<21}{:.2}%", "Error rate:", counts.error_rate_pct)
}

fn write_stats<W: Write>(out: &mut W, stats: Option<&BasicStats>) -> fmt::Result {
    match stats {
        Some(s) => {
            writeln!(out, "{:<21}{:.3}", "Mean:", s.mean)?;
            writeln!(out, "{:<21}{:.3}", "Std Dev:", s.std_dev)?;
            writeln!(out, "{:<21}{}", "Min:", s.min)?;
            writeln!(out, "{:<21}{}", "Max:", s.max)
        }
        None => writeln!(out, "{:<21}no data", "Stats:"),
    }
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "no data".to_string())
}

fn seconds(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2} seconds", v))
        .unwrap_or_else(|| "not reached".to_string())
}

#[cfg(feature = "colorized_output")]
fn heading<W: Write>(out: &mut W, text: &str, colored: bool) -> fmt::Result {
    if colored {
        writeln!(out, "{}", style(text).bold().cyan())
    } else {
        writeln!(out, "{}", text)
    }
}

#[cfg(not(feature = "colorized_output"))]
fn heading<W: Write>(out: &mut W, text: &str, _colored: bool) -> fmt::Result {
    writeln!(out, "{}", text)
}

#[cfg(feature = "colorized_output")]
fn section<W: Write>(out: &mut W, text: &str, colored: bool) -> fmt::Result {
    if colored {
        writeln!(out, "{}", style(text).bold())
    } else {
        writeln!(out, "{}", text)
    }
}

#[cfg(not(feature = "colorized_output"))]
fn section<W: Write>(out: &mut W, text: &str, _colored: bool) -> fmt::Result {
    writeln!(out, "{}", text)
}
