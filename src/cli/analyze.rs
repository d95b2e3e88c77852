use anyhow::{Context, Result};
use std::path::PathBuf;

use dhtstep::analysis::{analyze_stability, AnalysisConfig, Analyzer};
use dhtstep::recorder::read_log;

use super::config::{AnalysisSection, Config};
use super::{AnalysisArgs, FormatArg};

/// Step-response analysis of a recorded log
pub fn run(
    log: PathBuf,
    config: Option<PathBuf>,
    format: FormatArg,
    args: AnalysisArgs,
) -> Result<()> {
    let file = Config::load(config.as_deref())?;
    let analyzer = Analyzer::new(analysis_config(&args, &file.analysis)?)?;

    let rows = read_log(&log).with_context(|| format!("Failed to read log: {}", log.display()))?;
    let report = analyzer.analyze_rows(rows);

    match format {
        FormatArg::Text => println!("{}", report.format_colored()),
        FormatArg::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }
    Ok(())
}

/// Descriptive statistics of a recorded log
pub fn run_stats(log: PathBuf, format: FormatArg) -> Result<()> {
    let rows = read_log(&log).with_context(|| format!("Failed to read log: {}", log.display()))?;
    let report = analyze_stability(rows);

    match format {
        FormatArg::Text => println!("{}", report.format_colored()),
        FormatArg::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }
    Ok(())
}

/// Layer defaults, config file and explicit flags, in increasing precedence
pub(super) fn analysis_config(
    args: &AnalysisArgs,
    file: &AnalysisSection,
) -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::default();
    if let Some(window) = args.baseline_window.or(file.baseline_window_s) {
        config.baseline_window_s = window;
    }
    if let Some(band) = args.settle_band.or(file.settle_band) {
        config.settle_band = band;
    }
    config.validate()?;
    Ok(config)
}
