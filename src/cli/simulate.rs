use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use dhtstep::acquire::Session;
use dhtstep::analysis::Analyzer;
use dhtstep::clock::{Clock, ManualClock};
use dhtstep::recorder::CsvRecorder;
use dhtstep::sample::RunSeries;
use dhtstep::sensor::{SimulatedSensor, StepModel};

use super::config::Config;
use super::{analyze, record, AcquireArgs, AnalysisArgs};

/// Parameters of the simulated sensor
pub struct ModelArgs {
    pub tau: f64,
    pub step: f64,
    pub failure_rate: f64,
    pub seed: u64,
}

/// Record a simulated run on virtual time
pub fn run(
    output: PathBuf,
    model_args: ModelArgs,
    print_analysis: bool,
    acquire_args: AcquireArgs,
    analysis_args: AnalysisArgs,
) -> Result<()> {
    let config = Config::load(acquire_args.config.as_deref())?;
    let mut acquire = record::acquire_config(&acquire_args, &config.acquisition)?;
    if acquire.duration.is_none() {
        // Virtual time never ends on its own
        acquire.max_ticks = Some(10_000);
    }
    let analysis = analyze::analysis_config(&analysis_args, &config.analysis)?;

    let model = StepModel {
        tau_s: model_args.tau,
        step_c: model_args.step,
        step_at_s: analysis.baseline_window_s,
        failure_rate: model_args.failure_rate,
        ..StepModel::default()
    };

    let clock: Arc<dyn Clock> = Arc::new(ManualClock::starting_now());
    let sensor = SimulatedSensor::new(model, clock.clone(), model_args.seed);
    let mut session = Session::new(sensor, acquire, clock).context("Invalid acquisition settings")?;

    let log = CsvRecorder::create(&output)
        .with_context(|| format!("Failed to create log file: {}", output.display()))?;
    let mut sink = (log, RunSeries::new());

    let stats = session.run(&mut sink).context("Simulation failed")?;
    println!("{}", stats);
    info!("Data saved to {}", output.display());

    if print_analysis {
        let analyzer = Analyzer::new(analysis)?;
        let report = analyzer.analyze(&sink.1);
        println!();
        println!("{}", report.format_colored());
    }

    Ok(())
}
