use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use dhtstep::acquire::CadencePolicy;

mod analyze;
mod config;
mod preset;
mod record;
mod simulate;

pub use preset::Preset;

/// dhtstep - Sensor logger and step-response analyzer
#[derive(Parser)]
#[command(name = "dhtstep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Acquisition preset matching a test procedure.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum PresetArg {
    /// Continuous room monitoring, every 3 s, no time limit
    Room,
    /// 10 minute stability run, every 2 s, 5 attempts per sample
    #[default]
    Stability,
    /// 10 minute step-response run, single attempt, heat prompt at 120 s
    Response,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Room => Preset::Room,
            PresetArg::Stability => Preset::Stability,
            PresetArg::Response => Preset::Response,
        }
    }
}

/// Sleep policy between samples.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CadenceArg {
    /// Sleep the full interval after each sample (retries stretch spacing)
    SleepAfter,
    /// Keep a fixed grid; retries eat into the interval
    FixedRate,
}

impl From<CadenceArg> for CadencePolicy {
    fn from(arg: CadenceArg) -> Self {
        match arg {
            CadenceArg::SleepAfter => CadencePolicy::SleepAfter,
            CadenceArg::FixedRate => CadencePolicy::FixedRate,
        }
    }
}

/// Sensor backend for recording.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum SensorArg {
    /// Run an external program per read (see --command)
    #[default]
    Command,
    /// Simulated heating step in real time
    Sim,
}

/// Report output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Human-readable console report
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Acquisition settings shared by `record` and `simulate`.
#[derive(Args, Clone, Debug, Default)]
pub struct AcquireArgs {
    /// Acquisition preset (room, stability, response)
    #[arg(short = 'p', long, default_value = "stability", value_enum)]
    preset: PresetArg,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seconds between samples
    #[arg(short = 'i', long, value_name = "SECONDS")]
    interval: Option<f64>,

    /// Run duration in minutes
    #[arg(short = 'd', long, value_name = "MINUTES", conflicts_with = "forever")]
    duration_min: Option<f64>,

    /// Run until interrupted
    #[arg(long)]
    forever: bool,

    /// Sensor read attempts per sample
    #[arg(short = 'n', long)]
    max_attempts: Option<u32>,

    /// Wait between failed attempts, in milliseconds
    #[arg(long, value_name = "MS")]
    retry_delay_ms: Option<u64>,

    /// Sleep policy between samples
    #[arg(long, value_enum)]
    cadence: Option<CadenceArg>,

    /// Seconds after which to prompt for the heat step
    #[arg(long, value_name = "SECONDS")]
    step_notice: Option<f64>,
}

/// Analysis settings shared by `analyze` and `simulate`.
#[derive(Args, Clone, Debug, Default)]
pub struct AnalysisArgs {
    /// Baseline window in seconds (default: 120)
    #[arg(short = 'w', long, value_name = "SECONDS")]
    baseline_window: Option<f64>,

    /// Settle band as a fraction of the step (default: 0.02)
    #[arg(short = 's', long, value_name = "FRACTION")]
    settle_band: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a run from a sensor to a CSV log
    Record {
        /// Output CSV log path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Sensor backend
        #[arg(long, default_value = "command", value_enum)]
        sensor: SensorArg,

        /// Reader program for the command backend, e.g. "python3 read_dht22.py"
        #[arg(long, value_name = "CMD")]
        command: Option<String>,

        /// Seed for the simulated sensor
        #[arg(long, default_value_t = 1)]
        seed: u64,

        #[command(flatten)]
        acquire: AcquireArgs,
    },

    /// Record a simulated step response on virtual time (no waiting)
    Simulate {
        /// Output CSV log path
        #[arg(value_name = "OUTPUT", default_value = "simulated_step.csv")]
        output: PathBuf,

        /// Sensor time constant in seconds
        #[arg(long, default_value_t = 45.0)]
        tau: f64,

        /// Temperature rise of the step in °C
        #[arg(long, default_value_t = 8.0)]
        step: f64,

        /// Probability that a single read fails
        #[arg(long, default_value_t = 0.05)]
        failure_rate: f64,

        /// Noise seed
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Print the step-response analysis after recording
        #[arg(long)]
        analyze: bool,

        #[command(flatten)]
        acquire: AcquireArgs,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Analyze the step response of a recorded log
    Analyze {
        /// Input CSV log path
        #[arg(value_name = "LOG")]
        log: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_enum)]
        format: FormatArg,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Descriptive statistics of a recorded log
    Stats {
        /// Input CSV log path
        #[arg(value_name = "LOG")]
        log: PathBuf,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_enum)]
        format: FormatArg,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Record {
            output,
            sensor,
            command,
            seed,
            acquire,
        } => record::run(output, sensor, command, seed, acquire),
        Commands::Simulate {
            output,
            tau,
            step,
            failure_rate,
            seed,
            analyze,
            acquire,
            analysis,
        } => simulate::run(
            output,
            simulate::ModelArgs {
                tau,
                step,
                failure_rate,
                seed,
            },
            analyze,
            acquire,
            analysis,
        ),
        Commands::Analyze {
            log,
            config,
            format,
            analysis,
        } => analyze::run(log, config, format, analysis),
        Commands::Stats { log, format } => analyze::run_stats(log, format),
    }
}
