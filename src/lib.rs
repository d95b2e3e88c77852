//! # dhtstep - Sensor Step-Response Logger
//!
//! `dhtstep` samples a temperature/humidity sensor at a fixed cadence, logs
//! every tick with a validity flag, and derives first-order step-response
//! characteristics from a logged heating transient.
//!
//! ## Key Features
//!
//! - **Bounded-Retry Acquisition**: each tick tries the sensor a fixed number
//!   of times with a fixed delay and always produces exactly one sample. Read
//!   failures become `ok = 0` rows, never errors.
//!
//! - **Append-Only CSV Log**: one row per tick, flushed as written, readable
//!   by any spreadsheet or dataframe library.
//!
//! - **Step-Response Metrics**: time constant τ (63.2 %), t90 and settling
//!   time from threshold crossings, plus mean/std/min/max and the error rate.
//!
//! - **Testable Time**: all sleeping goes through a [`clock::Clock`], so whole
//!   runs can be replayed on virtual time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dhtstep::acquire::{AcquireConfig, Session};
//! use dhtstep::analysis::{AnalysisConfig, Analyzer};
//! use dhtstep::clock::SystemClock;
//! use dhtstep::recorder::{read_log, CsvRecorder};
//! use dhtstep::sensor::CommandSensor;
//!
//! // Record ten minutes of samples from an external reader program
//! let sensor = CommandSensor::new("read_dht22", vec![]);
//! let mut session = Session::new(sensor, AcquireConfig::default(), Arc::new(SystemClock::new()))?;
//! let mut log = CsvRecorder::create("step_response.csv")?;
//! let stats = session.run(&mut log)?;
//! println!("{}", stats);
//!
//! // Analyze the log offline
//! let rows = read_log("step_response.csv")?;
//! let report = Analyzer::new(AnalysisConfig::default())?.analyze_rows(rows);
//! println!("{}", report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`sample`]: `Sample` and `RunSeries`, the record schema
//! - [`sensor`]: the `SensorPort` trait and sensor adapters
//! - [`acquire`]: retrying acquirer and the fixed-cadence run loop
//! - [`recorder`]: CSV log writer and loader
//! - [`analysis`]: statistics and step-response metrics
//! - [`clock`]: real and virtual time sources

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod acquire;
pub mod analysis;
pub mod clock;
pub mod recorder;
pub mod sample;
pub mod sensor;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::acquire::{
        AcquireConfig, AcquireError, Acquirer, CadencePolicy, RetryPolicy, Session, SessionStats,
    };
    pub use crate::analysis::{
        analyze, analyze_stability, AnalysisConfig, AnalysisError, Analyzer, BasicStats,
        StabilityReport, StepMetrics, StepResponseReport,
    };
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::recorder::{read_log, CsvRecorder, LogReader, LogRow, RecorderError, SampleSink};
    pub use crate::sample::{Reading, RunSeries, Sample};
    pub use crate::sensor::{CommandSensor, SensorError, SensorPort, SimulatedSensor, StepModel};
}
