//! # Sensor Port
//!
//! The acquisition loop talks to hardware only through [`SensorPort`]. A read
//! either returns a [`Reading`] or fails with an opaque [`SensorError`];
//! callers treat every failure as transient and retryable.
//!
//! Adapters:
//!
//! - [`SimulatedSensor`]: first-order heating model with noise and injected
//!   read failures, driven by a [`Clock`](crate::clock::Clock)
//! - [`CommandSensor`]: runs an external program per read and parses its stdout

mod command;
mod error;
mod simulated;


pub use command::{CommandSensor, DEFAULT_COMMAND_TIMEOUT};
pub use error::SensorError;
pub use simulated::{SimulatedSensor, StepModel};

use crate::sample::Reading;

/// Port for reading a temperature/humidity sensor
pub trait SensorPort {
    /// Read temperature and humidity once
    fn read(&mut self) -> Result<Reading, SensorError>;

    /// Short human-readable name, used in log messages
    fn describe(&self) -> String {
        "sensor".to_string()
    }
}

impl<S: SensorPort + ?Sized> SensorPort for Box<S> {
    fn read(&mut self) -> Result<Reading, SensorError> {
        (**self).read()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: SensorPort + ?Sized> SensorPort for &mut S {
    fn read(&mut self) -> Result<Reading, SensorError> {
        (**self).read()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
