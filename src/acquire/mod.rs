//! # Acquisition
//!
//! Turns an unreliable [`SensorPort`](crate::sensor::SensorPort) into one
//! well-defined [`Sample`](crate::sample::Sample) per tick.
//!
//! ## Design
//!
//! 1. **Bounded retries**: [`Acquirer::tick`] tries the sensor up to
//!    `max_attempts` times, stopping at the first success. Between failed
//!    attempts it sleeps a fixed `retry_delay`. When every attempt fails the
//!    tick yields `ok = false`. Sensor failures never escape a tick.
//!
//! 2. **Fixed cadence**: [`Session::run`] calls `tick` once per sampling
//!    interval until the configured duration has elapsed. How retry time
//!    interacts with the interval is chosen by [`CadencePolicy`] and stays
//!    fixed for the whole run.
//!
//! 3. **Injected time**: all sleeping and time-keeping goes through a
//!    [`Clock`](crate::clock::Clock).

mod acquirer;
mod config;
mod error;
mod retry;
mod session;

#[cfg(test)]
mod tests;

pub use acquirer::Acquirer;
pub use config::{AcquireConfig, CadencePolicy};
pub use error::AcquireError;
pub use retry::{RetryOutcome, RetryPolicy};
pub use session::{Session, SessionStats};
