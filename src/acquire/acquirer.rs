use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use super::{AcquireError, RetryOutcome, RetryPolicy};
use crate::clock::Clock;
use crate::sample::{Reading, Sample};
use crate::sensor::{SensorError, SensorPort};

/// Drives a sensor with bounded retries, producing one sample per tick
pub struct Acquirer<S> {
    sensor: S,
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
    total_attempts: u64,
}

impl<S: SensorPort> Acquirer<S> {
    /// Create an acquirer; fails if the retry policy allows no attempts
    pub fn new(
        sensor: S,
        policy: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AcquireError> {
        policy.validate()?;
        Ok(Self {
            sensor,
            policy,
            clock,
            total_attempts: 0,
        })
    }

    /// Produce the sample for one tick at `elapsed` since the run started.
    ///
    /// Sensor failures are absorbed; after `max_attempts` failures the
    /// sample has `ok = false` and no values.
    pub fn tick(&mut self, elapsed: Duration) -> Sample {
        let wall_time = self.clock.wall_time();
        let elapsed_s = elapsed.as_secs_f64();

        let outcome = self.read_with_retry();
        match outcome.reading {
            Some(reading) => {
                info!(
                    "{:6.1}s -> Temp: {:4.1}°C, Humidity: {:4.1}%",
                    elapsed_s, reading.temperature_c, reading.humidity_pct
                );
                Sample::valid(wall_time, elapsed_s, reading)
            }
            None => {
                info!(
                    "{:6.1}s -> read error after {} attempt(s){}",
                    elapsed_s,
                    outcome.attempts,
                    outcome
                        .last_error
                        .map(|e| format!(": {}", e.message()))
                        .unwrap_or_default()
                );
                Sample::failed(wall_time, elapsed_s)
            }
        }
    }

    /// Try the sensor up to `max_attempts` times, stopping at the first
    /// well-formed reading
    pub fn read_with_retry(&mut self) -> RetryOutcome {
        let max_attempts = self.policy.max_attempts;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            self.total_attempts += 1;
            match self.attempt() {
                Ok(reading) => {
                    return RetryOutcome {
                        reading: Some(reading),
                        attempts: attempt,
                        last_error: None,
                    };
                }
                Err(e) => {
                    debug!("Attempt {}/{} failed: {}", attempt, max_attempts, e);
                    last_error = Some(e);
                }
            }

            if attempt < max_attempts {
                self.clock.sleep(self.policy.retry_delay);
            }
        }

        RetryOutcome {
            reading: None,
            attempts: max_attempts,
            last_error,
        }
    }

    fn attempt(&mut self) -> Result<Reading, SensorError> {
        let reading = self.sensor.read()?;
        if reading.is_well_formed() {
            Ok(reading)
        } else {
            Err(SensorError::new(format!(
                "non-finite reading ({}, {})",
                reading.temperature_c, reading.humidity_pct
            )))
        }
    }

    /// Sensor reads performed over the acquirer's lifetime
    pub fn total_attempts(&self) -> u64 {
        self.total_attempts
    }

    /// The retry policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Borrow the underlying sensor
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Give back the underlying sensor
    pub fn into_sensor(self) -> S {
        self.sensor
    }
}
