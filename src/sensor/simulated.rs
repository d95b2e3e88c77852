use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{SensorError, SensorPort};
use crate::clock::Clock;
use crate::sample::Reading;

/// Parameters of the simulated heating step
#[derive(Debug, Clone, PartialEq)]
pub struct StepModel {
    /// Temperature before the step (°C)
    pub ambient_c: f64,
    /// Total temperature rise after the step (°C)
    pub step_c: f64,
    /// Seconds after start at which the heat source is applied
    pub step_at_s: f64,
    /// First-order time constant of the sensor (s)
    pub tau_s: f64,
    /// Relative humidity at ambient temperature (%)
    pub humidity_pct: f64,
    /// Change in relative humidity per degree of rise (%/°C)
    pub humidity_per_degree: f64,
    /// Peak amplitude of uniform temperature noise (°C)
    pub noise_c: f64,
    /// Probability that a single read fails
    pub failure_rate: f64,
    /// Round values to the sensor resolution of 0.1
    pub quantize: bool,
}

impl Default for StepModel {
    fn default() -> Self {
        Self {
            ambient_c: 23.0,
            step_c: 8.0,
            step_at_s: 120.0,
            tau_s: 45.0,
            humidity_pct: 45.0,
            humidity_per_degree: -2.5,
            noise_c: 0.1,
            failure_rate: 0.05,
            quantize: true,
        }
    }
}

impl StepModel {
    /// Noise-free temperature at `t` seconds after start
    pub fn temperature_at(&self, t: f64) -> f64 {
        if t < self.step_at_s || self.tau_s <= 0.0 {
            return if t < self.step_at_s {
                self.ambient_c
            } else {
                self.ambient_c + self.step_c
            };
        }
        let rise = 1.0 - (-(t - self.step_at_s) / self.tau_s).exp();
        self.ambient_c + self.step_c * rise
    }

    /// Noise-free relative humidity at temperature `temperature_c`
    pub fn humidity_at(&self, temperature_c: f64) -> f64 {
        let rise = temperature_c - self.ambient_c;
        (self.humidity_pct + self.humidity_per_degree * rise).clamp(0.0, 100.0)
    }
}

/// Simulated DHT-style sensor following a [`StepModel`]
pub struct SimulatedSensor {
    model: StepModel,
    clock: Arc<dyn Clock>,
    origin: Duration,
    rng: StdRng,
    reads: u64,
}

impl SimulatedSensor {
    /// Create a sensor whose time origin is the clock's current time
    pub fn new(model: StepModel, clock: Arc<dyn Clock>, seed: u64) -> Self {
        let origin = clock.now();
        Self {
            model: StepModel {
                noise_c: model.noise_c.abs(),
                failure_rate: model.failure_rate.clamp(0.0, 1.0),
                ..model
            },
            clock,
            origin,
            rng: StdRng::seed_from_u64(seed),
            reads: 0,
        }
    }

    /// The model this sensor follows
    pub fn model(&self) -> &StepModel {
        &self.model
    }

    /// Number of read attempts so far
    pub fn reads(&self) -> u64 {
        self.reads
    }

    fn quantize(&self, value: f64) -> f64 {
        if self.model.quantize {
            (value * 10.0).round() / 10.0
        } else {
            value
        }
    }
}

impl SensorPort for SimulatedSensor {
    fn read(&mut self) -> Result<Reading, SensorError> {
        self.reads += 1;
        let t = self.clock.now().saturating_sub(self.origin).as_secs_f64();

        if self.rng.gen_bool(self.model.failure_rate) {
            return Err(SensorError::new("checksum did not validate"));
        }

        let noise = if self.model.noise_c > 0.0 {
            self.rng.gen_range(-self.model.noise_c..=self.model.noise_c)
        } else {
            0.0
        };
        let temperature = self.model.temperature_at(t) + noise;
        let humidity = self.model.humidity_at(temperature);

        Ok(Reading::new(
            self.quantize(temperature),
            self.quantize(humidity),
        ))
    }

    fn describe(&self) -> String {
        format!(
            "simulated step sensor ({:.1}°C +{:.1}°C at {:.0}s, tau {:.0}s)",
            self.model.ambient_c, self.model.step_c, self.model.step_at_s, self.model.tau_s
        )
    }
}
