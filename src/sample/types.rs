use serde::{Deserialize, Serialize};

/// A single temperature/humidity pair returned by a sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Temperature in degrees Celsius
    pub temperature_c: f64,
    /// Relative humidity in percent
    pub humidity_pct: f64,
}

impl Reading {
    /// Create a new reading
    pub fn new(temperature_c: f64, humidity_pct: f64) -> Self {
        Self {
            temperature_c,
            humidity_pct,
        }
    }

    /// Both values are finite numbers
    pub fn is_well_formed(&self) -> bool {
        self.temperature_c.is_finite() && self.humidity_pct.is_finite()
    }
}

/// One observation tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Absolute timestamp of the tick (seconds since the Unix epoch)
    pub wall_time: f64,
    /// Seconds since the run started
    pub elapsed_s: f64,
    temperature_c: Option<f64>,
    humidity_pct: Option<f64>,
    ok: bool,
}

impl Sample {
    /// Sample for a tick that obtained a reading within its retry budget
    pub fn valid(wall_time: f64, elapsed_s: f64, reading: Reading) -> Self {
        Self {
            wall_time,
            elapsed_s,
            temperature_c: Some(reading.temperature_c),
            humidity_pct: Some(reading.humidity_pct),
            ok: true,
        }
    }

    /// Sample for a tick whose every attempt failed
    pub fn failed(wall_time: f64, elapsed_s: f64) -> Self {
        Self {
            wall_time,
            elapsed_s,
            temperature_c: None,
            humidity_pct: None,
            ok: false,
        }
    }

    /// Whether a valid reading was obtained for this tick
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// Temperature in °C, absent for failed ticks
    pub fn temperature_c(&self) -> Option<f64> {
        self.temperature_c
    }

    /// Relative humidity in %, absent for failed ticks
    pub fn humidity_pct(&self) -> Option<f64> {
        self.humidity_pct
    }

    /// The reading carried by this sample, if any
    pub fn reading(&self) -> Option<Reading> {
        match (self.temperature_c, self.humidity_pct) {
            (Some(t), Some(h)) if self.ok => Some(Reading::new(t, h)),
            _ => None,
        }
    }
}
