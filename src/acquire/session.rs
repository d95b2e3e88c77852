use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use super::{AcquireConfig, AcquireError, Acquirer};
use crate::clock::Clock;
use crate::recorder::SampleSink;
use crate::sensor::SensorPort;

/// Statistics from a completed acquisition run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    /// Number of ticks (samples) produced
    pub ticks: u64,
    /// Ticks that obtained a valid reading
    pub ok_ticks: u64,
    /// Ticks whose every attempt failed
    pub failed_ticks: u64,
    /// Sensor reads performed across all ticks
    pub attempts: u64,
    /// Time from run start to the end of the last tick's wait
    pub elapsed: Duration,
    /// Elapsed seconds at which the heat-step prompt was issued
    pub step_noticed_at_s: Option<f64>,
}

impl SessionStats {
    /// Fraction of failed ticks in percent, 0 for an empty run
    pub fn failure_rate_pct(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.failed_ticks as f64 / self.ticks as f64 * 100.0
        }
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Recorded {} samples ({} ok, {} failed, {} sensor reads) in {:.1}s",
            self.ticks,
            self.ok_ticks,
            self.failed_ticks,
            self.attempts,
            self.elapsed.as_secs_f64()
        )
    }
}

/// One-shot prompt to apply the heat step
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepNotice {
    at_s: Option<f64>,
    fired: bool,
}

impl StepNotice {
    pub(crate) fn new(at_s: Option<f64>) -> Self {
        Self { at_s, fired: false }
    }

    /// True on the first call at or past the notice time, false ever after
    pub(crate) fn due(&mut self, elapsed_s: f64) -> bool {
        match self.at_s {
            Some(at_s) if !self.fired && elapsed_s >= at_s => {
                self.fired = true;
                true
            }
            _ => false,
        }
    }
}

/// One acquisition run: ticks at a fixed cadence until the duration elapses
pub struct Session<S> {
    acquirer: Acquirer<S>,
    config: AcquireConfig,
    clock: Arc<dyn Clock>,
}

impl<S: SensorPort> Session<S> {
    /// Create a session; fails on invalid configuration
    pub fn new(
        sensor: S,
        config: AcquireConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AcquireError> {
        config.validate()?;
        let acquirer = Acquirer::new(sensor, config.retry, clock.clone())?;
        Ok(Self {
            acquirer,
            config,
            clock,
        })
    }

    /// The run configuration
    pub fn config(&self) -> &AcquireConfig {
        &self.config
    }

    /// Borrow the acquirer
    pub fn acquirer(&self) -> &Acquirer<S> {
        &self.acquirer
    }

    /// Run to completion, handing every sample to `sink` in order.
    ///
    /// The duration check happens once per tick, before sampling, so the
    /// last tick starts no later than `duration` after the start.
    pub fn run<K: SampleSink + ?Sized>(
        &mut self,
        sink: &mut K,
    ) -> Result<SessionStats, AcquireError> {
        let interval = self.config.sample_interval;
        let mut stats = SessionStats::default();
        let mut step_notice = StepNotice::new(self.config.step_notice_s);

        info!(
            "Sampling {} every {:.1}s for {} ({} attempt(s), {:?} cadence)",
            self.acquirer.sensor().describe(),
            interval.as_secs_f64(),
            self.config
                .duration
                .map(|d| format!("{:.1} min", d.as_secs_f64() / 60.0))
                .unwrap_or_else(|| "an unbounded time".to_string()),
            self.config.retry.max_attempts,
            self.config.cadence
        );
        if let Some(notice) = self.config.step_notice_s {
            info!("Apply the heat source once {:.0} seconds have passed", notice);
        }

        let start = self.clock.now();
        let attempts_before = self.acquirer.total_attempts();

        loop {
            let tick_start = self.clock.now();
            let elapsed = tick_start.saturating_sub(start);

            if self.config.duration.is_some_and(|d| elapsed > d) {
                break;
            }
            if self.config.max_ticks.is_some_and(|max| stats.ticks >= max) {
                break;
            }

            if step_notice.due(elapsed.as_secs_f64()) {
                warn!(
                    "{:.0}s baseline complete: apply the heat source now",
                    elapsed.as_secs_f64()
                );
                stats.step_noticed_at_s = Some(elapsed.as_secs_f64());
            }

            let sample = self.acquirer.tick(elapsed);
            sink.record(&sample)?;

            stats.ticks += 1;
            if sample.ok() {
                stats.ok_ticks += 1;
            } else {
                stats.failed_ticks += 1;
            }

            let tick_time = self.clock.now().saturating_sub(tick_start);
            self.clock
                .sleep(self.config.cadence.wait_after(interval, tick_time));
        }

        sink.finish()?;

        stats.attempts = self.acquirer.total_attempts() - attempts_before;
        stats.elapsed = self.clock.now().saturating_sub(start);
        info!("{}", stats);

        Ok(stats)
    }

    /// Give back the sensor
    pub fn into_sensor(self) -> S {
        self.acquirer.into_sensor()
    }
}
