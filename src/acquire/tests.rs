use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::clock::{Clock, ManualClock};
use crate::recorder::{RecorderError, SampleSink};
use crate::sample::{Reading, RunSeries, Sample};
use crate::sensor::{SensorError, SensorPort};

/// Sensor replaying a fixed script, optionally taking time per read
struct ScriptedSensor {
    script: VecDeque<Result<Reading, SensorError>>,
    reads: u32,
    clock: Option<Arc<ManualClock>>,
    read_time: Duration,
}

impl ScriptedSensor {
    fn new(script: Vec<Result<Reading, SensorError>>) -> Self {
        Self {
            script: script.into(),
            reads: 0,
            clock: None,
            read_time: Duration::ZERO,
        }
    }

    fn failing_then_ok(failures: usize, reading: Reading) -> Self {
        let mut script: Vec<_> = (0..failures)
            .map(|i| Err(SensorError::new(format!("failure {}", i))))
            .collect();
        script.push(Ok(reading));
        Self::new(script)
    }

    fn slow(mut self, clock: Arc<ManualClock>, read_time: Duration) -> Self {
        self.clock = Some(clock);
        self.read_time = read_time;
        self
    }
}

impl SensorPort for ScriptedSensor {
    fn read(&mut self) -> Result<Reading, SensorError> {
        self.reads += 1;
        if let Some(clock) = &self.clock {
            clock.advance(self.read_time);
        }
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(SensorError::new("script exhausted")))
    }
}

/// Sensor that always fails
struct DeadSensor {
    reads: u32,
}

impl SensorPort for DeadSensor {
    fn read(&mut self) -> Result<Reading, SensorError> {
        self.reads += 1;
        Err(SensorError::new("no response"))
    }
}

/// Sensor that always succeeds
struct SteadySensor;

impl SensorPort for SteadySensor {
    fn read(&mut self) -> Result<Reading, SensorError> {
        Ok(Reading::new(22.0, 45.0))
    }
}

fn policy(max_attempts: u32, delay_ms: u64) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        retry_delay: Duration::from_millis(delay_ms),
    }
}

fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(1_700_000_000.0))
}

#[test]
fn test_success_on_first_attempt() {
    let clock = manual_clock();
    let sensor = ScriptedSensor::failing_then_ok(0, Reading::new(21.0, 40.0));
    let mut acquirer = Acquirer::new(sensor, policy(5, 200), clock.clone()).unwrap();

    let sample = acquirer.tick(Duration::from_secs(4));

    assert!(sample.ok());
    assert_eq!(sample.temperature_c(), Some(21.0));
    assert_eq!(sample.elapsed_s, 4.0);
    assert_eq!(sample.wall_time, 1_700_000_000.0);
    assert_eq!(acquirer.sensor().reads, 1);
    assert_eq!(clock.now(), Duration::ZERO);
}

#[test]
fn test_success_after_failures_stops_retrying() {
    let clock = manual_clock();
    let sensor = ScriptedSensor::failing_then_ok(2, Reading::new(23.5, 41.0));
    let mut acquirer = Acquirer::new(sensor, policy(5, 200), clock.clone()).unwrap();

    let sample = acquirer.tick(Duration::ZERO);

    assert!(sample.ok());
    assert_eq!(sample.reading(), Some(Reading::new(23.5, 41.0)));
    assert_eq!(acquirer.sensor().reads, 3);
    // Two waits: after the first and second failures
    assert_eq!(clock.now(), Duration::from_millis(400));
}

#[test]
fn test_all_attempts_fail() {
    let clock = manual_clock();
    let mut acquirer =
        Acquirer::new(DeadSensor { reads: 0 }, policy(5, 200), clock.clone()).unwrap();

    let sample = acquirer.tick(Duration::from_secs(2));

    assert!(!sample.ok());
    assert_eq!(sample.temperature_c(), None);
    assert_eq!(sample.humidity_pct(), None);
    assert_eq!(acquirer.sensor().reads, 5);
    // No wait after the final attempt
    assert_eq!(clock.now(), Duration::from_millis(800));
}

#[test]
fn test_retry_outcome_reports_last_error() {
    let clock = manual_clock();
    let sensor = ScriptedSensor::new(vec![
        Err(SensorError::new("first")),
        Err(SensorError::new("second")),
    ]);
    let mut acquirer = Acquirer::new(sensor, policy(2, 0), clock).unwrap();

    let outcome = acquirer.read_with_retry();

    assert!(!outcome.is_ok());
    assert_eq!(outcome.attempts, 2);
    assert_eq!(outcome.last_error, Some(SensorError::new("second")));
}

#[test]
fn test_non_finite_reading_counts_as_failure() {
    let clock = manual_clock();
    let sensor = ScriptedSensor::new(vec![
        Ok(Reading::new(f64::NAN, 40.0)),
        Ok(Reading::new(22.0, 40.0)),
    ]);
    let mut acquirer = Acquirer::new(sensor, policy(3, 0), clock).unwrap();

    let outcome = acquirer.read_with_retry();

    assert_eq!(outcome.attempts, 2);
    assert_eq!(outcome.reading, Some(Reading::new(22.0, 40.0)));
}

#[test]
fn test_single_attempt_policy() {
    let clock = manual_clock();
    let sensor = ScriptedSensor::failing_then_ok(1, Reading::new(22.0, 40.0));
    let mut acquirer = Acquirer::new(sensor, RetryPolicy::single_attempt(), clock).unwrap();

    assert!(!acquirer.tick(Duration::ZERO).ok());
    assert!(acquirer.tick(Duration::from_secs(2)).ok());
    assert_eq!(acquirer.total_attempts(), 2);
}

#[test]
fn test_zero_attempts_rejected() {
    let result = Acquirer::new(SteadySensor, policy(0, 0), manual_clock());
    assert!(matches!(result, Err(AcquireError::InvalidConfig(_))));
}

#[test]
fn test_session_runs_for_duration() {
    let clock = manual_clock();
    let config = AcquireConfig {
        sample_interval: Duration::from_secs(2),
        duration: Some(Duration::from_secs(10)),
        ..AcquireConfig::default()
    };
    let mut session = Session::new(SteadySensor, config, clock.clone()).unwrap();
    let mut series = RunSeries::new();

    let stats = session.run(&mut series).unwrap();

    // Ticks at 0, 2, 4, 6, 8, 10; the check at 12 ends the run
    assert_eq!(stats.ticks, 6);
    assert_eq!(stats.ok_ticks, 6);
    assert_eq!(stats.attempts, 6);
    assert_eq!(stats.elapsed, Duration::from_secs(12));
    assert!(series.is_sealed());
    let times: Vec<f64> = series.iter().map(|s| s.elapsed_s).collect();
    assert_eq!(times, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    assert_eq!(series[1].wall_time, 1_700_000_002.0);
}

#[test]
fn test_sleep_after_cadence_is_stretched_by_retries() {
    let clock = manual_clock();
    // Each tick: one failure (1s read + 0.5s wait) then success (1s read)
    let script = (0..3)
        .flat_map(|_| vec![Err(SensorError::new("x")), Ok(Reading::new(20.0, 50.0))])
        .collect();
    let sensor = ScriptedSensor::new(script).slow(clock.clone(), Duration::from_secs(1));
    let config = AcquireConfig {
        sample_interval: Duration::from_secs(2),
        duration: None,
        retry: policy(3, 500),
        cadence: CadencePolicy::SleepAfter,
        max_ticks: Some(3),
        ..AcquireConfig::default()
    };
    let mut session = Session::new(sensor, config, clock.clone()).unwrap();
    let mut samples: Vec<Sample> = Vec::new();

    session.run(&mut samples).unwrap();

    let times: Vec<f64> = samples.iter().map(|s| s.elapsed_s).collect();
    assert_eq!(times, vec![0.0, 4.5, 9.0]);
    assert!(samples.iter().all(|s| s.ok()));
}

#[test]
fn test_fixed_rate_cadence_absorbs_retries() {
    let clock = manual_clock();
    let script = (0..3)
        .flat_map(|_| vec![Err(SensorError::new("x")), Ok(Reading::new(20.0, 50.0))])
        .collect();
    let sensor = ScriptedSensor::new(script).slow(clock.clone(), Duration::from_millis(500));
    let config = AcquireConfig {
        sample_interval: Duration::from_secs(2),
        duration: None,
        retry: policy(3, 500),
        cadence: CadencePolicy::FixedRate,
        max_ticks: Some(3),
        ..AcquireConfig::default()
    };
    let mut session = Session::new(sensor, config, clock.clone()).unwrap();
    let mut samples: Vec<Sample> = Vec::new();

    let stats = session.run(&mut samples).unwrap();

    let times: Vec<f64> = samples.iter().map(|s| s.elapsed_s).collect();
    assert_eq!(times, vec![0.0, 2.0, 4.0]);
    assert_eq!(stats.attempts, 6);
}

#[test]
fn test_fixed_rate_overrun_starts_next_tick_immediately() {
    let clock = manual_clock();
    let sensor = ScriptedSensor::new(vec![Ok(Reading::new(20.0, 50.0)); 2])
        .slow(clock.clone(), Duration::from_secs(3));
    let config = AcquireConfig {
        sample_interval: Duration::from_secs(2),
        duration: None,
        cadence: CadencePolicy::FixedRate,
        max_ticks: Some(2),
        ..AcquireConfig::default()
    };
    let mut session = Session::new(sensor, config, clock).unwrap();
    let mut samples: Vec<Sample> = Vec::new();

    session.run(&mut samples).unwrap();

    assert_eq!(samples[1].elapsed_s, 3.0);
}

#[test]
fn test_session_with_dead_sensor_records_failures() {
    let clock = manual_clock();
    let config = AcquireConfig {
        sample_interval: Duration::from_secs(2),
        duration: Some(Duration::from_secs(4)),
        retry: policy(5, 200),
        ..AcquireConfig::default()
    };
    let mut session = Session::new(DeadSensor { reads: 0 }, config, clock).unwrap();
    let mut series = RunSeries::new();

    let stats = session.run(&mut series).unwrap();

    // Ticks at 0, 2.8 (2s + 0.8s retries); the next would start at 5.6
    assert_eq!(stats.ticks, 2);
    assert_eq!(stats.failed_ticks, 2);
    assert_eq!(stats.attempts, 10);
    assert_eq!(stats.failure_rate_pct(), 100.0);
    assert_eq!(session.into_sensor().reads, 10);
    assert!(series.iter().all(|s| !s.ok() && s.temperature_c().is_none()));
}

/// Sink that fails on the second sample
struct FlakySink {
    seen: usize,
}

impl SampleSink for FlakySink {
    fn record(&mut self, _sample: &Sample) -> Result<(), RecorderError> {
        self.seen += 1;
        if self.seen > 1 {
            return Err(RecorderError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        Ok(())
    }
}

#[test]
fn test_sink_failure_stops_run() {
    let config = AcquireConfig {
        duration: Some(Duration::from_secs(60)),
        ..AcquireConfig::default()
    };
    let mut session = Session::new(SteadySensor, config, manual_clock()).unwrap();

    let result = session.run(&mut FlakySink { seen: 0 });

    assert!(matches!(result, Err(AcquireError::Recorder(_))));
}

#[test]
fn test_config_validation() {
    assert!(AcquireConfig::default().validate().is_ok());
    assert!(AcquireConfig {
        sample_interval: Duration::ZERO,
        ..AcquireConfig::default()
    }
    .validate()
    .is_err());
    assert!(AcquireConfig {
        step_notice_s: Some(-1.0),
        ..AcquireConfig::default()
    }
    .validate()
    .is_err());
}

#[test]
fn test_cadence_wait() {
    let interval = Duration::from_secs(2);
    let tick = Duration::from_millis(500);
    assert_eq!(CadencePolicy::SleepAfter.wait_after(interval, tick), interval);
    assert_eq!(
        CadencePolicy::FixedRate.wait_after(interval, tick),
        Duration::from_millis(1500)
    );
    assert_eq!(
        CadencePolicy::FixedRate.wait_after(interval, Duration::from_secs(5)),
        Duration::ZERO
    );
}

#[test]
fn test_step_notice_fires_once() {
    let mut notice = super::session::StepNotice::new(Some(120.0));
    assert!(!notice.due(0.0));
    assert!(!notice.due(118.0));
    assert!(notice.due(120.0));
    assert!(!notice.due(122.0));
    assert!(!notice.due(500.0));

    let mut disabled = super::session::StepNotice::new(None);
    assert!(!disabled.due(0.0));
    assert!(!disabled.due(1e9));
}

#[test]
fn test_session_issues_step_notice_at_first_tick_past_threshold() {
    let clock = manual_clock();
    let config = AcquireConfig {
        sample_interval: Duration::from_secs(2),
        duration: Some(Duration::from_secs(10)),
        step_notice_s: Some(5.0),
        ..AcquireConfig::default()
    };
    let mut session = Session::new(SteadySensor, config, clock).unwrap();
    let mut samples: Vec<Sample> = Vec::new();

    let stats = session.run(&mut samples).unwrap();

    assert_eq!(stats.ticks, 6);
    assert_eq!(stats.step_noticed_at_s, Some(6.0));
}

#[test]
fn test_session_without_step_notice() {
    let config = AcquireConfig {
        duration: Some(Duration::from_secs(4)),
        ..AcquireConfig::default()
    };
    let mut session = Session::new(SteadySensor, config, manual_clock()).unwrap();
    let stats = session.run(&mut Vec::<Sample>::new()).unwrap();
    assert_eq!(stats.step_noticed_at_s, None);
}
