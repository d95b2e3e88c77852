//! Integration tests for dhtstep
//!
//! These tests run the whole pipeline on virtual time: simulated sensor,
//! acquisition session, CSV log on disk, reload and analysis.

use dhtstep::acquire::{AcquireConfig, CadencePolicy, RetryPolicy, Session};
use dhtstep::analysis::{analyze_stability, AnalysisConfig, Analyzer};
use dhtstep::clock::{Clock, ManualClock};
use dhtstep::recorder::{columns, read_log, CsvRecorder, RowError};
use dhtstep::sample::RunSeries;
use dhtstep::sensor::{SimulatedSensor, StepModel};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const WALL_ORIGIN: f64 = 1_700_000_000.0;

fn noiseless_model() -> StepModel {
    StepModel {
        noise_c: 0.0,
        failure_rate: 0.0,
        quantize: false,
        ..StepModel::default()
    }
}

fn one_second_run() -> AcquireConfig {
    AcquireConfig {
        sample_interval: Duration::from_secs(1),
        duration: Some(Duration::from_secs(600)),
        cadence: CadencePolicy::FixedRate,
        ..AcquireConfig::default()
    }
}

/// Record a noiseless step, reload it and recover the model's time constant
#[test]
fn test_record_reload_analyze() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("step_response.csv");

    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(WALL_ORIGIN));
    let sensor = SimulatedSensor::new(noiseless_model(), clock.clone(), 7);
    let mut session = Session::new(sensor, one_second_run(), clock).unwrap();

    let log = CsvRecorder::create(&path).unwrap();
    let mut sink = (log, RunSeries::new());
    let stats = session.run(&mut sink).unwrap();

    assert_eq!(stats.ticks, 601);
    assert_eq!(stats.ok_ticks, 601);
    assert_eq!(stats.attempts, 601);
    assert_eq!(sink.0.rows_written(), 601);
    assert!(sink.1.is_sealed());

    // The file starts with the header and holds one row per tick
    let contents = fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some(columns::HEADER.join(",").as_str()));
    assert_eq!(lines.count(), 601);

    let rows = read_log(&path).unwrap();
    assert_eq!(rows.len(), 601);
    let first = rows[0].as_ref().unwrap();
    assert_eq!(first.wall_time, WALL_ORIGIN);
    assert_eq!(first.elapsed_s, 0.0);
    assert_eq!(first.temperature_c(), Some(23.0));

    let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
    let report = analyzer.analyze_rows(rows);

    // Reloaded values are bit-identical to the in-memory series
    assert_eq!(report, analyzer.analyze(&sink.1));

    assert_eq!(report.counts.total, 601);
    assert_eq!(report.counts.errors, 0);
    assert_eq!(report.step.initial_c, Some(23.0));

    let tau = report.step.tau_s.unwrap();
    assert!((tau - 45.0).abs() <= 1.0, "tau = {}", tau);
    let t90 = report.step.t90_s.unwrap();
    assert!((t90 - 104.0).abs() <= 1.0, "t90 = {}", t90);
    let settling = report.step.settling_s.unwrap();
    assert!((settling - 177.0).abs() <= 1.0, "settling = {}", settling);
}

/// Failed reads are logged as empty rows and show up in the error rate
#[test]
fn test_failed_reads_are_logged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("flaky.csv");

    let model = StepModel {
        failure_rate: 0.5,
        ..noiseless_model()
    };
    let config = AcquireConfig {
        retry: RetryPolicy::single_attempt(),
        duration: Some(Duration::from_secs(200)),
        ..one_second_run()
    };

    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(WALL_ORIGIN));
    let sensor = SimulatedSensor::new(model, clock.clone(), 42);
    let mut session = Session::new(sensor, config, clock).unwrap();
    let mut log = CsvRecorder::create(&path).unwrap();
    let stats = session.run(&mut log).unwrap();

    assert_eq!(stats.ticks, 201);
    assert_eq!(stats.attempts, 201);
    assert!(stats.failed_ticks > 0);
    assert!(stats.ok_ticks > 0);

    let rows = read_log(&path).unwrap();
    assert!(rows.iter().all(|row| row.is_ok()));

    let failed = rows
        .iter()
        .filter_map(|row| row.as_ref().ok())
        .filter(|sample| !sample.ok())
        .count();
    assert_eq!(failed as u64, stats.failed_ticks);

    let report = analyze_stability(rows);
    assert_eq!(report.counts.errors as u64, stats.failed_ticks);
    let expected_rate = stats.failed_ticks as f64 / 201.0 * 100.0;
    assert!((report.counts.error_rate_pct - expected_rate).abs() < 1e-9);
}

/// Logs from the older scripts use `unix_time` and `humidity`
#[test]
fn test_legacy_log_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.csv");
    fs::write(
        &path,
        "unix_time,elapsed_s,temperature_c,humidity,ok\n\
         1700000000.0,0.0,22.0,40.0,1\n\
         1700000002.0,2.0,,,0\n\
         1700000004.0,4.0,22.4,39.0,1\n",
    )
    .unwrap();

    let rows = read_log(&path).unwrap();
    assert_eq!(rows.len(), 3);

    let report = analyze_stability(rows);
    assert_eq!(report.counts.total, 3);
    assert_eq!(report.counts.valid, 2);
    let temperature = report.temperature.unwrap();
    assert!((temperature.mean - 22.2).abs() < 1e-9);
    assert_eq!(temperature.min, 22.0);
    assert_eq!(temperature.max, 22.4);
    assert_eq!(report.humidity.unwrap().mean, 39.5);
}

/// A hand-edited log with a broken row still analyzes
#[test]
fn test_bad_rows_are_counted_not_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("edited.csv");
    fs::write(
        &path,
        "wall_time,elapsed_s,temperature_c,humidity_pct,ok\n\
         1700000000.0,0.0,22.0,40.0,1\n\
         1700000002.0,2.0,warm,40.0,1\n\
         1700000004.0,4.0,22.0,40.0,yes\n\
         1700000006.0,6.0,22.0,40.0,1\n",
    )
    .unwrap();

    let rows = read_log(&path).unwrap();
    assert_eq!(rows.len(), 4);
    assert!(matches!(
        rows[1],
        Err(RowError::InvalidNumber { line: 3, .. })
    ));
    assert!(matches!(rows[2], Err(RowError::InvalidFlag { line: 4, .. })));

    let report = analyze_stability(rows);
    assert_eq!(report.counts.total, 4);
    assert_eq!(report.counts.errors, 2);
    assert_eq!(report.counts.error_rate_pct, 50.0);
}

/// A report serializes with unreachable metrics as `null`
#[test]
fn test_report_json() {
    let series = RunSeries::from_samples(Vec::new());
    let report = Analyzer::default().analyze(&series);
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();

    assert_eq!(json["counts"]["total"], 0);
    assert_eq!(json["counts"]["error_rate_pct"], 0.0);
    assert!(json["step"]["tau_s"].is_null());
    assert!(json["temperature"].is_null());
}
