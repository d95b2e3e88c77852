use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dhtstep::acquire::{AcquireConfig, Session};
use dhtstep::clock::{Clock, SystemClock};
use dhtstep::recorder::CsvRecorder;
use dhtstep::sensor::{CommandSensor, SensorPort, SimulatedSensor, StepModel};

use super::config::{AcquisitionSection, Config};
use super::{AcquireArgs, Preset, SensorArg};

/// Record a run from a real-time sensor
pub fn run(
    output: PathBuf,
    sensor: SensorArg,
    command: Option<String>,
    seed: u64,
    args: AcquireArgs,
) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let acquire = acquire_config(&args, &config.acquisition)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

    let sensor: Box<dyn SensorPort> = match sensor {
        SensorArg::Command => {
            let Some(command_line) = command else {
                bail!("--command is required with --sensor command");
            };
            let Some(sensor) = CommandSensor::from_command_line(&command_line) else {
                bail!("--command must not be empty");
            };
            Box::new(sensor)
        }
        SensorArg::Sim => Box::new(SimulatedSensor::new(StepModel::default(), clock.clone(), seed)),
    };

    let mut session = Session::new(sensor, acquire, clock).context("Invalid acquisition settings")?;
    let mut log = CsvRecorder::create(&output)
        .with_context(|| format!("Failed to create log file: {}", output.display()))?;

    let stats = session.run(&mut log).context("Recording failed")?;

    println!("{}", stats);
    info!("Data saved to {}", output.display());
    Ok(())
}

/// Layer preset, config file and explicit flags, in increasing precedence
pub(super) fn acquire_config(
    args: &AcquireArgs,
    file: &AcquisitionSection,
) -> Result<AcquireConfig> {
    let mut config = Preset::from(args.preset).acquire_config();

    if let Some(secs) = args.interval.or(file.sample_interval_s) {
        config.sample_interval = seconds(secs, "sample interval")?;
    }
    if args.forever {
        config.duration = None;
    } else if let Some(minutes) = args.duration_min.or(file.duration_min) {
        if minutes <= 0.0 {
            bail!("Duration must be positive, got {} min", minutes);
        }
        config.duration = Some(seconds(minutes * 60.0, "duration")?);
    }
    if let Some(attempts) = args.max_attempts.or(file.max_attempts) {
        config.retry.max_attempts = attempts;
    }
    if let Some(ms) = args.retry_delay_ms.or(file.retry_delay_ms) {
        config.retry.retry_delay = Duration::from_millis(ms);
    }
    if let Some(cadence) = args.cadence.map(Into::into).or(file.cadence) {
        config.cadence = cadence;
    }
    if let Some(notice) = args.step_notice.or(file.step_notice_s) {
        config.step_notice_s = Some(notice);
    }

    config.validate().context("Invalid acquisition settings")?;
    Ok(config)
}

fn seconds(value: f64, what: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("Invalid {}: {} s", what, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CadenceArg, PresetArg};
    use dhtstep::acquire::CadencePolicy;

    #[test]
    fn test_preset_only() {
        let args = AcquireArgs {
            preset: PresetArg::Response,
            ..AcquireArgs::default()
        };
        let config = acquire_config(&args, &AcquisitionSection::default()).unwrap();
        assert_eq!(config, Preset::Response.acquire_config());
    }

    #[test]
    fn test_flags_override_file() {
        let args = AcquireArgs {
            interval: Some(5.0),
            cadence: Some(CadenceArg::FixedRate),
            ..AcquireArgs::default()
        };
        let file = AcquisitionSection {
            sample_interval_s: Some(3.0),
            max_attempts: Some(2),
            cadence: Some(CadencePolicy::SleepAfter),
            ..AcquisitionSection::default()
        };

        let config = acquire_config(&args, &file).unwrap();
        assert_eq!(config.sample_interval, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.cadence, CadencePolicy::FixedRate);
    }

    #[test]
    fn test_forever_clears_duration() {
        let args = AcquireArgs {
            forever: true,
            ..AcquireArgs::default()
        };
        let file = AcquisitionSection {
            duration_min: Some(5.0),
            ..AcquisitionSection::default()
        };
        assert_eq!(acquire_config(&args, &file).unwrap().duration, None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let zero_attempts = AcquireArgs {
            max_attempts: Some(0),
            ..AcquireArgs::default()
        };
        assert!(acquire_config(&zero_attempts, &AcquisitionSection::default()).is_err());

        let negative_interval = AcquireArgs {
            interval: Some(-2.0),
            ..AcquireArgs::default()
        };
        assert!(acquire_config(&negative_interval, &AcquisitionSection::default()).is_err());

        let zero_duration = AcquireArgs {
            duration_min: Some(0.0),
            ..AcquireArgs::default()
        };
        assert!(acquire_config(&zero_duration, &AcquisitionSection::default()).is_err());
    }
}
