use std::io::Read;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use super::{SensorError, SensorPort};
use crate::sample::Reading;

/// Sensor backed by an external program.
///
/// The program is run once per read. It must exit successfully and print
/// temperature and humidity on stdout, separated by whitespace or a comma:
///
/// ```text
/// 23.4 41.0
/// ```
///
/// A program still running after the timeout is killed and the read fails.
#[derive(Debug, Clone)]
pub struct CommandSensor {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

/// Default limit on a single reader invocation
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

impl CommandSensor {
    /// Create a sensor running `program` with `args`
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Limit how long a single read may take
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Current per-read time limit
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Split a whitespace-separated command line into program and arguments.
    ///
    /// Returns `None` for an empty command line. No shell quoting is applied.
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    /// Parse program output into a reading
    pub fn parse_output(stdout: &str) -> Option<Reading> {
        let mut values = stdout
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty());

        let temperature: f64 = values.next()?.parse().ok()?;
        let humidity: f64 = values.next()?.parse().ok()?;
        let reading = Reading::new(temperature, humidity);
        reading.is_well_formed().then_some(reading)
    }
}

impl CommandSensor {
    fn run(&self) -> Result<Output, SensorError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SensorError::new(format!("failed to run {}: {}", self.program, e)))?;

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    return Ok(Output {
                        status,
                        stdout: drain(child.stdout.take()),
                        stderr: drain(child.stderr.take()),
                    });
                }
                Ok(None) if Instant::now() >= deadline => {
                    kill(&mut child, &self.program);
                    return Err(SensorError::new(format!(
                        "{} timed out after {:?}",
                        self.program, self.timeout
                    )));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    kill(&mut child, &self.program);
                    return Err(SensorError::new(format!(
                        "failed to wait for {}: {}",
                        self.program, e
                    )));
                }
            }
        }
    }
}

fn drain<R: Read>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(e) = pipe.read_to_end(&mut buf) {
            debug!("Failed to read reader output: {}", e);
        }
    }
    buf
}

fn kill(child: &mut Child, program: &str) {
    if let Err(e) = child.kill() {
        debug!("Failed to kill {}: {}", program, e);
    }
    if let Err(e) = child.wait() {
        debug!("Failed to reap {}: {}", program, e);
    }
}

impl SensorPort for CommandSensor {
    fn read(&mut self) -> Result<Reading, SensorError> {
        let output = self.run()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SensorError::new(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_output(&stdout).ok_or_else(|| {
            SensorError::new(format!(
                "unparsable output from {}: {:?}",
                self.program,
                stdout.trim()
            ))
        })
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            format!("command `{}`", self.program)
        } else {
            format!("command `{} {}`", self.program, self.args.join(" "))
        }
    }
}
