//! Time sources for acquisition.
//!
//! Acquisition never calls `std::thread::sleep` or `Instant::now` directly;
//! it goes through a [`Clock`] so runs can be replayed on virtual time.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of monotonic time, wall time and blocking sleep
pub trait Clock: Send + Sync {
    /// Monotonic time since an arbitrary fixed origin
    fn now(&self) -> Duration;

    /// Wall-clock time in seconds since the Unix epoch
    fn wall_time(&self) -> f64;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// Real time: `Instant` for elapsed time, chrono for wall time
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose monotonic origin is now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall_time(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1e6
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Virtual time that only moves when slept on or advanced.
///
/// Sleeping returns immediately after moving the clock forward, so a
/// ten-minute run completes instantly.
#[derive(Debug)]
pub struct ManualClock {
    wall_origin: f64,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    /// Start at monotonic zero with the given wall-clock origin
    pub fn new(wall_origin: f64) -> Self {
        Self {
            wall_origin,
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    /// Start at the current wall-clock time
    pub fn starting_now() -> Self {
        Self::new(SystemClock::new().wall_time())
    }

    /// Move time forward without sleeping
    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        *elapsed += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn wall_time(&self) -> f64 {
        self.wall_origin + self.now().as_secs_f64()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_moves_on_sleep() {
        let clock = ManualClock::new(1_000.0);
        assert_eq!(clock.now(), Duration::ZERO);

        clock.sleep(Duration::from_millis(1500));
        clock.advance(Duration::from_millis(500));

        assert_eq!(clock.now(), Duration::from_secs(2));
        assert!((clock.wall_time() - 1_002.0).abs() < 1e-9);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!(clock.wall_time() > 1_600_000_000.0);
    }
}
