//! Monotonic clocks for frame timing

use std::time::{Duration, Instant};

/// Source of monotonic time in seconds
pub trait Clock {
    /// Seconds since the clock started
    fn now(&self) -> f64;

    /// Block until `deadline` (seconds on this clock); returns immediately if already past
    fn wait_until(&mut self, deadline: f64);
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn wait_until(&mut self, deadline: f64) {
        let remaining = deadline - self.now();
        if remaining > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(remaining));
        }
    }
}

/// Clock that only moves when told to (headless runs and tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump forward, e.g. to simulate a stalled frame
    pub fn advance(&mut self, secs: f64) {
        self.now += secs.max(0.0);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now
    }

    fn wait_until(&mut self, deadline: f64) {
        self.now = self.now.max(deadline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_never_goes_back() {
        let mut clock = ManualClock::new();
        clock.wait_until(0.5);
        assert_eq!(clock.now(), 0.5);
        clock.wait_until(0.2);
        assert_eq!(clock.now(), 0.5);
        clock.advance(1.0);
        assert_eq!(clock.now(), 1.5);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.now();
        clock.wait_until(a + 0.001);
        assert!(clock.now() >= a + 0.001);
    }
}
