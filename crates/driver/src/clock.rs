use std::time::{Duration, Instant};

/// Monotonic time source for frame timing.
pub trait FrameClock {
    /// Time elapsed since an arbitrary fixed epoch.
    fn now(&mut self) -> Duration;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now(&mut self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Clock that only moves when told to. Used by tests and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Jump to an absolute time. Going backwards is allowed; the driver
    /// saturates the resulting delta at zero.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }
}

impl FrameClock for ManualClock {
    fn now(&mut self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let mut clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
