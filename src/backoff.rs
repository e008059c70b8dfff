use std::cmp;
use std::time::Duration;

pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(60);
const GROWTH_FACTOR: f64 = 1.5;

/// Adaptive poll interval: burst after a transition, relax while stable.
#[derive(Debug)]
pub struct PollInterval {
    current: Duration,
}

impl PollInterval {
    pub fn new() -> Self {
        Self {
            current: MIN_POLL_INTERVAL,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    /// A transition was observed; poll quickly to catch flapping and tighten
    /// boundary timestamps.
    pub fn reset(&mut self) {
        self.current = MIN_POLL_INTERVAL;
    }

    /// No change observed, or the poll failed; back off toward the maximum.
    pub fn relax(&mut self) {
        self.current = cmp::min(self.current.mul_f64(GROWTH_FACTOR), MAX_POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_minimum() {
        assert_eq!(PollInterval::new().current(), MIN_POLL_INTERVAL);
    }

    #[test]
    fn relax_grows_by_half_each_step() {
        let mut interval = PollInterval::new();
        interval.relax();
        assert_eq!(interval.current(), Duration::from_millis(4500));
        interval.relax();
        assert_eq!(interval.current(), Duration::from_millis(6750));
        interval.relax();
        assert_eq!(interval.current(), Duration::from_millis(10125));
    }

    #[test]
    fn relax_clamps_at_maximum() {
        let mut interval = PollInterval::new();
        for _ in 0..50 {
            interval.relax();
            assert!(interval.current() >= MIN_POLL_INTERVAL);
            assert!(interval.current() <= MAX_POLL_INTERVAL);
        }
        assert_eq!(interval.current(), MAX_POLL_INTERVAL);
    }

    #[test]
    fn reset_returns_to_minimum() {
        let mut interval = PollInterval::new();
        interval.relax();
        interval.relax();
        interval.reset();
        assert_eq!(interval.current(), MIN_POLL_INTERVAL);
    }
}
