use std::time::{Duration, Instant};

/// Event poll interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// Measures wall time between loop iterations
#[derive(Debug)]
pub struct Ticker {
    last: Instant,
}

impl Ticker {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }

    /// Time since the previous call (or since creation)
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        let duration = tick_duration();
        assert_eq!(duration, Duration::from_millis(250));
    }

    #[test]
    fn test_lap_is_monotonic() {
        let mut ticker = Ticker::new();
        std::thread::sleep(Duration::from_millis(5));
        let first = ticker.lap();
        assert!(first >= Duration::from_millis(5));
        let second = ticker.lap();
        assert!(second < first + Duration::from_secs(1));
    }
}
