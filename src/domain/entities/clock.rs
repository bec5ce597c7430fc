use chrono::{DateTime, Utc};

/// Startup timestamp used to derive uptime on demand
#[derive(Debug, Clone, Copy)]
pub struct ProcessClock {
    start_time: DateTime<Utc>,
}

impl ProcessClock {
    /// Capture the current instant as the process start
    pub fn start() -> Self {
        Self {
            start_time: Utc::now(),
        }
    }

    #[cfg(test)]
    pub fn started_at(start_time: DateTime<Utc>) -> Self {
        Self { start_time }
    }

    /// Seconds elapsed since start, never negative
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs_at(Utc::now())
    }

    pub fn elapsed_secs_at(&self, now: DateTime<Utc>) -> f64 {
        let millis = (now - self.start_time).num_milliseconds().max(0);
        millis as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_elapsed_since_start() {
        let start = Utc::now();
        let clock = ProcessClock::started_at(start);
        let elapsed = clock.elapsed_secs_at(start + Duration::milliseconds(90_061_500));
        assert_eq!(elapsed, 90_061.5);
    }

    #[test]
    fn test_elapsed_clamps_clock_skew() {
        let start = Utc::now();
        let clock = ProcessClock::started_at(start);
        assert_eq!(clock.elapsed_secs_at(start - Duration::seconds(5)), 0.0);
    }
}
