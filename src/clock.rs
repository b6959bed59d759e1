//! Wall-clock tick source for the game loop.
//!
//! The session clock only advances by what it is told. This turns real
//! [`Instant`]s into elapsed milliseconds so a match lasts its configured
//! duration no matter how long rendering or input polling takes.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TickClock {
    interval: Duration,
    last: Instant,
}

impl TickClock {
    pub fn new(interval_ms: u32, now: Instant) -> Self {
        Self {
            interval: Duration::from_millis(u64::from(interval_ms.max(1))),
            last: now,
        }
    }

    /// Time left before the next tick is due.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last))
    }

    /// Elapsed milliseconds since the previous tick, once at least one
    /// interval has passed.
    ///
    /// Sub-millisecond remainders carry over to the next tick.
    pub fn poll(&mut self, now: Instant) -> Option<u32> {
        let elapsed = now.saturating_duration_since(self.last);
        if elapsed < self.interval {
            return None;
        }
        let ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
        self.last += Duration::from_millis(u64::from(ms));
        Some(ms)
    }

    /// Restart counting from `now`.
    pub fn reset(&mut self, now: Instant) {
        self.last = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_poll_waits_for_interval() {
        let t0 = Instant::now();
        let mut clock = TickClock::new(33, t0);
        assert_eq!(clock.poll(t0 + ms(10)), None);
        assert_eq!(clock.timeout(t0 + ms(10)), ms(23));
        assert_eq!(clock.poll(t0 + ms(33)), Some(33));
    }

    #[test]
    fn test_poll_reports_real_elapsed_time() {
        let t0 = Instant::now();
        let mut clock = TickClock::new(33, t0);

        // Slow frames are credited in full rather than one interval each.
        assert_eq!(clock.poll(t0 + ms(80)), Some(80));
        assert_eq!(clock.poll(t0 + ms(200)), Some(120));
        assert_eq!(clock.timeout(t0 + ms(250)), Duration::ZERO);
    }

    #[test]
    fn test_ticks_sum_to_wall_time() {
        let t0 = Instant::now();
        let mut clock = TickClock::new(33, t0);
        let mut total = 0u32;
        let mut now = t0;
        for step_us in [33_400, 41_900, 35_250, 60_010, 33_700] {
            now += Duration::from_micros(step_us);
            total += clock.poll(now).unwrap_or(0);
        }
        // 204.26 ms of wall time; only the final fraction is still pending.
        assert_eq!(total, 204);
    }

    #[test]
    fn test_reset_restarts_interval() {
        let t0 = Instant::now();
        let mut clock = TickClock::new(33, t0);
        clock.reset(t0 + ms(100));
        assert_eq!(clock.poll(t0 + ms(120)), None);
        assert_eq!(clock.poll(t0 + ms(140)), Some(40));
    }
}
