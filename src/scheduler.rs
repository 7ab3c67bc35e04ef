//! Elapsed-time cadence for the cooperative loop.
//!
//! Every periodic job in the firmware (environment sampling, light
//! sampling, light publishing, LED blink, buzzer beep, telemetry) runs off
//! the same polling pattern: compare the monotonic clock against the last
//! time the job ran.  Nothing is scheduled ahead of time and nothing can be
//! cancelled; a job whose period elapses while the loop is busy simply runs
//! on the next poll.
//!
//! ```text
//!   loop ──▶ Interval::poll(now, period) ──▶ true?  ──▶ run job
//!                     │                        │
//!                     └──── last = now ◀───────┘
//! ```
//!
//! The period is passed on every poll instead of being stored, because
//! some periods (light sampling / publishing) are changed at runtime by
//! the remote configuration channel.

/// Last-run bookkeeping for one periodic job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    last_ms: Option<u64>,
}

impl Default for Interval {
    fn default() -> Self {
        Self::new()
    }
}

impl Interval {
    /// An interval that fires on its very first poll.
    pub const fn new() -> Self {
        Self { last_ms: None }
    }

    /// An interval whose first period starts at `now_ms`.
    pub const fn starting_at(now_ms: u64) -> Self {
        Self {
            last_ms: Some(now_ms),
        }
    }

    /// Returns `true` (and restarts the period) once at least `period_ms`
    /// has elapsed since the last time this returned `true`.
    pub fn poll(&mut self, now_ms: u64, period_ms: u64) -> bool {
        let due = match self.last_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= period_ms,
        };
        if due {
            self.last_ms = Some(now_ms);
        }
        due
    }

    /// Restart the period at `now_ms` without firing.
    pub fn restart(&mut self, now_ms: u64) {
        self.last_ms = Some(now_ms);
    }

    /// Time of the last firing, if any.
    pub fn last_ms(&self) -> Option<u64> {
        self.last_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fires_immediately() {
        let mut iv = Interval::new();
        assert!(iv.poll(0, 2000));
        assert!(!iv.poll(1999, 2000));
        assert!(iv.poll(2000, 2000));
    }

    #[test]
    fn starting_at_waits_one_period() {
        let mut iv = Interval::starting_at(1000);
        assert!(!iv.poll(1000, 500));
        assert!(!iv.poll(1499, 500));
        assert!(iv.poll(1500, 500));
        assert_eq!(iv.last_ms(), Some(1500));
    }

    #[test]
    fn late_poll_restarts_from_poll_time() {
        let mut iv = Interval::starting_at(0);
        // Loop stalled for 3 periods: fires once, not three times.
        assert!(iv.poll(1700, 500));
        assert!(!iv.poll(2100, 500));
        assert!(iv.poll(2200, 500));
    }

    #[test]
    fn zero_period_fires_every_poll() {
        let mut iv = Interval::new();
        assert!(iv.poll(10, 0));
        assert!(iv.poll(10, 0));
    }

    #[test]
    fn restart_defers_next_fire() {
        let mut iv = Interval::new();
        iv.restart(100);
        assert!(!iv.poll(150, 100));
        assert!(iv.poll(200, 100));
    }
}
