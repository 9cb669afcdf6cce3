//! Fixed-period scheduling for the update tick.

use std::thread;
use std::time::{Duration, Instant};

/// Paces a loop at a fixed period against a monotonic clock.
///
/// Deadlines accumulate from the previous deadline rather than from wake-up
/// time, so sleep jitter does not drift the schedule. If a tick overruns its
/// period entirely (for example while the audio sink is blocking), the next
/// deadline is rebased to now instead of letting missed ticks pile up.
pub struct TickClock {
    period: Duration,
    next: Instant,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    /// Sleep until the next deadline, then schedule the one after it.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
            self.next += self.period;
        } else {
            // Overran the period; rebase instead of bursting to catch up
            self.next = now + self.period;
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
