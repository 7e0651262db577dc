//! Periodic refresh timer.

use std::time::Duration;

use agora_core::Environment;

/// Emits a refresh every `interval`, on a fixed deadline grid.
///
/// Deadlines advance by whole intervals, so a busy input stream cannot
/// postpone refreshes: losing a race to input does not reset the clock.
pub struct RefreshScheduler<E: Environment> {
    env: E,
    interval: Duration,
    next_due: E::Instant,
}

impl<E: Environment> RefreshScheduler<E> {
    /// Start a scheduler whose first tick is one interval from now.
    ///
    /// Intervals below one millisecond are raised to one millisecond.
    pub fn new(env: E, interval: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        let next_due = env.now() + interval;
        Self { env, interval, next_due }
    }

    /// Wait for the next deadline.
    ///
    /// Cancel safe: the deadline only moves once the wait completes. Missed
    /// deadlines collapse into a single tick.
    pub async fn tick(&mut self) {
        let now = self.env.now();
        if now < self.next_due {
            self.env.sleep(self.next_due - now).await;
        }

        let now = self.env.now();
        while self.next_due <= now {
            self.next_due = self.next_due + self.interval;
        }
    }
}
