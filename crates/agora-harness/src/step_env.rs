//! Stepping environment for synchronous tests.
//!
//! [`StepEnv`] needs no runtime: every wall-clock reading advances the clock
//! by a fixed step and `sleep` completes immediately. Clones share the clock.

use std::{
    future::{Future, ready},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use agora_core::Environment;
use tokio::time::Instant;

use crate::sim_env::DEFAULT_EPOCH_MILLIS;

/// Environment whose wall clock moves a fixed step per reading.
#[derive(Debug, Clone)]
pub struct StepEnv {
    next_millis: Arc<AtomicU64>,
    step_millis: u64,
}

impl StepEnv {
    /// Clock starting at [`DEFAULT_EPOCH_MILLIS`], one millisecond per reading.
    pub fn new() -> Self {
        Self::with_step(1)
    }

    /// Clock starting at [`DEFAULT_EPOCH_MILLIS`], `step_millis` per reading.
    ///
    /// A step of zero freezes the clock.
    pub fn with_step(step_millis: u64) -> Self {
        Self { next_millis: Arc::new(AtomicU64::new(DEFAULT_EPOCH_MILLIS)), step_millis }
    }
}

impl Default for StepEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for StepEnv {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
        ready(())
    }

    fn wall_clock_millis(&self) -> u64 {
        self.next_millis.fetch_add(self.step_millis, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_advance_by_step_and_clones_share_the_clock() {
        let env = StepEnv::with_step(1000);
        let clone = env.clone();

        assert_eq!(env.wall_clock_millis(), DEFAULT_EPOCH_MILLIS);
        assert_eq!(clone.wall_clock_millis(), DEFAULT_EPOCH_MILLIS + 1000);
        assert_eq!(env.wall_clock_millis(), DEFAULT_EPOCH_MILLIS + 2000);
    }

    #[test]
    fn zero_step_freezes_the_clock() {
        let env = StepEnv::with_step(0);
        assert_eq!(env.wall_clock_millis(), env.wall_clock_millis());
    }
}
