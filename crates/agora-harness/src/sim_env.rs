//! Virtual-time environment.
//!
//! [`SimEnv`] reads tokio's clock. Under `#[tokio::test(start_paused = true)]`
//! that clock only moves when every task is idle or the test calls
//! `tokio::time::advance`, so refresh ticks fire at exact virtual instants.

use std::{future::Future, time::Duration};

use agora_core::Environment;
use tokio::time::Instant;

/// Wall-clock value at the simulation origin (2023-11-14T22:13:20Z).
pub const DEFAULT_EPOCH_MILLIS: u64 = 1_700_000_000_000;

/// Simulation environment backed by tokio's (pausable) clock.
#[derive(Debug, Clone, Copy)]
pub struct SimEnv {
    origin: Instant,
    epoch_millis: u64,
}

impl SimEnv {
    /// Environment whose wall clock starts at [`DEFAULT_EPOCH_MILLIS`].
    pub fn new() -> Self {
        Self::with_epoch(DEFAULT_EPOCH_MILLIS)
    }

    /// Environment whose wall clock starts at `epoch_millis`.
    pub fn with_epoch(epoch_millis: u64) -> Self {
        Self { origin: Instant::now(), epoch_millis }
    }

    /// Virtual time elapsed since the environment was created.
    pub fn elapsed(&self) -> Duration {
        Instant::now() - self.origin
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SimEnv {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn wall_clock_millis(&self) -> u64 {
        let elapsed = u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.epoch_millis.saturating_add(elapsed)
    }
}
