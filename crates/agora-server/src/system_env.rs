//! Production Environment implementation using system time.
//!
//! `SystemEnv` is the production implementation of the Environment trait.
//!
//! # Capabilities
//!
//! - Real monotonic time (`std::time::Instant`) that advances naturally
//! - Tokio async sleep for actual wall-clock delays
//! - Wall clock from `SystemTime`, which may jump; the message log keeps its
//!   timestamps increasing regardless

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use agora_core::Environment;

/// Production environment using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn wall_clock_millis(&self) -> u64 {
        // A clock before 1970 reads as the epoch
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}
