//! Environment abstraction for deterministic testing.
//!
//! Decouples chat logic from system time. Production uses the OS clock and
//! tokio timers; simulation swaps in a virtual clock so refresh ticks and
//! message timestamps are reproducible.

use std::{
    future::Future,
    ops::{Add, Sub},
    time::Duration,
};

/// Abstract environment providing time and async sleeping.
///
/// Implementations MUST guarantee that `now()` never goes backwards.
/// `wall_clock_millis()` may jump (NTP adjustments); the message log copes
/// with that on its own.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Monotonic instant type.
    ///
    /// Production environments use `std::time::Instant`, simulation uses a
    /// virtual instant that only advances when the test says so.
    type Instant: Copy
        + Ord
        + Send
        + Sync
        + Sub<Output = Duration>
        + Add<Duration, Output = Self::Instant>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only runtime code awaits this; the chat state itself never sleeps.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Milliseconds since the Unix epoch, used for message timestamps.
    fn wall_clock_millis(&self) -> u64;
}
