//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the session runtime from specific
//! transports. Each frontend implements the trait, while the generic
//! [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use crate::{Mode, SessionEvent, SessionView};

/// Abstracts I/O operations for the session runtime.
///
/// # Implementations
///
/// - **Line transport**: newline-delimited text over TCP
/// - **Simulation**: scripted events over a channel, captured frames
///
/// # Cancel safety
///
/// [`next_event`](Driver::next_event) is raced against refresh ticks and may
/// be dropped before completing. It MUST NOT lose input when that happens.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next session event.
    ///
    /// `mode` is the session's current mode, for drivers that decode keys
    /// differently per mode. Returns `None` when the input side is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the transport fails.
    fn next_event(
        &mut self,
        mode: Mode,
    ) -> impl Future<Output = Result<Option<SessionEvent>, Self::Error>> + Send;

    /// Render one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the transport fails.
    fn render(&mut self, view: &SessionView<'_>) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Stop the connection and clean up resources.
    fn stop(&mut self);
}
