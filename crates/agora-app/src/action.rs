//! Session side-effects.
//!
//! This module defines the [`SessionAction`] enum, the instructions produced
//! by the [`crate::SessionController`] for the runtime to execute.

/// Actions produced by the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Render the current view.
    Render,

    /// The session is over; stop the runtime.
    Quit,
}
