//! Session input events.
//!
//! This module defines [`SessionEvent`], the full set of inputs that drive the
//! [`crate::SessionController`].
//!
//! Events come from two sources:
//! - The input layer, already abstracted away from raw keystrokes.
//! - The [`crate::RefreshScheduler`], which emits [`SessionEvent::RefreshTick`].

/// Events processed by the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Post a message (input mode only).
    Submit(String),

    /// Switch between input and selection mode.
    ToggleMode,

    /// Move the selection towards older messages.
    NavigateUp,

    /// Move the selection towards newer messages.
    NavigateDown,

    /// Up vote the selected message.
    Upvote,

    /// Down vote the selected message.
    Downvote,

    /// Viewport resize (columns, rows).
    Resize(u16, u16),

    /// Periodic check for new messages.
    RefreshTick,

    /// Connection ended.
    Disconnect,
}
