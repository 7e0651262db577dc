//! Observable session state.
//!
//! These types are the view model handed to renderers. They are plain data:
//! no styling, no layout, no formatted strings.

use agora_core::{Identity, Message, Snapshot};

/// Interaction mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Typing a message.
    #[default]
    Input,
    /// Browsing messages to vote on them.
    Selection,
}

/// Per-connection interaction state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientView {
    /// Current mode.
    pub mode: Mode,
    /// Index of the highlighted message in the session's snapshot.
    ///
    /// Always a votable message when `Some`. `None` when the log holds no
    /// votable message yet.
    pub selected_index: Option<usize>,
    /// Log length at the last refresh.
    pub last_seen_count: usize,
}

/// Terminal details reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalInfo {
    /// Terminal type name (e.g. `xterm-256color`).
    pub term: String,
    /// Viewport width in columns.
    pub width: u16,
    /// Viewport height in rows.
    pub height: u16,
}

impl Default for TerminalInfo {
    fn default() -> Self {
        Self { term: "unknown".to_string(), width: 80, height: 24 }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    /// Viewer identity.
    pub identity: &'a Identity,
    /// Messages as of the session's last refresh.
    pub snapshot: &'a Snapshot,
    /// Mode and selection.
    pub client: &'a ClientView,
    /// Online users at render time.
    pub presence: usize,
    /// One-line notice from the last failed operation.
    pub notice: Option<&'a str>,
    /// Terminal type and viewport.
    pub terminal: &'a TerminalInfo,
}

impl SessionView<'_> {
    /// The highlighted message, if in selection mode with a selection.
    pub fn selected(&self) -> Option<&Message> {
        match self.client.mode {
            Mode::Selection => self.client.selected_index.and_then(|i| self.snapshot.get(i)),
            Mode::Input => None,
        }
    }
}
