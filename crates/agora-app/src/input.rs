//! Terminal-agnostic keyboard input.
//!
//! [`InputState`] is the line editor for input mode and the keymap for
//! selection mode. It turns [`KeyInput`] into [`SessionEvent`]s, so drivers
//! only have to decode their transport into keys.

use agora_core::MAX_CONTENT_CHARS;

use crate::{Mode, SessionEvent};

/// Keyboard input abstraction.
///
/// Decouples session logic from terminal libraries, enabling deterministic
/// simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Tab key (toggle mode).
    Tab,
    /// Escape key (quit).
    Esc,
    /// Ctrl+C (quit).
    Interrupt,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// Result of feeding one key to [`InputState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key maps to a session event.
    Event(SessionEvent),
    /// The edit buffer changed; re-render the prompt.
    Edited,
    /// Nothing happened.
    Ignored,
}

/// Edit buffer with a character cursor.
///
/// The buffer never holds more than [`MAX_CONTENT_CHARS`] characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    buffer: String,
    /// Cursor position in characters, `0..=buffer.chars().count()`.
    cursor: usize,
}

impl InputState {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current buffer contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Feed a key in the given mode.
    pub fn handle_key(&mut self, key: KeyInput, mode: Mode) -> KeyOutcome {
        match key {
            KeyInput::Tab => return KeyOutcome::Event(SessionEvent::ToggleMode),
            KeyInput::Esc | KeyInput::Interrupt => {
                return KeyOutcome::Event(SessionEvent::Disconnect);
            },
            _ => {},
        }

        match mode {
            Mode::Input => self.edit(key),
            Mode::Selection => Self::select(key),
        }
    }

    fn select(key: KeyInput) -> KeyOutcome {
        let event = match key {
            KeyInput::Up => SessionEvent::NavigateUp,
            KeyInput::Down => SessionEvent::NavigateDown,
            KeyInput::Char('u' | 'U') => SessionEvent::Upvote,
            KeyInput::Char('d' | 'D') => SessionEvent::Downvote,
            _ => return KeyOutcome::Ignored,
        };
        KeyOutcome::Event(event)
    }

    fn edit(&mut self, key: KeyInput) -> KeyOutcome {
        let len = self.buffer.chars().count();
        match key {
            KeyInput::Enter => {
                self.cursor = 0;
                return KeyOutcome::Event(SessionEvent::Submit(std::mem::take(&mut self.buffer)));
            },
            KeyInput::Char(c) if !c.is_control() && len < MAX_CONTENT_CHARS => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
            },
            KeyInput::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
            },
            KeyInput::Delete if self.cursor < len => {
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
            },
            KeyInput::Left if self.cursor > 0 => self.cursor -= 1,
            KeyInput::Right if self.cursor < len => self.cursor += 1,
            KeyInput::Home if self.cursor > 0 => self.cursor = 0,
            KeyInput::End if self.cursor < len => self.cursor = len,
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Edited
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}
