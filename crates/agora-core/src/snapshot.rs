//! Point-in-time copies of the chat log.

use std::ops::Deref;

use crate::{Message, MessageId};

/// Independent copy of the log at one instant.
///
/// Owned outright by the reader, so it can be rendered or navigated without
/// touching the store's lock. Navigation helpers here only ever return
/// indices of votable (non-system) messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    messages: Vec<Message>,
}

impl Snapshot {
    /// Wrap an owned list of messages.
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Index of the newest votable message. `None` if there is none.
    pub fn latest_votable(&self) -> Option<usize> {
        self.messages.iter().rposition(Message::is_votable)
    }

    /// Nearest votable message strictly before `index`.
    ///
    /// `None` at the top of the log, including when only system messages lie
    /// above.
    pub fn prev_votable(&self, index: usize) -> Option<usize> {
        let end = index.min(self.messages.len());
        self.messages[..end].iter().rposition(Message::is_votable)
    }

    /// Nearest votable message strictly after `index`.
    pub fn next_votable(&self, index: usize) -> Option<usize> {
        let start = index.saturating_add(1);
        self.messages
            .get(start..)?
            .iter()
            .position(Message::is_votable)
            .map(|offset| start + offset)
    }

    /// Id of the message at `index`, if it is votable.
    pub fn votable_id(&self, index: usize) -> Option<MessageId> {
        self.messages.get(index).filter(|m| m.is_votable()).and_then(|m| m.id)
    }

    /// Number of non-system messages.
    pub fn votable_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_votable()).count()
    }
}

impl Deref for Snapshot {
    type Target = [Message];

    fn deref(&self) -> &Self::Target {
        &self.messages
    }
}
