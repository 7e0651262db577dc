//! The live, unlocked chat log.
//!
//! Only [`crate::MessageStore`] ever holds one, always behind its lock.

use std::collections::HashMap;

use crate::{Message, MessageId, Snapshot};

/// Append-only message sequence with an id → position index.
#[derive(Debug, Default)]
pub(crate) struct ChatLog {
    messages: Vec<Message>,
    positions: HashMap<MessageId, usize>,
    last_timestamp_ms: Option<u64>,
}

impl ChatLog {
    /// Timestamp for the next entry.
    ///
    /// Strictly greater than every timestamp already in the log, even if the
    /// wall clock stalls or steps backwards. This keeps (author, timestamp,
    /// content) unique, and with it every message id.
    pub(crate) fn next_timestamp(&self, wall_clock_ms: u64) -> u64 {
        match self.last_timestamp_ms {
            Some(last) if wall_clock_ms <= last => last.saturating_add(1),
            _ => wall_clock_ms,
        }
    }

    /// Append a message. The caller picked its timestamp via
    /// [`Self::next_timestamp`].
    pub(crate) fn push(&mut self, message: Message) {
        if let Some(id) = message.id {
            self.positions.insert(id, self.messages.len());
        }
        self.last_timestamp_ms = Some(message.timestamp_ms);
        self.messages.push(message);
    }

    pub(crate) fn len(&self) -> usize {
        self.messages.len()
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.messages.clone())
    }

    pub(crate) fn get(&self, id: &MessageId) -> Option<&Message> {
        self.positions.get(id).and_then(|&pos| self.messages.get(pos))
    }

    /// Apply vote deltas to a message's counters.
    ///
    /// Counters saturate at zero. Returns the new `(upvotes, downvotes)`, or
    /// `None` if no message has this id.
    pub(crate) fn mutate_counters(
        &mut self,
        id: &MessageId,
        up_delta: i32,
        down_delta: i32,
    ) -> Option<(u32, u32)> {
        let pos = *self.positions.get(id)?;
        let message = self.messages.get_mut(pos)?;
        message.upvotes = apply_delta(message.upvotes, up_delta);
        message.downvotes = apply_delta(message.downvotes, down_delta);
        Some((message.upvotes, message.downvotes))
    }
}

fn apply_delta(counter: u32, delta: i32) -> u32 {
    if delta.is_negative() {
        counter.saturating_sub(delta.unsigned_abs())
    } else {
        counter.saturating_add(delta.unsigned_abs())
    }
}
