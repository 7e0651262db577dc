//! Locked message store.
//!
//! [`MessageStore`] owns the log and the vote ledger behind one `RwLock`.
//! That single lock domain is what makes votes linearizable: the ledger check,
//! the counter update and the record update all happen under the same write
//! guard as appends.
//!
//! Readers only get [`Snapshot`] copies. The guard never leaves this module.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{
    ChatError, Direction, Environment, Identity, Message, MessageId, Snapshot, Tally, VoteLedger,
    VoteReceipt, log::ChatLog, message::validate_content,
};

/// Log and ledger, guarded together.
#[derive(Debug, Default)]
struct ChatState {
    log: ChatLog,
    ledger: VoteLedger,
}

/// Consistent view of the log and the ledger taken under one read guard.
///
/// Used by invariant checks to compare the counters embedded in messages with
/// what the ledger says they should be.
#[derive(Debug, Clone)]
pub struct Audit {
    /// Copy of the log.
    pub snapshot: Snapshot,
    /// Ledger totals per message id.
    pub tallies: HashMap<MessageId, Tally>,
}

/// Append-only chat log with embedded vote counters.
pub struct MessageStore<E: Environment> {
    env: E,
    state: RwLock<ChatState>,
}

impl<E: Environment> MessageStore<E> {
    /// Create an empty store.
    pub fn new(env: E) -> Self {
        Self { env, state: RwLock::new(ChatState::default()) }
    }

    /// Append a message.
    ///
    /// Non-system content must be 1 to [`crate::MAX_CONTENT_CHARS`]
    /// characters; anything else is rejected with
    /// [`ChatError::InvalidContent`] before the log is touched. System
    /// messages skip validation and get no id.
    pub fn append(
        &self,
        author: Identity,
        content: impl Into<String>,
        is_system: bool,
    ) -> Result<Message, ChatError> {
        let content = content.into();
        if !is_system {
            validate_content(&content)?;
        }

        let mut state = self.state.write();
        let timestamp_ms = state.log.next_timestamp(self.env.wall_clock_millis());
        let message = if is_system {
            Message::system(author, timestamp_ms, content)
        } else {
            Message::user(author, timestamp_ms, content)
        };
        state.log.push(message.clone());
        drop(state);

        tracing::debug!(
            author = %message.author,
            system = message.is_system,
            id = ?message.id.map(|id| id.short()),
            "message appended"
        );
        Ok(message)
    }

    /// Append a system message. Never fails.
    pub fn announce(&self, content: impl Into<String>) -> Message {
        let mut state = self.state.write();
        let timestamp_ms = state.log.next_timestamp(self.env.wall_clock_millis());
        let message = Message::system(Identity::anonymous(), timestamp_ms, content.into());
        state.log.push(message.clone());
        message
    }

    /// Independent copy of the whole log.
    pub fn snapshot(&self) -> Snapshot {
        self.state.read().log.snapshot()
    }

    /// Number of messages in the log.
    pub fn len(&self) -> usize {
        self.state.read().log.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of a single message.
    pub fn message(&self, id: &MessageId) -> Option<Message> {
        self.state.read().log.get(id).cloned()
    }

    /// Cast or flip `voter`'s vote on message `id`.
    ///
    /// See [`VoteLedger`] for the accounting rules. The whole
    /// read-modify-write runs under the store's write guard.
    pub fn vote(
        &self,
        voter: &Identity,
        id: &MessageId,
        direction: Direction,
    ) -> Result<VoteReceipt, ChatError> {
        let mut guard = self.state.write();
        let ChatState { log, ledger } = &mut *guard;
        let result = ledger.vote(log, voter.voter_key(), id, direction);
        drop(guard);

        match &result {
            Ok(receipt) => tracing::debug!(
                voter = %voter,
                id = %id.short(),
                %direction,
                flipped = receipt.previous.is_some(),
                "vote recorded"
            ),
            // Callers pick the level for unexpected errors
            Err(err) => tracing::debug!(voter = %voter, %err, "vote rejected"),
        }
        result
    }

    /// Recorded direction of `voter` on message `id`.
    pub fn direction_of(&self, voter: &Identity, id: &MessageId) -> Option<Direction> {
        self.state.read().ledger.direction_of(&voter.voter_key(), id)
    }

    /// Log copy and ledger totals taken atomically.
    pub fn audit(&self) -> Audit {
        let state = self.state.read();
        Audit { snapshot: state.log.snapshot(), tallies: state.ledger.tallies() }
    }
}
