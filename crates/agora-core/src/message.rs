//! Chat messages.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::{ChatError, Identity};

/// Maximum content length of a non-system message, in characters.
pub const MAX_CONTENT_CHARS: usize = 280;

/// Stable message id: SHA-256 over author, timestamp and content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId([u8; 32]);

impl MessageId {
    /// Derive the id for a message.
    ///
    /// Every field is length-prefixed so that ("ab", "c") and ("a", "bc")
    /// hash differently.
    pub fn derive(author: &Identity, timestamp_ms: u64, content: &str) -> Self {
        let mut hasher = Sha256::new();
        hash_field(&mut hasher, author.display_name().as_bytes());
        hash_field(&mut hasher, author.fingerprint().unwrap_or_default().as_bytes());
        hasher.update(timestamp_ms.to_be_bytes());
        hash_field(&mut hasher, content.as_bytes());
        Self(hasher.finalize().into())
    }

    /// First eight hex characters, for compact display.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

fn hash_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

/// A single entry in the chat log.
///
/// Immutable once appended, except for the two vote counters which only the
/// vote ledger touches. Readers always hold copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Content-derived id. `None` for system messages.
    pub id: Option<MessageId>,
    /// Who wrote it. Service announcements use [`Identity::anonymous`].
    pub author: Identity,
    /// Milliseconds since the Unix epoch, strictly increasing along the log.
    pub timestamp_ms: u64,
    /// Plain text body.
    pub content: String,
    /// Number of active up votes.
    pub upvotes: u32,
    /// Number of active down votes.
    pub downvotes: u32,
    /// System messages are not votable and not selectable.
    pub is_system: bool,
}

impl Message {
    /// Build a user message, assigning its id.
    pub(crate) fn user(author: Identity, timestamp_ms: u64, content: String) -> Self {
        let id = MessageId::derive(&author, timestamp_ms, &content);
        Self {
            id: Some(id),
            author,
            timestamp_ms,
            content,
            upvotes: 0,
            downvotes: 0,
            is_system: false,
        }
    }

    /// Build a system message. System messages carry no id.
    pub(crate) fn system(author: Identity, timestamp_ms: u64, content: String) -> Self {
        Self {
            id: None,
            author,
            timestamp_ms,
            content,
            upvotes: 0,
            downvotes: 0,
            is_system: true,
        }
    }

    /// Whether this message can be selected and voted on.
    pub fn is_votable(&self) -> bool {
        !self.is_system && self.id.is_some()
    }
}

/// Check user content against the length rules.
pub(crate) fn validate_content(content: &str) -> Result<(), ChatError> {
    let len = content.chars().count();
    if len == 0 || len > MAX_CONTENT_CHARS {
        return Err(ChatError::InvalidContent { len, max: MAX_CONTENT_CHARS });
    }
    Ok(())
}
