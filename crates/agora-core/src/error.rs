//! Chat error types.
//!
//! Every variant is local to the request that caused it. None of them tear
//! down a connection; sessions turn them into a one-line notice.

use thiserror::Error;

use crate::{Direction, MessageId};

/// Errors returned by chat state operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Message content is empty or longer than the limit.
    ///
    /// Rejected before the log is touched.
    #[error("message must be 1 to {max} characters, got {len}")]
    InvalidContent {
        /// Length of the rejected content, in characters.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// Voter already has this direction recorded for the message.
    #[error("you have already voted {direction} on this message")]
    DuplicateVote {
        /// The repeated direction.
        direction: Direction,
    },

    /// Vote referenced an id that is not in the log.
    ///
    /// Ids are never removed, so this means a caller fabricated or corrupted
    /// an id.
    #[error("message {id} not found")]
    MessageNotFound {
        /// The unknown id.
        id: MessageId,
    },
}

impl ChatError {
    /// Whether this error points at a logic bug rather than user input.
    ///
    /// Callers log these at `warn` instead of treating them as routine.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::MessageNotFound { .. })
    }
}
