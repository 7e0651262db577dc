//! Per-voter vote bookkeeping.
//!
//! The ledger remembers which direction each voter picked on each message and
//! keeps the counters embedded in the log in step with it. It has no lock of
//! its own: [`crate::MessageStore`] holds it next to the log under one write
//! guard, so the record update and the counter update land together.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use crate::{ChatError, MessageId, VoterKey, log::ChatLog};

/// Polarity of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Up vote.
    Up,
    /// Down vote.
    Down,
}

impl Direction {
    /// Counter deltas `(up, down)` this direction contributes.
    fn deltas(self) -> (i32, i32) {
        match self {
            Self::Up => (1, 0),
            Self::Down => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Result of a successful vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteReceipt {
    /// Direction now recorded.
    pub direction: Direction,
    /// Direction replaced by this vote. `None` for a first vote.
    pub previous: Option<Direction>,
    /// Message up votes after the vote.
    pub upvotes: u32,
    /// Message down votes after the vote.
    pub downvotes: u32,
}

/// Active vote totals for one message, computed from the ledger alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Voters whose recorded direction is up.
    pub up: u32,
    /// Voters whose recorded direction is down.
    pub down: u32,
}

/// Voter → message → direction.
#[derive(Debug, Default)]
pub struct VoteLedger {
    records: BTreeMap<VoterKey, HashMap<MessageId, Direction>>,
}

impl VoteLedger {
    /// Recorded direction for a voter on a message.
    pub fn direction_of(&self, voter: &VoterKey, id: &MessageId) -> Option<Direction> {
        self.records.get(voter).and_then(|votes| votes.get(id)).copied()
    }

    /// Number of voters with at least one recorded vote.
    pub fn voter_count(&self) -> usize {
        self.records.len()
    }

    /// Per-message totals of every active vote.
    pub fn tallies(&self) -> HashMap<MessageId, Tally> {
        let mut tallies: HashMap<MessageId, Tally> = HashMap::new();
        for (id, direction) in self.records.values().flat_map(|votes| votes.iter()) {
            let tally = tallies.entry(*id).or_default();
            match direction {
                Direction::Up => tally.up += 1,
                Direction::Down => tally.down += 1,
            }
        }
        tallies
    }

    /// Cast or flip a vote, adjusting the log's counters.
    ///
    /// Same direction as the current record → [`ChatError::DuplicateVote`].
    /// Opposite direction → the old contribution is withdrawn and the new one
    /// applied in a single counter mutation. Nothing is recorded when the id
    /// is unknown.
    pub(crate) fn vote(
        &mut self,
        log: &mut ChatLog,
        voter: VoterKey,
        id: &MessageId,
        direction: Direction,
    ) -> Result<VoteReceipt, ChatError> {
        let previous = self.direction_of(&voter, id);
        if previous == Some(direction) {
            return Err(ChatError::DuplicateVote { direction });
        }

        let (mut up, mut down) = direction.deltas();
        if let Some(prev) = previous {
            let (prev_up, prev_down) = prev.deltas();
            up -= prev_up;
            down -= prev_down;
        }

        let (upvotes, downvotes) =
            log.mutate_counters(id, up, down).ok_or(ChatError::MessageNotFound { id: *id })?;

        self.records.entry(voter).or_default().insert(*id, direction);
        Ok(VoteReceipt { direction, previous, upvotes, downvotes })
    }
}
