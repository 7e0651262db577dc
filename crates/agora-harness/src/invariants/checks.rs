//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::HashSet;

use agora_core::{Message, Tally};

use super::{Invariant, InvariantResult, SystemSnapshot};

/// Embedded counters must equal the ledger's totals.
///
/// For every votable message, `upvotes` and `downvotes` equal the number of
/// voters whose recorded direction is up and down. The ledger holds no entry
/// for a message absent from the log.
pub struct CountersMatchLedger;

impl Invariant for CountersMatchLedger {
    fn name(&self) -> &'static str {
        "counters_match_ledger"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        let Some(audit) = &state.audit else {
            return Ok(());
        };

        let mut seen = HashSet::new();
        for message in audit.snapshot.iter() {
            let Some(id) = message.id else {
                if message.upvotes != 0 || message.downvotes != 0 {
                    return Err(self.violation(format!(
                        "system message {:?} carries votes {}/{}",
                        message.content, message.upvotes, message.downvotes
                    )));
                }
                continue;
            };
            seen.insert(id);

            let tally = audit.tallies.get(&id).copied().unwrap_or_default();
            let embedded = Tally { up: message.upvotes, down: message.downvotes };
            if embedded != tally {
                return Err(self.violation(format!(
                    "message {}: counters {}/{} but ledger says {}/{}",
                    id.short(),
                    embedded.up,
                    embedded.down,
                    tally.up,
                    tally.down
                )));
            }
        }

        if let Some(orphan) = audit.tallies.keys().find(|id| !seen.contains(*id)) {
            return Err(self.violation(format!("ledger votes on unknown message {}", orphan.short())));
        }
        Ok(())
    }
}

/// A selection must point inside the session's snapshot.
pub struct SelectionInBounds;

impl Invariant for SelectionInBounds {
    fn name(&self) -> &'static str {
        "selection_in_bounds"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            if let Some(index) = client.client.selected_index
                && index >= client.snapshot.len()
            {
                return Err(self.violation(format!(
                    "client {}: selected index {} but snapshot has {} messages",
                    client.name,
                    index,
                    client.snapshot.len()
                )));
            }
        }
        Ok(())
    }
}

/// A selection never rests on a system message.
///
/// Also requires that a session with votable messages in view has a
/// selection at all once it is in selection mode.
pub struct SelectionOnVotable;

impl Invariant for SelectionOnVotable {
    fn name(&self) -> &'static str {
        "selection_on_votable"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            match client.client.selected_index {
                Some(index) => {
                    if client.snapshot.get(index).is_some_and(|m| !m.is_votable()) {
                        return Err(self.violation(format!(
                            "client {}: selection {} is a system message",
                            client.name, index
                        )));
                    }
                },
                None => {
                    if client.client.mode == agora_app::Mode::Selection
                        && client.snapshot.votable_count() > 0
                    {
                        return Err(self.violation(format!(
                            "client {}: selection mode with votable messages but no selection",
                            client.name
                        )));
                    }
                },
            }
        }
        Ok(())
    }
}

/// Timestamps strictly increase along every log copy, and ids never repeat.
pub struct LogMonotonic;

impl LogMonotonic {
    fn check_log(&self, owner: &str, messages: &[Message]) -> InvariantResult {
        for pair in messages.windows(2) {
            if pair[1].timestamp_ms <= pair[0].timestamp_ms {
                return Err(self.violation(format!(
                    "{owner}: timestamp {} follows {}",
                    pair[1].timestamp_ms, pair[0].timestamp_ms
                )));
            }
        }

        let mut ids = HashSet::new();
        if let Some(dup) = messages.iter().filter_map(|m| m.id).find(|id| !ids.insert(*id)) {
            return Err(self.violation(format!("{owner}: duplicate id {}", dup.short())));
        }
        Ok(())
    }
}

impl Invariant for LogMonotonic {
    fn name(&self) -> &'static str {
        "log_monotonic"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        if let Some(audit) = &state.audit {
            self.check_log("store", &audit.snapshot)?;
        }
        for client in &state.clients {
            self.check_log(&client.name, &client.snapshot)?;
        }
        Ok(())
    }
}

/// Presence equals the number of live sessions.
///
/// Only meaningful for snapshots built by [`SystemSnapshot::capture`] over
/// every session sharing the service.
pub struct PresenceMatchesSessions;

impl Invariant for PresenceMatchesSessions {
    fn name(&self) -> &'static str {
        "presence_matches_sessions"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        match state.presence {
            Some(presence) if presence != state.clients.len() => Err(self.violation(format!(
                "presence {} but {} live sessions",
                presence,
                state.clients.len()
            ))),
            _ => Ok(()),
        }
    }
}
