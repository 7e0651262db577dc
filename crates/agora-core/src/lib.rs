//! Shared chat state for Agora.
//!
//! Everything that is shared across connections lives here: the append-only
//! message log, the per-voter vote ledger, and the presence counter. None of
//! it knows about terminals, sockets, or keystrokes.
//!
//! # Components
//!
//! - [`MessageStore`]: append-only log plus [`VoteLedger`], one lock domain
//! - [`PresenceCounter`]: number of connected clients, independent atomic
//! - [`ChatService`]: the facade sessions talk to
//! - [`Environment`]: time source, swapped for a virtual clock in simulation
//!
//! # Locking
//!
//! The log and the ledger sit behind a single `RwLock` owned by
//! [`MessageStore`]. Appends and votes take the write half; snapshots and
//! length polls take the read half and copy out before returning. No guard
//! ever escapes the store, so callers cannot hold the lock across an await.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
pub mod env;
mod error;
mod identity;
mod ledger;
mod log;
mod message;
mod presence;
mod service;
mod snapshot;
mod store;

pub use config::ChatConfig;
pub use env::Environment;
pub use error::ChatError;
pub use identity::{Identity, VoterKey};
pub use ledger::{Direction, Tally, VoteLedger, VoteReceipt};
pub use message::{MAX_CONTENT_CHARS, Message, MessageId};
pub use presence::PresenceCounter;
pub use service::ChatService;
pub use snapshot::Snapshot;
pub use store::{Audit, MessageStore};
