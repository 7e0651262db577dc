//! Chat service facade.
//!
//! Bundles everything sessions share: the message store (log + ledger) and
//! the presence counter. One instance per process, handed to every session
//! behind an `Arc`.

use crate::{
    ChatConfig, ChatError, Direction, Environment, Identity, Message, MessageId, MessageStore,
    PresenceCounter, VoteReceipt,
};

/// Shared chat state for all connections.
pub struct ChatService<E: Environment> {
    env: E,
    config: ChatConfig,
    store: MessageStore<E>,
    presence: PresenceCounter,
}

impl<E: Environment> ChatService<E> {
    /// Create the service, appending the configured welcome message.
    pub fn new(env: E, config: ChatConfig) -> Self {
        let store = MessageStore::new(env.clone());
        if let Some(welcome) = &config.welcome_message {
            store.announce(welcome.clone());
        }
        Self { env, config, store, presence: PresenceCounter::new() }
    }

    /// Environment the service was built with.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Service configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Message log and vote ledger.
    pub fn store(&self) -> &MessageStore<E> {
        &self.store
    }

    /// Connected-client counter.
    pub fn presence(&self) -> &PresenceCounter {
        &self.presence
    }

    /// Register a new connection. Returns the online count.
    ///
    /// The join announcement (if enabled) lands in the log before presence is
    /// bumped.
    pub fn connect(&self, identity: &Identity) -> usize {
        if self.config.announce_joins {
            self.store.announce(format!("{} has joined", identity.display_name()));
        }
        let online = self.presence.increment();
        tracing::info!(user = %identity, online, "client connected");
        online
    }

    /// Unregister a connection. Returns the online count.
    pub fn disconnect(&self, identity: &Identity) -> usize {
        let online = self.presence.decrement();
        tracing::info!(user = %identity, online, "client disconnected");
        online
    }

    /// Post a user message.
    pub fn post(&self, author: &Identity, content: &str) -> Result<Message, ChatError> {
        self.store.append(author.clone(), content, false)
    }

    /// Vote on a message as `voter`.
    pub fn vote(
        &self,
        voter: &Identity,
        id: &MessageId,
        direction: Direction,
    ) -> Result<VoteReceipt, ChatError> {
        self.store.vote(voter, id, direction)
    }
}
