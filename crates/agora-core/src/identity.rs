//! Connection identities.
//!
//! The transport layer authenticates (or doesn't) and hands us an
//! [`Identity`]. We never inspect credentials ourselves; the optional
//! fingerprint is an opaque string.

use std::fmt;

use sha2::{Digest, Sha256};

/// Display name used for system messages and unnamed connections.
const ANONYMOUS: &str = "Anonymous";

/// Per-connection principal: display name plus optional credential
/// fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    display_name: String,
    fingerprint: Option<String>,
}

impl Identity {
    /// Identity with a display name and no credential.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self { display_name: display_name.into(), fingerprint: None }
    }

    /// Identity used as the author of system messages.
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS)
    }

    /// Attach an opaque credential fingerprint supplied by the transport.
    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Attach a fingerprint derived from raw public key bytes (SHA-256, hex).
    #[must_use]
    pub fn with_public_key(self, key: &[u8]) -> Self {
        let digest = Sha256::digest(key);
        self.with_fingerprint(hex::encode(digest))
    }

    /// Human-chosen display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Credential fingerprint. `None` for unauthenticated connections.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Key used to deduplicate votes.
    ///
    /// A fingerprint wins when present. Unauthenticated connections fall back
    /// to the display name, so two anonymous clients sharing a name share one
    /// set of votes.
    pub fn voter_key(&self) -> VoterKey {
        match &self.fingerprint {
            Some(fingerprint) => VoterKey::Fingerprint(fingerprint.clone()),
            None => VoterKey::DisplayName(self.display_name.clone()),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// Vote deduplication key derived from an [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VoterKey {
    /// Credential fingerprint of an authenticated connection.
    Fingerprint(String),
    /// Display name of an unauthenticated connection.
    DisplayName(String),
}
