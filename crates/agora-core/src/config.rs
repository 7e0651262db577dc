//! Chat service configuration.

use std::time::Duration;

/// Default interval between refresh checks for each session.
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Tunables for a [`crate::ChatService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// How often each session polls the log for new messages.
    pub refresh_interval: Duration,
    /// System message appended once when the service starts. `None` skips it.
    pub welcome_message: Option<String>,
    /// Append a system message whenever a client connects.
    pub announce_joins: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            welcome_message: Some("Welcome to agora".to_string()),
            announce_joins: true,
        }
    }
}

impl ChatConfig {
    /// Configuration with no startup or join announcements.
    ///
    /// Tests use this to start from an empty log.
    pub fn quiet() -> Self {
        Self { welcome_message: None, announce_joins: false, ..Self::default() }
    }
}
