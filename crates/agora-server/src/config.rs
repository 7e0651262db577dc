//! Server configuration.

use agora_core::ChatConfig;

/// Default listen address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:23234";

/// Longest accepted input line in bytes, including the hello line.
pub const DEFAULT_MAX_LINE_BYTES: usize = 4096;

/// Server configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (e.g., "0.0.0.0:23234")
    pub bind_address: String,
    /// Longest accepted input line in bytes
    pub max_line_bytes: usize,
    /// Shared chat behavior (refresh interval, announcements)
    pub chat: ChatConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            chat: ChatConfig::default(),
        }
    }
}
