//! Server error types.

use thiserror::Error;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error (invalid bind address, etc.).
    ///
    /// These are fatal errors that prevent server startup. Fix configuration
    /// and restart.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport/network error (bind failure, accept failure, etc.).
    ///
    /// May be transient (network issues) or fatal (bind address in use).
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

/// Errors from a single connection's line transport.
#[derive(Debug, Error)]
pub enum LineDriverError {
    /// Socket read or write failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The client sent a line longer than the configured limit.
    #[error("line exceeds {max} bytes")]
    LineTooLong {
        /// Configured limit in bytes.
        max: usize,
    },

    /// The hello line was malformed.
    ///
    /// Fatal for that connection, but server can continue serving other
    /// clients.
    #[error("bad hello: {0}")]
    Handshake(String),
}
