//! Agora production server.
//!
//! Serves the chat over a newline-delimited TCP transport, with Tokio for the
//! async runtime and system time.
//!
//! # Architecture
//!
//! This crate provides production "glue" around [`agora_app`]'s pure session
//! state machine. Every accepted connection gets its own
//! [`agora_app::Runtime`] driving a [`SessionController`] through a
//! [`LineDriver`]; all sessions share one [`ChatService`].
//!
//! # Components
//!
//! - [`Server`]: accept loop, one task per connection
//! - [`LineDriver`]: line transport implementing [`agora_app::Driver`]
//! - [`render_frame`]: plain-text renderer for session views
//! - [`SystemEnv`]: production environment (real time)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod error;
mod line;
mod render;
mod system_env;

use std::{net::SocketAddr, sync::Arc};

use agora_app::{Runtime, SessionController, TerminalInfo};
use agora_core::ChatService;
pub use config::{DEFAULT_BIND_ADDRESS, DEFAULT_MAX_LINE_BYTES, ServerConfig};
pub use error::{LineDriverError, ServerError};
pub use line::{GREETING, LineDriver, decode_line, parse_hello};
pub use render::{FRAME_HEADER, format_message, render_frame};
pub use system_env::SystemEnv;
use tokio::net::{TcpListener, TcpStream};

/// Production Agora server.
pub struct Server {
    listener: TcpListener,
    service: Arc<ChatService<SystemEnv>>,
    max_line_bytes: usize,
}

impl Server {
    /// Create the shared chat service and bind the listener.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
            ServerError::Config(format!("invalid bind address {:?}: {e}", config.bind_address))
        })?;
        if config.max_line_bytes == 0 {
            return Err(ServerError::Config("max line length must be positive".to_string()));
        }

        let listener = TcpListener::bind(addr).await?;
        let service = Arc::new(ChatService::new(SystemEnv::new(), config.chat));

        Ok(Self { listener, service, max_line_bytes: config.max_line_bytes })
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared chat service.
    pub fn service(&self) -> &Arc<ChatService<SystemEnv>> {
        &self.service
    }

    /// Run the server, accepting connections until the task is dropped.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Server starting on {}", self.local_addr()?);

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let service = Arc::clone(&self.service);
                    let max_line_bytes = self.max_line_bytes;

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, service, max_line_bytes).await {
                            tracing::error!(%peer, "Connection error: {}", e);
                        }
                    });
                },
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                },
            }
        }
    }
}

/// Serve one TCP connection until the client quits or the socket fails.
async fn handle_connection(
    stream: TcpStream,
    service: Arc<ChatService<SystemEnv>>,
    max_line_bytes: usize,
) -> Result<(), LineDriverError> {
    let peer = stream.peer_addr()?;
    tracing::debug!(%peer, "New connection");

    let (reader, writer) = stream.into_split();
    let Some((driver, identity)) = LineDriver::handshake(reader, writer, max_line_bytes).await?
    else {
        tracing::debug!(%peer, "Client left before hello");
        return Ok(());
    };

    let session = SessionController::connect(service, identity, TerminalInfo::default());
    Runtime::new(driver, session).run().await
}
