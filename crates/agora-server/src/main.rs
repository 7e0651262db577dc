//! Agora server binary.
//!
//! # Usage
//!
//! ```bash
//! agora-server --bind 0.0.0.0:23234
//!
//! # Then, from any machine
//! nc localhost 23234
//! ```

use std::time::Duration;

use agora_core::ChatConfig;
use agora_server::{DEFAULT_BIND_ADDRESS, DEFAULT_MAX_LINE_BYTES, Server, ServerConfig};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Agora chat server
#[derive(Parser, Debug)]
#[command(name = "agora-server")]
#[command(about = "Multi-user chat with message voting")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = DEFAULT_BIND_ADDRESS)]
    bind: String,

    /// System message posted at startup
    #[arg(long, default_value = "Welcome to agora")]
    welcome: String,

    /// Skip the startup system message
    #[arg(long)]
    no_welcome: bool,

    /// Interval between refresh checks, in milliseconds
    #[arg(long, default_value_t = 1000)]
    refresh_ms: u64,

    /// Do not announce joining users
    #[arg(long)]
    no_join_announcements: bool,

    /// Longest accepted input line, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_BYTES)]
    max_line_bytes: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Agora server starting");
    tracing::info!("Binding to {}", args.bind);

    let config = ServerConfig {
        bind_address: args.bind,
        max_line_bytes: args.max_line_bytes,
        chat: ChatConfig {
            refresh_interval: Duration::from_millis(args.refresh_ms),
            welcome_message: (!args.no_welcome).then_some(args.welcome),
            announce_joins: !args.no_join_announcements,
        },
    };

    let server = Server::bind(config).await?;

    tracing::info!("Server listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
