//! chat-bridge
//!
//! Bridges synchronous HTTP requests to an asynchronous, session-oriented
//! websocket backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                  CHAT BRIDGE                      │
//!                    │                                                   │
//!  POST /send ───────┼─▶ http ──▶ exchange ──▶ correlation (register)    │
//!                    │              │                                    │
//!                    │              └─────────▶ backend session (send) ──┼──▶ Backend
//!                    │                                                   │
//!                    │        [caller's task blocks on its slot]         │
//!                    │                                                   │
//!  200 {"response"} ◀┼── http ◀── exchange ◀── correlation (resolve) ◀──┼─── async reply
//!                    │                                                   │
//!                    │  Cross-cutting: config, observability, lifecycle  │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use chat_bridge::config::loader::load_config;
use chat_bridge::lifecycle::signals;
use chat_bridge::observability::{logging, metrics};
use chat_bridge::{BridgeConfig, HttpServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    tracing::info!("chat-bridge v0.1.0 starting");

    // Optional config file path as the first argument; defaults otherwise.
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => BridgeConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend_host = %config.backend.host,
        backend_port = config.backend.port,
        reply_timeout_secs = config.timeouts.reply_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Arc::new(Shutdown::new());
    tokio::spawn(signals::listen(shutdown.clone()));

    let server = HttpServer::connect(config).await?;
    server.run(listener, shutdown.as_ref()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
