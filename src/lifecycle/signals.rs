//! OS signal handling.
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Ctrl+C translates to the internal shutdown broadcast

use std::sync::Arc;

use crate::lifecycle::Shutdown;

/// Wait for Ctrl+C and trigger graceful shutdown.
pub async fn listen(shutdown: Arc<Shutdown>) {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
    shutdown.trigger();
}
