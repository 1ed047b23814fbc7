//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::backend::types::{BridgeError, BridgeResult};

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend websocket endpoint settings.
    pub backend: BackendConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Backend websocket endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend host name or address.
    pub host: String,

    /// Backend port.
    pub port: u16,

    /// Session identity presented on the websocket path.
    pub session_id: String,

    /// Authentication key, passed as the `token` query parameter when set.
    pub auth_key: String,

    /// Use `wss` instead of `ws`.
    pub secure_connection: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1865,
            session_id: "bridge".to_string(),
            auth_key: String::new(),
            secure_connection: false,
        }
    }
}

impl BackendConfig {
    /// Websocket endpoint for this backend.
    pub fn ws_url(&self) -> BridgeResult<Url> {
        let scheme = if self.secure_connection { "wss" } else { "ws" };
        let mut url = Url::parse(&format!(
            "{}://{}:{}/ws/{}",
            scheme, self.host, self.port, self.session_id
        ))
        .map_err(|e| BridgeError::Config(format!("invalid backend endpoint: {e}")))?;

        if !self.auth_key.is_empty() {
            url.query_pairs_mut().append_pair("token", &self.auth_key);
        }
        Ok(url)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Bounded wait for connection establishment, in seconds.
    pub connect_secs: u64,

    /// Bounded wait for a backend reply, in seconds. `0` waits indefinitely.
    pub reply_secs: u64,

    /// Outer HTTP request timeout, in seconds. Should exceed `reply_secs`.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            reply_secs: 30,
            request_secs: 75,
        }
    }
}

impl TimeoutConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    /// Reply wait, or `None` for an unbounded wait.
    pub fn reply_timeout(&self) -> Option<Duration> {
        (self.reply_secs > 0).then(|| Duration::from_secs(self.reply_secs))
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Address the metrics exporter listens on.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
