//! HTTP-to-websocket bridge for a conversational backend.

pub mod backend;
pub mod config;
pub mod correlation;
pub mod exchange;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use backend::{BridgeError, BridgeResult};
pub use config::BridgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
