//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! POST /send {"user_id", "message"}
//!     → server.rs (Axum setup, middleware, send handler)
//!     → exchange coordinator (blocks this request's task)
//!     → 200 {"response": ...} or 502/504 on failure
//! ```

pub mod server;

pub use server::{HttpServer, SendRequest, SendResponse};
