//! Backend connectivity subsystem.
//!
//! # Data Flow
//! ```text
//! coordinator ──▶ session.rs (send) ──▶ websocket ──▶ backend
//! backend ──▶ websocket ──▶ session.rs (receive loop)
//!     → protocol.rs (parse frame, extract content)
//!     → correlation table (targeted wakeup)
//! ```

pub mod protocol;
pub mod session;
pub mod types;

pub use session::BackendSession;
pub use types::{BridgeError, BridgeResult};
