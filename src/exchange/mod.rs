//! Exchange orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → coordinator.rs (register slot, send, wait)
//!     → [asynchronous backend reply resolves the slot]
//!     → coordinator unblocks, table entry removed
//!     → HTTP handler responds
//! ```

pub mod coordinator;

pub use coordinator::Coordinator;
