//! Reply correlation subsystem.
//!
//! # Data Flow
//! ```text
//! coordinator ── register(user_id) ──▶ table ──▶ PendingReply (held by coordinator)
//! session ────── resolve(user_id) ───▶ table ──▶ wakes exactly that coordinator
//! coordinator ── remove(user_id) ────▶ table    (cleanup on every exit path)
//! ```
//!
//! This is the only shared mutable structure in the bridge; every operation
//! on it is atomic with respect to the others.

pub mod table;

pub use table::{CorrelationTable, PendingReply};
