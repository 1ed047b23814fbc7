//! Pending-exchange registry.
//!
//! # Responsibilities
//! - Map a user id to the single in-flight exchange waiting under it
//! - Deliver an asynchronous backend reply as a targeted wakeup
//! - Drop replies that match no pending exchange (fire-and-forget)
//!
//! # Design Decisions
//! - One `oneshot` channel per exchange: the table holds the sender, the
//!   coordinator holds the receiver, so delivery is written once and read once
//! - `resolve` consumes the entry; the slot is single-use by construction
//! - At most one live entry per user id; re-registering replaces the old
//!   sender (last writer wins) and the displaced waiter observes closure

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::oneshot;

use crate::backend::types::{BridgeError, BridgeResult};

/// One registered slot: the sender half plus the generation that created it.
///
/// The generation lets a displaced coordinator clean up after itself without
/// touching the slot of whoever displaced it.
#[derive(Debug)]
struct Slot {
    generation: u64,
    tx: oneshot::Sender<String>,
}

/// Receiver half of one in-flight exchange.
///
/// Held by the coordinator that registered it; fulfilled exactly once by the
/// session receive path, or never.
pub struct PendingReply {
    rx: oneshot::Receiver<String>,
    generation: u64,
}

impl PendingReply {
    /// Wait for the reply. Fails with [`BridgeError::Closed`] when the sender
    /// is dropped before delivering, which happens when the session dies or a
    /// duplicate registration displaces this slot.
    pub async fn wait(self) -> BridgeResult<String> {
        self.rx.await.map_err(|_| BridgeError::Closed)
    }

    /// Identity of this registration, for generation-guarded cleanup.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Thread-safe registry of pending exchanges, keyed by user id.
#[derive(Debug, Default)]
pub struct CorrelationTable {
    slots: DashMap<String, Slot>,
    next_generation: AtomicU64,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Create a fresh slot for `user_id` and return its receiver half.
    ///
    /// Must complete before the outbound send for the same user id: a fast
    /// backend reply that races ahead of registration finds no slot and is
    /// dropped.
    pub fn register(&self, user_id: &str) -> PendingReply {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        if self
            .slots
            .insert(user_id.to_string(), Slot { generation, tx })
            .is_some()
        {
            tracing::warn!(user_id = %user_id, "re-registration displaced an in-flight slot");
        }
        PendingReply { rx, generation }
    }

    /// Deliver `content` to the exchange pending under `user_id`.
    ///
    /// Returns false, with no side effect on the table, when no slot is
    /// registered for that user id.
    pub fn resolve(&self, user_id: &str, content: String) -> bool {
        match self.slots.remove(user_id) {
            Some((_, slot)) => {
                if slot.tx.send(content).is_err() {
                    tracing::debug!(user_id = %user_id, "waiter gone before reply delivery");
                }
                true
            }
            None => false,
        }
    }

    /// Delete the entry for `user_id`, if any. Idempotent, and safe to call
    /// concurrently with `register`/`resolve` on the same key.
    pub fn remove(&self, user_id: &str) {
        self.slots.remove(user_id);
    }

    /// Delete the entry for `user_id` only if it still belongs to
    /// `generation`.
    ///
    /// This is the cleanup a coordinator must use: by the time it runs, the
    /// key may hold a successor registration whose live slot must not be
    /// disturbed.
    pub fn remove_generation(&self, user_id: &str, generation: u64) {
        self.slots
            .remove_if(user_id, |_, slot| slot.generation == generation);
    }

    /// Whether an exchange is currently pending under `user_id`.
    pub fn contains(&self, user_id: &str) -> bool {
        self.slots.contains_key(user_id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drain every entry, waking all blocked waiters with a closed error.
    /// Called when the backend session errors or closes. Returns the number
    /// of exchanges that were still pending.
    pub fn fail_pending(&self) -> usize {
        let pending = self.slots.len();
        self.slots.clear();
        pending
    }
}
