//! Request coordination.
//!
//! # Responsibilities
//! - Drive one HTTP-triggered exchange end to end
//! - Enforce register-before-send ordering
//! - Clean the correlation table up on every exit path
//!
//! # Design Decisions
//! - No retries: a send failure or timeout fails the whole exchange
//! - The reply wait is bounded by a configurable timeout; a zero config
//!   value disables the bound and the caller blocks until resolved

use std::sync::Arc;
use std::time::Duration;

use crate::backend::protocol::OutboundFrame;
use crate::backend::types::{BridgeError, BridgeResult};
use crate::backend::BackendSession;
use crate::correlation::CorrelationTable;

/// Orchestrates single exchanges over the shared backend session.
pub struct Coordinator {
    table: Arc<CorrelationTable>,
    session: Arc<BackendSession>,
    reply_timeout: Option<Duration>,
}

impl Coordinator {
    pub fn new(
        table: Arc<CorrelationTable>,
        session: Arc<BackendSession>,
        reply_timeout: Option<Duration>,
    ) -> Self {
        Self {
            table,
            session,
            reply_timeout,
        }
    }

    /// Send `message` on behalf of `user_id` and wait for the correlated
    /// reply.
    ///
    /// One exchange may be in flight per user id at a time; a second call for
    /// the same user id displaces the first.
    pub async fn exchange(&self, user_id: &str, message: &str) -> BridgeResult<String> {
        // Register strictly before sending: a fast reply must find the slot
        // already in place.
        let pending = self.table.register(user_id);
        let generation = pending.generation();

        let frame = OutboundFrame::new(user_id, message);
        if let Err(e) = self.session.send(&frame).await {
            self.table.remove_generation(user_id, generation);
            return Err(e);
        }

        let result = match self.reply_timeout {
            Some(limit) => match tokio::time::timeout(limit, pending.wait()).await {
                Ok(result) => result,
                Err(_) => Err(BridgeError::ReplyTimeout(limit.as_secs())),
            },
            None => pending.wait().await,
        };

        // A resolved slot is already gone, and on the closed path the key may
        // already belong to a displacing registration, so cleanup is guarded
        // by this exchange's generation.
        self.table.remove_generation(user_id, generation);
        result
    }
}
