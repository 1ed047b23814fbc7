//! Error definitions for the bridge.

use thiserror::Error;

/// Errors that can abort an HTTP-triggered exchange.
///
/// Parse failures on inbound frames and replies without a pending exchange
/// are contained inside the session receive loop (logged and dropped) and
/// never appear here.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The backend websocket connection could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// Connection establishment exceeded the allotted wait.
    #[error("connection not established after {0} seconds")]
    ConnectTimeout(u64),

    /// Writing the outbound message failed.
    #[error("send error: {0}")]
    Send(String),

    /// No reply arrived within the configured wait.
    #[error("no reply from backend after {0} seconds")]
    ReplyTimeout(u64),

    /// The backend session closed or errored while a reply was pending.
    #[error("backend session closed before a reply arrived")]
    Closed,

    /// Configuration produced an unusable backend endpoint.
    #[error("config error: {0}")]
    Config(String),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BridgeError::ConnectTimeout(10);
        assert_eq!(err.to_string(), "connection not established after 10 seconds");

        let err = BridgeError::Send("session is not open".to_string());
        assert!(err.to_string().contains("session is not open"));
    }
}
