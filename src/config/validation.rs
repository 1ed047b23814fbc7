//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Catch a request timeout shorter than the reply wait it must cover
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::BridgeConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    EmptyBackendHost,
    ZeroBackendPort,
    EmptySessionId,
    ZeroConnectTimeout,
    RequestTimeoutTooShort { request_secs: u64, reply_secs: u64 },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address '{}' is not a socket address", addr)
            }
            ValidationError::EmptyBackendHost => write!(f, "backend.host must not be empty"),
            ValidationError::ZeroBackendPort => write!(f, "backend.port must not be 0"),
            ValidationError::EmptySessionId => write!(f, "backend.session_id must not be empty"),
            ValidationError::ZeroConnectTimeout => {
                write!(f, "timeouts.connect_secs must be greater than 0")
            }
            ValidationError::RequestTimeoutTooShort {
                request_secs,
                reply_secs,
            } => write!(
                f,
                "timeouts.request_secs ({}) must exceed timeouts.reply_secs ({})",
                request_secs, reply_secs
            ),
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.backend.host.is_empty() {
        errors.push(ValidationError::EmptyBackendHost);
    }
    if config.backend.port == 0 {
        errors.push(ValidationError::ZeroBackendPort);
    }
    if config.backend.session_id.is_empty() {
        errors.push(ValidationError::EmptySessionId);
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }
    if config.timeouts.reply_secs > 0 && config.timeouts.request_secs <= config.timeouts.reply_secs
    {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: config.timeouts.request_secs,
            reply_secs: config.timeouts.reply_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
