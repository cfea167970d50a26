//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::RelayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    ZeroBacklog,
    ZeroTimeout(&'static str),
    ZeroRequestLineCap,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "bind_address {:?} is not a valid socket address", addr)
            }
            ValidationError::ZeroBacklog => write!(f, "listener backlog must be greater than zero"),
            ValidationError::ZeroTimeout(which) => {
                write!(f, "{} timeout must be greater than zero", which)
            }
            ValidationError::ZeroRequestLineCap => {
                write!(f, "max_request_line_bytes must be greater than zero")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a parsed configuration, collecting every violation.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.backlog == 0 {
        errors.push(ValidationError::ZeroBacklog);
    }
    if config.timeouts.client_io_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("client_io"));
    }
    if config.timeouts.fetch_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("fetch"));
    }
    if config.limits.max_request_line_bytes == 0 {
        errors.push(ValidationError::ZeroRequestLineCap);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
