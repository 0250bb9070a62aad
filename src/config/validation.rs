//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0) and address/URL shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// Semantic validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("invalid soap endpoint '{0}'")]
    InvalidSoapEndpoint(String),

    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a parsed configuration, collecting all errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if Url::parse(&config.backend.soap_endpoint).is_err() {
        errors.push(ValidationError::InvalidSoapEndpoint(
            config.backend.soap_endpoint.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request"));
    }
    if config.timeouts.backend_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("backend"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
