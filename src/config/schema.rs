//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so a minimal config is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend target settings.
    pub backend: BackendConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Backend target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Endpoint that templated SOAP calls are issued against.
    pub soap_endpoint: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            soap_endpoint: "http://127.0.0.1:9000/soap".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total request timeout at the front door, in seconds.
    pub request_secs: u64,

    /// Bound on each outbound backend call, in seconds.
    pub backend_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            backend_secs: 10,
        }
    }
}
