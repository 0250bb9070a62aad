//! Caller-facing response envelope.
//!
//! Every outcome, success or failure, is rendered as the same JSON shape:
//! `{success, message, data?, error?}`. Failures carry a human-readable
//! reason, never a stack trace or a partial backend payload. The status
//! code is a presentation concern layered on top of the envelope.

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::dispatch::DispatchError;

/// Stable JSON envelope returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiEnvelope {
    pub fn ok(message: &str, data: Value) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn ok_empty(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: None,
            error: None,
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            message: "Internal Server Error".to_string(),
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// Map a dispatch failure to a caller-facing status code.
pub fn status_for(error: &DispatchError) -> StatusCode {
    match error {
        DispatchError::RouteNotRegistered(_) => StatusCode::NOT_FOUND,
        DispatchError::PayloadMismatch(_) | DispatchError::ResponseMappingError(_) => {
            StatusCode::BAD_REQUEST
        }
        DispatchError::BackendUnavailable(_) | DispatchError::BackendError { .. } => {
            StatusCode::BAD_GATEWAY
        }
        DispatchError::Cancelled { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}
