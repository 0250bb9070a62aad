//! Stateless forwarding endpoints.
//!
//! # Responsibilities
//! - `/https-call`: direct pass-through of a caller-described HTTP call
//! - `/bulk-upload`: concurrent fan-out of a batch of POSTs over the
//!   same executor
//!
//! # Design Decisions
//! - No registry involvement; these endpoints hold no state
//! - Both share the backend executor, so the bounded call timeout applies
//! - A failed sub-request fails the whole batch

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

use crate::dispatch::{BackendCallDescriptor, BackendExecutor, CallShape, DispatchError};
use crate::http::response::{status_for, ApiEnvelope};
use crate::http::server::AppState;

/// Caller-described outbound call for the pass-through endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ForwardRequest {
    pub url: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<Value>,
}

/// One entry of a bulk fan-out batch.
#[derive(Debug, Deserialize)]
pub struct BulkItem {
    pub route: String,
    #[serde(default)]
    pub data: Value,
}

/// Batch of calls fanned out against a caller-supplied base URL.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub base_url: String,
    pub requests: Vec<BulkItem>,
}

#[derive(Debug, Serialize)]
pub struct BulkOutcome {
    pub route: String,
    pub result: Value,
}

/// `POST /https-call` handler.
pub async fn https_call(State(state): State<AppState>, Json(req): Json<ForwardRequest>) -> Response {
    match forward_one(&state, &req).await {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiEnvelope::ok("HTTPS call successful", data)),
        )
            .into_response(),
        Err(error) => {
            tracing::warn!(url = %req.url, error = %error, "Pass-through call failed");
            (status_for(&error), Json(ApiEnvelope::failure(error))).into_response()
        }
    }
}

/// `POST /bulk-upload` handler.
pub async fn bulk_upload(State(state): State<AppState>, Json(req): Json<BulkRequest>) -> Response {
    let base = match Url::parse(&req.base_url) {
        Ok(url) => url,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiEnvelope::failure(format!("invalid baseUrl: {e}"))),
            )
                .into_response();
        }
    };
    let base = base.as_str().trim_end_matches('/').to_string();

    let calls = req.requests.iter().map(|item| {
        let state = &state;
        let sub = ForwardRequest {
            url: format!("{base}/{}", item.route),
            method: Some("POST".to_string()),
            headers: None,
            body: Some(item.data.clone()),
        };
        async move { (item.route.clone(), forward_one(state, &sub).await) }
    });

    let mut results = Vec::with_capacity(req.requests.len());
    for (route, outcome) in join_all(calls).await {
        match outcome {
            Ok(result) => results.push(BulkOutcome { route, result }),
            Err(error) => {
                tracing::warn!(route = %route, error = %error, "Bulk sub-request failed");
                return (status_for(&error), Json(ApiEnvelope::failure(error))).into_response();
            }
        }
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "message": "Bulk upload successful",
            "results": results,
        })),
    )
        .into_response()
}

/// Execute one caller-described call and parse its reply.
async fn forward_one(state: &AppState, req: &ForwardRequest) -> Result<Value, DispatchError> {
    // url crate validation catches relative and schemeless inputs that the
    // Uri parser would let through.
    let url = Url::parse(&req.url)
        .map_err(|e| DispatchError::PayloadMismatch(format!("invalid url '{}': {e}", req.url)))?;
    let target: Uri = url
        .as_str()
        .parse()
        .map_err(|e| DispatchError::PayloadMismatch(format!("invalid url '{}': {e}", req.url)))?;

    let method = match &req.method {
        Some(m) => Method::from_bytes(m.as_bytes())
            .map_err(|_| DispatchError::PayloadMismatch(format!("invalid method '{m}'")))?,
        None => Method::GET,
    };

    let mut headers: Vec<(String, String)> = req
        .headers
        .clone()
        .map(|h| h.into_iter().collect())
        .unwrap_or_default();
    let body = match &req.body {
        Some(value) => {
            headers.push(("content-type".to_string(), "application/json".to_string()));
            value.to_string()
        }
        None => String::new(),
    };

    let call = BackendCallDescriptor {
        target,
        shape: CallShape::Rest { method },
        body,
        headers,
    };
    let reply = state.backend.execute(&call).await?;

    // Relay the reply body for any status; non-JSON replies come back as a
    // plain string.
    Ok(serde_json::from_str(&reply.body).unwrap_or_else(|_| Value::String(reply.body.clone())))
}
