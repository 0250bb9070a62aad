//! Outbound backend execution.
//!
//! # Responsibilities
//! - Issue the resolved call over HTTP
//! - Enforce the bounded call timeout
//! - Classify transport failures
//!
//! # Design Decisions
//! - One shared hyper client; connections are pooled across invocations
//! - The timeout cancels the in-flight request by dropping its future;
//!   a cancelled call surfaces as `DispatchError::Cancelled`
//! - Non-success statuses are reported in the reply, not classified here;
//!   what counts as an error depends on the calling shape

use axum::body::Body;
use axum::http::{header, Method, Request};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::future::Future;
use std::time::Duration;

use crate::dispatch::builder::{BackendCallDescriptor, CallShape};
use crate::dispatch::error::DispatchError;

/// Cap on buffered reply bodies.
const MAX_REPLY_BYTES: usize = 2 * 1024 * 1024;

/// Raw reply from a backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    pub status: u16,
    pub body: String,
}

impl BackendReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes fully-resolved backend calls.
pub trait BackendExecutor: Send + Sync {
    fn execute(
        &self,
        call: &BackendCallDescriptor,
    ) -> impl Future<Output = Result<BackendReply, DispatchError>> + Send;
}

/// HTTP executor backed by a shared hyper client.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl BackendExecutor for HttpBackend {
    async fn execute(&self, call: &BackendCallDescriptor) -> Result<BackendReply, DispatchError> {
        let mut builder = Request::builder().uri(call.target.clone());
        builder = match &call.shape {
            CallShape::Soap { operation } => builder
                .method(Method::POST)
                .header(header::CONTENT_TYPE, "text/xml; charset=utf-8")
                .header("SOAPAction", operation.as_str()),
            CallShape::Rest { method } => builder.method(method.clone()),
        };
        for (name, value) in &call.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let request = builder
            .body(Body::from(call.body.clone()))
            .map_err(|e| DispatchError::BackendUnavailable(e.to_string()))?;

        let response = match tokio::time::timeout(self.timeout, self.client.request(request)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(DispatchError::BackendUnavailable(e.to_string())),
            Err(_) => {
                return Err(DispatchError::Cancelled {
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        };

        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(Body::new(response.into_body()), MAX_REPLY_BYTES)
            .await
            .map_err(|e| DispatchError::BackendUnavailable(e.to_string()))?;

        Ok(BackendReply {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
