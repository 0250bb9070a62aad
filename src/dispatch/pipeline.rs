//! The dispatch state machine.
//!
//! # State Machine
//! ```text
//! ResolvingRoute → BuildingRequest → CallingBackend → MappingResponse → Done
//!       │                │                 │                 │
//!       └────────────────┴────────┬────────┴─────────────────┘
//!                                 ▼
//!                        Failed(stage, reason)
//! ```
//!
//! Terminal states are Done and Failed. A missing route fails before any
//! backend call is attempted; a cancelled backend call fails without
//! attempting response mapping.

use axum::http::Uri;
use serde_json::Value;
use std::sync::Arc;

use crate::dispatch::backend::BackendExecutor;
use crate::dispatch::builder;
use crate::dispatch::error::{DispatchError, DispatchResult};
use crate::dispatch::mapper;
use crate::registry::TemplateRegistry;

/// Orchestrates one invocation from route resolution to mapped result.
pub struct DispatchPipeline<E> {
    registry: Arc<TemplateRegistry>,
    backend: E,
    soap_endpoint: Uri,
}

impl<E: BackendExecutor> DispatchPipeline<E> {
    pub fn new(registry: Arc<TemplateRegistry>, backend: E, soap_endpoint: Uri) -> Self {
        Self {
            registry,
            backend,
            soap_endpoint,
        }
    }

    /// Run one invocation through the pipeline.
    pub async fn dispatch(&self, route: &str, payload: &Value) -> DispatchResult<Value> {
        // ResolvingRoute
        let pair = self
            .registry
            .lookup(route)
            .ok_or_else(|| DispatchError::RouteNotRegistered(route.to_string()))?;

        // BuildingRequest
        let call = builder::build(&pair.request, payload, self.soap_endpoint.clone(), route)?;
        tracing::debug!(route = %route, target = %call.target, "Calling backend");

        // CallingBackend
        let reply = self.backend.execute(&call).await?;
        if !reply.is_success() {
            return Err(DispatchError::BackendError {
                status: reply.status,
            });
        }

        // MappingResponse
        mapper::map_response(&pair.response, &reply.body)
    }
}
