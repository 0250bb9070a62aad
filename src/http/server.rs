//! HTTP server setup and request handlers.
//!
//! # Responsibilities
//! - Create the Axum router with all endpoints
//! - Wire up middleware (tracing, request timeout, request ID)
//! - Translate registry and pipeline outcomes into response envelopes
//! - Serve with graceful shutdown
//!
//! # Design Decisions
//! - The registry and pipeline live in the shared state, owned by the
//!   server; there is no ambient global
//! - Each request is handled on its own task, so a hung backend call for
//!   one route never stalls others
//! - The upload endpoint reports every failure as 500 with the standard
//!   envelope; the invocation endpoint differentiates statuses per failure
//!   kind

use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::dispatch::{DispatchPipeline, HttpBackend};
use crate::http::forward;
use crate::http::request::MakeRequestUuid;
use crate::http::response::{status_for, ApiEnvelope};
use crate::registry::TemplateRegistry;
use crate::template::RawTemplate;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<TemplateRegistry>,
    pub pipeline: Arc<DispatchPipeline<HttpBackend>>,
    pub backend: HttpBackend,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new gateway server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, axum::http::uri::InvalidUri> {
        let soap_endpoint: Uri = config.backend.soap_endpoint.parse()?;
        let backend = HttpBackend::new(Duration::from_secs(config.timeouts.backend_secs));
        let registry = Arc::new(TemplateRegistry::new());
        let pipeline = Arc::new(DispatchPipeline::new(
            registry.clone(),
            backend.clone(),
            soap_endpoint,
        ));

        let state = AppState {
            registry,
            pipeline,
            backend,
        };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/soap-call/add-soap-call", post(upload_templates))
            .route(
                "/soap-call/{route}",
                post(invoke_route).delete(remove_route),
            )
            .route("/https-call", post(forward::https_call))
            .route("/bulk-upload", post(forward::bulk_upload))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown future resolves.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            soap_endpoint = %self.config.backend.soap_endpoint,
            "Gateway listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// `POST /soap-call/add-soap-call` handler.
///
/// Multipart fields: `soapRoute`, `requestTemplate`, `responseTemplate`.
async fn upload_templates(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut route = None;
    let mut request_template = None;
    let mut response_template = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return upload_failure(format!("error parsing form data: {e}")),
        };
        let name = field.name().map(str::to_string);
        let text = match field.text().await {
            Ok(text) => text,
            Err(e) => return upload_failure(format!("error reading form field: {e}")),
        };
        match name.as_deref() {
            Some("soapRoute") => route = Some(text),
            Some("requestTemplate") => request_template = Some(text),
            Some("responseTemplate") => response_template = Some(text),
            _ => {}
        }
    }

    let (Some(route), Some(request), Some(response)) = (route, request_template, response_template)
    else {
        return upload_failure(
            "soapRoute, requestTemplate and responseTemplate are all required",
        );
    };

    match state
        .registry
        .register(&route, RawTemplate::new(request), RawTemplate::new(response))
    {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiEnvelope::ok_empty("SOAP templates uploaded successfully.")),
        )
            .into_response(),
        Err(error) => {
            tracing::warn!(route = %route, error = %error, "Template upload rejected");
            upload_failure(error.to_string())
        }
    }
}

fn upload_failure(error: impl ToString) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiEnvelope::failure(error)),
    )
        .into_response()
}

/// `POST /soap-call/{route}` handler.
async fn invoke_route(
    State(state): State<AppState>,
    Path(route): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    match state.pipeline.dispatch(&route, &payload).await {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiEnvelope::ok("Dynamic SOAP call successful", data)),
        )
            .into_response(),
        Err(error) => {
            tracing::warn!(
                route = %route,
                stage = ?error.stage(),
                error = %error,
                "Dispatch failed"
            );
            (status_for(&error), Json(ApiEnvelope::failure(error))).into_response()
        }
    }
}

/// `DELETE /soap-call/{route}` handler.
async fn remove_route(State(state): State<AppState>, Path(route): Path<String>) -> Response {
    if state.registry.remove(&route) {
        (
            StatusCode::OK,
            Json(ApiEnvelope::ok_empty("SOAP templates removed.")),
        )
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ApiEnvelope::failure(format!(
                "no template pair registered for route '{route}'"
            ))),
        )
            .into_response()
    }
}
