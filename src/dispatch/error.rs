//! Dispatch failure taxonomy.

use thiserror::Error;

/// Pipeline stage at which a dispatch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvingRoute,
    BuildingRequest,
    CallingBackend,
    MappingResponse,
}

/// Errors that can occur while dispatching an invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No template pair is registered for the requested route.
    #[error("no template pair registered for route '{0}'")]
    RouteNotRegistered(String),

    /// The caller payload cannot be reconciled with the request template.
    #[error("payload mismatch: {0}")]
    PayloadMismatch(String),

    /// The backend could not be reached.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend replied with a non-success status.
    #[error("backend returned status {status}")]
    BackendError { status: u16 },

    /// The backend reply cannot be reconciled with the response template.
    #[error("response mapping failed: {0}")]
    ResponseMappingError(String),

    /// The backend call exceeded its bound and was cancelled.
    #[error("backend call cancelled after {timeout_ms} ms")]
    Cancelled { timeout_ms: u64 },
}

impl DispatchError {
    /// The stage this error terminates the pipeline in.
    pub fn stage(&self) -> Stage {
        match self {
            DispatchError::RouteNotRegistered(_) => Stage::ResolvingRoute,
            DispatchError::PayloadMismatch(_) => Stage::BuildingRequest,
            DispatchError::BackendUnavailable(_)
            | DispatchError::BackendError { .. }
            | DispatchError::Cancelled { .. } => Stage::CallingBackend,
            DispatchError::ResponseMappingError(_) => Stage::MappingResponse,
        }
    }
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
