//! Dispatch subsystem: turning an invocation request into a result.
//!
//! # Data Flow
//! ```text
//! (route name, caller payload)
//!     → pipeline.rs ResolvingRoute   (registry lookup)
//!     → builder.rs  BuildingRequest  (template + payload → call descriptor)
//!     → backend.rs  CallingBackend   (bounded outbound HTTP call)
//!     → mapper.rs   MappingResponse  (reply → JSON via response template)
//!     → Done | Failed(stage, reason)
//! ```
//!
//! # Design Decisions
//! - Every failure is classified by the stage it occurred in; nothing
//!   escapes as an unhandled fault
//! - No retries inside the pipeline; retry policy belongs to an outer layer
//! - The backend call carries a mandatory bounded timeout and is cancelled
//!   by dropping the in-flight future when the bound elapses
//! - Response mapping is a local transform of the already-received reply,
//!   never a second round-trip

pub mod backend;
pub mod builder;
pub mod error;
pub mod mapper;
pub mod pipeline;

pub use backend::{BackendExecutor, BackendReply, HttpBackend};
pub use builder::{BackendCallDescriptor, CallShape};
pub use error::{DispatchError, Stage};
pub use pipeline::DispatchPipeline;
