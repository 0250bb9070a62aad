//! HTTP front door subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handlers)
//!     → request.rs (stamp request ID)
//!     → registration: registry write
//!       invocation:   dispatch pipeline
//!       pass-through: forward.rs
//!     → response.rs (envelope + status translation)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use response::ApiEnvelope;
pub use server::GatewayServer;
