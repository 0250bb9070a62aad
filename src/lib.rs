//! dyngate — dynamic protocol gateway.
//!
//! Callers invoke a uniform REST-style endpoint identified by a route name;
//! the gateway forwards the call to a backend that may speak plain
//! REST/HTTPS or SOAP, selecting the backend and its invocation shape at
//! request time from previously registered templates.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                   GATEWAY                     │
//!                      │                                               │
//!   register templates │  ┌──────────┐   ┌───────────┐                │
//!   ───────────────────┼─▶│   http   │──▶│ template  │──▶ registry    │
//!                      │  │front door│   │ validator │    (write)     │
//!                      │  └──────────┘   └───────────┘                │
//!                      │                                               │
//!   invoke /{route}    │  ┌──────────┐   ┌───────────────────────────┐ │
//!   ───────────────────┼─▶│   http   │──▶│     dispatch pipeline     │ │
//!                      │  │front door│   │ resolve → build → call    │─┼──▶ Backend
//!   mapped reply       │  └──────────┘   │        → map reply        │ │
//!   ◀──────────────────┼─────────────────└───────────────────────────┘ │
//!                      │                                               │
//!                      │  cross-cutting: config, tracing, request IDs  │
//!                      └───────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod dispatch;
pub mod http;
pub mod registry;
pub mod template;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use registry::TemplateRegistry;
