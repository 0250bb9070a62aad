//! Route template registry subsystem.
//!
//! # Data Flow
//! ```text
//! registration (route name, request template, response template)
//!     → validator (both templates must pass)
//!     → store.rs (atomic install/replace of the pair)
//!
//! invocation (route name)
//!     → store.rs (lock-free lookup)
//!     → Arc<TemplatePair> handed to the dispatch pipeline
//! ```
//!
//! # Design Decisions
//! - The registry is an owned value threaded through the server state,
//!   never a global
//! - Read-dominated: DashMap sharded locking, no whole-map lock on lookup
//! - Pairs are stored behind Arc so replacement is one atomic map insert;
//!   readers hold either the old complete pair or the new one

pub mod store;

pub use store::TemplateRegistry;
