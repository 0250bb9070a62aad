//! Template handling subsystem.
//!
//! # Data Flow
//! ```text
//! uploaded template content (untrusted)
//!     → types.rs (tagged as RawTemplate)
//!     → validator.rs (structural well-formedness check)
//!     → admitted to the registry as part of a TemplatePair
//! ```
//!
//! # Design Decisions
//! - Validation is a pure function and runs before any content is stored
//! - Only structural markers are checked; schema-level correctness is the
//!   backend's concern
//! - Placeholder parsing is offered by `RawTemplate` but only the dispatch
//!   layer uses it; the registry treats content as opaque

pub mod types;
pub mod validator;

pub use types::{RawTemplate, Segment, TemplatePair};
pub use validator::{validate, TemplateError};
