//! Structural validation of uploaded templates.
//!
//! # Responsibilities
//! - Check that uploaded content carries the envelope and body markers
//! - Produce a descriptive rejection reason for the caller
//!
//! # Design Decisions
//! - Pure function, no state; runs before any content reaches the registry
//! - Marker presence only; no schema-level validation of untrusted uploads
//! - Marker ordering and surrounding whitespace are irrelevant

use thiserror::Error;

use crate::template::types::RawTemplate;

/// Marker denoting the message wrapper.
pub const ENVELOPE_MARKER: &str = "<Envelope";

/// Marker denoting the message payload section.
pub const BODY_MARKER: &str = "<Body";

/// Errors raised while admitting templates into the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Content lacks a required structural marker.
    #[error("invalid SOAP template: missing the '{0}' marker")]
    MissingMarker(&'static str),

    /// The route name was empty.
    #[error("route name must not be empty")]
    EmptyRouteName,
}

/// Check that template content is structurally well-formed.
pub fn validate(template: &RawTemplate) -> Result<(), TemplateError> {
    let content = template.as_str();
    if !content.contains(ENVELOPE_MARKER) {
        return Err(TemplateError::MissingMarker(ENVELOPE_MARKER));
    }
    if !content.contains(BODY_MARKER) {
        return Err(TemplateError::MissingMarker(BODY_MARKER));
    }
    Ok(())
}
