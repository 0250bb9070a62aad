//! Backend invocation construction.
//!
//! # Responsibilities
//! - Substitute caller payload fields into the request template's slots
//! - Produce a fully-resolved call descriptor for the executor
//! - Reject payloads that cannot be reconciled with the template, naming
//!   the placeholder that failed
//!
//! # Design Decisions
//! - This is the seam where SOAP and REST targets diverge: SOAP calls are
//!   templated (envelope shape + substitution), REST calls are a direct
//!   method + URL + body triple with no templating
//! - Placeholder values must be JSON scalars; nested structures have no
//!   canonical textual form inside an envelope

use axum::http::{Method, Uri};
use serde_json::Value;

use crate::dispatch::error::DispatchError;
use crate::template::{RawTemplate, Segment};

/// Shape of an outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallShape {
    /// Templated envelope call: POST with a SOAPAction header.
    Soap { operation: String },
    /// Plain pass-through call.
    Rest { method: Method },
}

/// Ephemeral, fully-resolved instruction for executing one outbound call.
#[derive(Debug, Clone)]
pub struct BackendCallDescriptor {
    pub target: Uri,
    pub shape: CallShape,
    pub body: String,
    /// Extra headers, used by the REST pass-through shape.
    pub headers: Vec<(String, String)>,
}

/// Build a SOAP-shaped call descriptor from a request template and the
/// caller's payload.
pub fn build(
    template: &RawTemplate,
    payload: &Value,
    target: Uri,
    operation: &str,
) -> Result<BackendCallDescriptor, DispatchError> {
    let fields = payload.as_object().ok_or_else(|| {
        DispatchError::PayloadMismatch("caller payload must be a JSON object".to_string())
    })?;

    let mut body = String::with_capacity(template.as_str().len());
    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => body.push_str(&text),
            Segment::Placeholder(name) => {
                let value = fields.get(&name).ok_or_else(|| {
                    DispatchError::PayloadMismatch(format!(
                        "payload has no value for placeholder '{{{name}}}'"
                    ))
                })?;
                body.push_str(&scalar_text(&name, value)?);
            }
        }
    }

    Ok(BackendCallDescriptor {
        target,
        shape: CallShape::Soap {
            operation: operation.to_string(),
        },
        body,
        headers: Vec::new(),
    })
}

fn scalar_text(name: &str, value: &Value) -> Result<String, DispatchError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(DispatchError::PayloadMismatch(format!(
            "placeholder '{{{name}}}' received null"
        ))),
        Value::Array(_) | Value::Object(_) => Err(DispatchError::PayloadMismatch(format!(
            "placeholder '{{{name}}}' requires a scalar value"
        ))),
    }
}
