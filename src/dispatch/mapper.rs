//! Response mapping through the route's response template.
//!
//! The response template is read as a pattern: its literal segments must
//! appear in the backend reply in order, and the text between them is
//! captured under the surrounding placeholder names. The result is a JSON
//! object keyed by placeholder name.

use serde_json::{Map, Value};

use crate::dispatch::error::DispatchError;
use crate::template::{RawTemplate, Segment};

/// Transform a raw backend reply into JSON using the response template.
pub fn map_response(template: &RawTemplate, reply: &str) -> Result<Value, DispatchError> {
    let segments = template.segments();
    let mut out = Map::new();
    let mut cursor = 0usize;
    let mut idx = 0usize;

    while idx < segments.len() {
        match &segments[idx] {
            Segment::Literal(text) => {
                let pos = find_segment(reply, cursor, text)?;
                cursor = pos + text.len();
                idx += 1;
            }
            Segment::Placeholder(name) => {
                let captured = match segments.get(idx + 1) {
                    Some(Segment::Literal(next)) => {
                        let pos = find_segment(reply, cursor, next)?;
                        let captured = &reply[cursor..pos];
                        cursor = pos + next.len();
                        idx += 2;
                        captured
                    }
                    // Trailing placeholder captures the rest of the reply.
                    _ => {
                        let captured = &reply[cursor..];
                        cursor = reply.len();
                        idx += 1;
                        captured
                    }
                };
                out.insert(name.clone(), Value::String(captured.trim().to_string()));
            }
        }
    }

    Ok(Value::Object(out))
}

fn find_segment(reply: &str, cursor: usize, text: &str) -> Result<usize, DispatchError> {
    reply[cursor..]
        .find(text)
        .map(|pos| cursor + pos)
        .ok_or_else(|| {
            DispatchError::ResponseMappingError(format!(
                "backend reply does not contain expected segment '{}'",
                text.trim()
            ))
        })
}
