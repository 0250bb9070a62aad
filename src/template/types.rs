//! Template value types.

use std::time::SystemTime;

/// Raw textual template content as uploaded by the caller.
///
/// A tagged value: content enters the system only through
/// [`validate`](crate::template::validate), so downstream code can rely on
/// the structural markers being present. Beyond that the content is opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTemplate(String);

impl RawTemplate {
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the template into literal and placeholder segments.
    ///
    /// A placeholder is `{name}` where `name` is ASCII alphanumeric or `_`.
    /// Anything else, including unclosed braces, is kept as literal text.
    pub fn segments(&self) -> Vec<Segment> {
        let mut out = Vec::new();
        let mut literal = String::new();
        let mut rest = self.0.as_str();

        while let Some(start) = rest.find('{') {
            let (before, after) = rest.split_at(start);
            literal.push_str(before);

            if let Some(end) = after[1..].find('}') {
                let name = &after[1..1 + end];
                if !name.is_empty()
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    if !literal.is_empty() {
                        out.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    out.push(Segment::Placeholder(name.to_string()));
                    rest = &after[end + 2..];
                    continue;
                }
            }

            // Not a placeholder; keep the brace as literal text.
            literal.push('{');
            rest = &after[1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            out.push(Segment::Literal(literal));
        }
        out
    }
}

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Verbatim template text.
    Literal(String),
    /// A `{name}` substitution slot.
    Placeholder(String),
}

/// A route's contract: the request/response templates registered for it.
///
/// Immutable after creation. Re-registration builds a fresh pair and swaps
/// it in whole, so readers never see a half-replaced contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePair {
    pub request: RawTemplate,
    pub response: RawTemplate,
    pub registered_at: SystemTime,
}
