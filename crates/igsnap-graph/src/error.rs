//! Error types for the Graph API client.

use serde_json::Value;

use crate::excerpt::Excerpt;

/// Error from fetching or validating a media listing.
///
/// No variant ever carries the access token: URLs are stored in redacted
/// form and response text is redacted before it is excerpted.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Request could not be completed (DNS, connect, TLS, timeout).
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Request URL with the token masked.
        url: String,
        /// Underlying client error, redacted.
        message: String,
    },

    /// Server answered with a non-success status.
    #[error("HTTP error: {status} - {excerpt}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        excerpt: Excerpt,
    },

    /// Response body is not valid JSON.
    #[error("malformed JSON response: {source}; body: {excerpt}")]
    Malformed {
        /// Parser error with line and column.
        source: serde_json::Error,
        /// Start and end of the offending body.
        excerpt: Excerpt,
    },

    /// Response is JSON but not a media listing.
    #[error("unexpected response shape: {0}")]
    Schema(#[from] SchemaError),

    /// A configured field name is not a known media field.
    #[error("unknown media field: {0:?}")]
    UnknownField(String),
}

/// Structural mismatch in a media listing document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Top level is not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// Object lacks the `data` key.
    #[error("missing `data` field (keys found: [{}])", .0.join(", "))]
    MissingData(Vec<String>),

    /// `data` is present but not an array.
    #[error("`data` field must be an array, got {0}")]
    DataNotArray(&'static str),
}

/// JSON type name (`"object"`, `"array"`, ...) for schema and persistence errors.
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
