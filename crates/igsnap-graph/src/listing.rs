//! Validated media listing document.

use serde::Serialize;
use serde_json::Value;

use crate::error::{SchemaError, json_kind};
use crate::types::MediaItem;

/// A media listing response: an object whose `data` key holds an array.
///
/// Other top-level keys (such as `paging`) are kept untouched, and the
/// document is serialized exactly as it was received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MediaListing(Value);

impl MediaListing {
    /// The `data` array.
    #[must_use]
    pub fn data(&self) -> &[Value] {
        match self.0.get("data") {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Number of media items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// The whole document.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Cursor for the page after this one (`paging.cursors.after`).
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.0
            .pointer("/paging/cursors/after")
            .and_then(Value::as_str)
    }

    /// Whether the server advertised a further page (`paging.next`).
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.0.pointer("/paging/next").is_some_and(Value::is_string)
    }

    /// Typed view of the items.
    ///
    /// # Errors
    ///
    /// Returns an error if an item lacks an `id` or has fields of the wrong type.
    pub fn items(&self) -> Result<Vec<MediaItem>, serde_json::Error> {
        self.data()
            .iter()
            .map(MediaItem::deserialize_from)
            .collect()
    }
}

impl TryFrom<Value> for MediaListing {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = &value else {
            return Err(SchemaError::NotAnObject(json_kind(&value)));
        };
        match map.get("data") {
            None => Err(SchemaError::MissingData(map.keys().cloned().collect())),
            Some(Value::Array(_)) => Ok(Self(value)),
            Some(other) => Err(SchemaError::DataNotArray(json_kind(other))),
        }
    }
}
