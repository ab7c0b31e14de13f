//! Media item types.
//!
//! These are read-only views over the raw JSON. Snapshots are always written
//! from the raw document, so fields not modelled here are never lost.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A posted media item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MediaItem {
    /// Opaque media ID.
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub media_url: Option<String>,
    /// Preview image, present for videos.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    /// Publication time as sent by the API (e.g. `2024-01-01T00:00:00+0000`).
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Carousel children.
    #[serde(default)]
    pub children: Option<Children>,
}

impl MediaItem {
    pub(crate) fn deserialize_from(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Number of carousel children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, |c| c.data.len())
    }
}

/// Child list wrapper, shaped like the API's `{"data": [...]}` edge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Children {
    #[serde(default)]
    pub data: Vec<ChildMedia>,
}

/// A single image or video inside a carousel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChildMedia {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Kind of media.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Image,
    Video,
    CarouselAlbum,
    /// Any type this client does not know about, kept verbatim.
    Other(String),
}

impl MediaType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Image => "IMAGE",
            Self::Video => "VIDEO",
            Self::CarouselAlbum => "CAROUSEL_ALBUM",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "IMAGE" => Self::Image,
            "VIDEO" => Self::Video,
            "CAROUSEL_ALBUM" => Self::CarouselAlbum,
            _ => Self::Other(value),
        }
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        match value {
            MediaType::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
