//! Media field selection.

use std::fmt;
use std::str::FromStr;

use crate::error::GraphError;

/// A field that can be requested from the media endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaField {
    Id,
    Caption,
    MediaType,
    MediaUrl,
    ThumbnailUrl,
    Permalink,
    Timestamp,
    /// Carousel children with their own type, URL and thumbnail.
    Children,
}

impl MediaField {
    /// All fields in their canonical request order.
    pub const ALL: [Self; 8] = [
        Self::Id,
        Self::Caption,
        Self::MediaType,
        Self::MediaUrl,
        Self::ThumbnailUrl,
        Self::Permalink,
        Self::Timestamp,
        Self::Children,
    ];

    /// Name used in configuration and in the response body.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Caption => "caption",
            Self::MediaType => "media_type",
            Self::MediaUrl => "media_url",
            Self::ThumbnailUrl => "thumbnail_url",
            Self::Permalink => "permalink",
            Self::Timestamp => "timestamp",
            Self::Children => "children",
        }
    }

    /// Selector sent in the `fields` query parameter.
    fn selector(self) -> &'static str {
        match self {
            Self::Children => "children{id,media_type,media_url,thumbnail_url}",
            other => other.name(),
        }
    }
}

impl FromStr for MediaField {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s.trim())
            .ok_or_else(|| GraphError::UnknownField(s.to_owned()))
    }
}

/// Ordered, duplicate-free set of requested fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet(Vec<MediaField>);

impl FieldSet {
    /// Build a set from field names, keeping first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownField`] for a name that is not a [`MediaField`].
    pub fn from_names<I, S>(names: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = Vec::new();
        for name in names {
            let field: MediaField = name.as_ref().parse()?;
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        Ok(Self(fields))
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self(MediaField::ALL.to_vec())
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(field.selector())?;
        }
        Ok(())
    }
}
