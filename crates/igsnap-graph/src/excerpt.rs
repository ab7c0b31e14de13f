//! Bounded excerpts of response bodies for diagnostics.

use std::fmt;

/// Characters kept from each end of a body.
pub(crate) const EXCERPT_CHARS: usize = 500;

/// Head (and optionally tail) of a response body.
///
/// Cut on character boundaries so multi-byte captions never split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    /// Leading characters.
    pub head: String,
    /// Trailing characters, present only when the body is longer than the head.
    pub tail: Option<String>,
    /// Length of the full body in characters.
    pub total_chars: usize,
}

impl Excerpt {
    /// Keep the first `max` characters of `text`.
    pub(crate) fn head(text: &str, max: usize) -> Self {
        let total_chars = text.chars().count();
        Self {
            head: text.chars().take(max).collect(),
            tail: None,
            total_chars,
        }
    }

    /// Keep the first and last `max` characters of `text`.
    ///
    /// When the text fits in `max` characters there is no separate tail.
    pub(crate) fn head_and_tail(text: &str, max: usize) -> Self {
        let mut excerpt = Self::head(text, max);
        if excerpt.total_chars > max {
            let skip = excerpt.total_chars - max.min(excerpt.total_chars - max);
            excerpt.tail = Some(text.chars().skip(skip).collect());
        }
        excerpt
    }

    /// Whether characters were dropped from the middle or end.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        let kept = self.head.chars().count() + self.tail.as_ref().map_or(0, |t| t.chars().count());
        kept < self.total_chars
    }
}

impl fmt::Display for Excerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.head)?;
        match &self.tail {
            Some(tail) if self.is_truncated() => write!(f, " [...] {tail}")?,
            Some(tail) => f.write_str(tail)?,
            None if self.is_truncated() => f.write_str(" [...]")?,
            None => {}
        }
        write!(f, " ({} chars)", self.total_chars)
    }
}
