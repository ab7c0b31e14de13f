//! Instagram Graph API media client.
//!
//! Fetches a single page of the authenticated user's media listing and checks
//! its structure:
//!
//! - [`GraphClient`]: blocking HTTP client for the media endpoint
//! - [`AccessToken`]: credential wrapper that never prints its value
//! - [`FieldSet`]: the requested media fields, as data rather than a literal
//! - [`MediaListing`]: a response body known to be `{"data": [...], ...}`
//!
//! There are no retries and no pagination follow-up: one request, one attempt.

mod client;
mod error;
mod excerpt;
mod fields;
mod listing;
mod token;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use client::{ClientConfig, GraphClient};
pub use error::{GraphError, SchemaError, json_kind};
pub use excerpt::Excerpt;
pub use fields::{FieldSet, MediaField};
pub use listing::MediaListing;
pub use token::AccessToken;
pub use types::{ChildMedia, Children, MediaItem, MediaType};
