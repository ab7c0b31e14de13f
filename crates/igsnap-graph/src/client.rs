//! Graph API media client.
//!
//! Provides a sync HTTP client for the media listing endpoint. One call is
//! one request: no retries, no pagination follow-up, no rate-limit handling.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info};
use ureq::Agent;

use crate::error::GraphError;
use crate::excerpt::{EXCERPT_CHARS, Excerpt};
use crate::fields::FieldSet;
use crate::listing::MediaListing;
use crate::token::{AccessToken, MASK};

/// Client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g. `https://graph.instagram.com`).
    pub base_url: String,
    /// Endpoint path relative to `base_url` (e.g. `me/media`).
    pub media_path: String,
    /// Default page size.
    pub limit: u32,
    /// Requested fields.
    pub fields: FieldSet,
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graph.instagram.com".to_owned(),
            media_path: "me/media".to_owned(),
            limit: 50,
            fields: FieldSet::default(),
            timeout: None,
        }
    }
}

/// Media listing client.
pub struct GraphClient {
    agent: Agent,
    endpoint: String,
    fields: FieldSet,
    limit: u32,
}

impl GraphClient {
    /// Create a client. No connection is made until a fetch.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(config.timeout)
            .http_status_as_error(false)
            .build()
            .into();

        let endpoint = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.media_path.trim_start_matches('/')
        );

        Self {
            agent,
            endpoint,
            fields: config.fields,
            limit: config.limit,
        }
    }

    /// Full endpoint URL, without query parameters.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch one page of media with the configured page size.
    ///
    /// # Errors
    ///
    /// See [`GraphClient::fetch_media_with_limit`].
    pub fn fetch_media(&self, token: &AccessToken) -> Result<MediaListing, GraphError> {
        self.fetch_media_with_limit(token, self.limit)
    }

    /// Fetch one page of media with an explicit page size.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Transport`] if the request cannot be completed
    /// - [`GraphError::HttpStatus`] if the server returns a non-2xx status
    /// - [`GraphError::Malformed`] if the body is not JSON
    /// - [`GraphError::Schema`] if the JSON is not a media listing
    pub fn fetch_media_with_limit(
        &self,
        token: &AccessToken,
        limit: u32,
    ) -> Result<MediaListing, GraphError> {
        let display_url = self.redacted_url(limit);
        info!("Fetching from: {display_url}");

        let transport_error = |e: ureq::Error| {
            let err = GraphError::Transport {
                url: display_url.clone(),
                message: token.redact(&e.to_string()),
            };
            error!("{err}");
            err
        };

        let response = self
            .agent
            .get(&self.endpoint)
            .query("fields", self.fields.to_string())
            .query("limit", limit.to_string())
            .query("access_token", token.expose())
            .header("Accept", "application/json")
            .call()
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        debug!("Response status: {status}");
        let mut body_reader = response.into_body();

        if !(200..300).contains(&status) {
            let text = body_reader.read_to_vec().map_or_else(
                |_| "(unable to read error body)".to_owned(),
                |body| token.redact(&String::from_utf8_lossy(&body)),
            );
            let excerpt = Excerpt::head(&text, EXCERPT_CHARS);
            error!("Response status code: {status}");
            error!("First {EXCERPT_CHARS} characters of response: {}", excerpt.head);
            return Err(GraphError::HttpStatus { status, excerpt });
        }

        let body = body_reader.read_to_vec().map_err(transport_error)?;
        info!("Response length: {} bytes", body.len());
        let listing = parse_listing(&body, token)?;
        info!("Successfully fetched {} media items", listing.len());
        Ok(listing)
    }

    /// Request URL as it may appear in logs.
    fn redacted_url(&self, limit: u32) -> String {
        format!(
            "{}?limit={limit}&fields={}&access_token={MASK}",
            self.endpoint, self.fields
        )
    }
}

/// Parse and validate a response body.
///
/// Surrounding whitespace is ignored.
pub(crate) fn parse_listing(body: &[u8], token: &AccessToken) -> Result<MediaListing, GraphError> {
    let value: Value = serde_json::from_slice(body.trim_ascii()).map_err(|source| {
        let text = token.redact(&String::from_utf8_lossy(body));
        let excerpt = Excerpt::head_and_tail(&text, EXCERPT_CHARS);
        error!("Failed to parse JSON response: {source}");
        error!("First {EXCERPT_CHARS} characters of response: {}", excerpt.head);
        if let Some(tail) = &excerpt.tail {
            error!("Last {EXCERPT_CHARS} characters of response: {tail}");
        }
        GraphError::Malformed { source, excerpt }
    })?;

    MediaListing::try_from(value).map_err(|e| {
        error!("Invalid response structure: {e}");
        GraphError::Schema(e)
    })
}
