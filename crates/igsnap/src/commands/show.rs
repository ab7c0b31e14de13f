//! `igsnap show` command implementation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use clap::Args;
use igsnap_config::Config;
use igsnap_graph::{GraphError, MediaListing};
use igsnap_store::SnapshotStore;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Snapshot file to summarize (default: the current snapshot).
    file: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover igsnap.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or is not a media listing.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let output_config = &config.output_resolved;

        let path = self.file.unwrap_or_else(|| output_config.current_path());
        let document = igsnap_store::load(&path)?;
        let listing = MediaListing::try_from(document).map_err(GraphError::from)?;
        let summary = Summary::from_listing(&listing)
            .map_err(|e| CliError::Validation(format!("{}: {e}", path.display())))?;

        let store = SnapshotStore::new(
            output_config.current_path(),
            output_config.backup_dir(),
            output_config.backup_prefix.clone(),
        );
        let backups = store.backups()?;

        output.heading(&path.display().to_string());
        for (label, value) in summary.rows() {
            output.field(&label, value);
        }
        output.field(
            "backups",
            format!("{} in {}", backups.len(), store.backup_dir().display()),
        );
        if summary.has_next_page {
            output.warning("More media available than this snapshot holds");
        }
        Ok(())
    }
}

/// Counts derived from a stored listing.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    items: usize,
    by_type: BTreeMap<String, usize>,
    carousel_children: usize,
    newest: Option<String>,
    next_cursor: Option<String>,
    has_next_page: bool,
}

/// Timestamp format of the Graph API (`2024-01-01T00:00:00+0000`).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

fn parse_timestamp(ts: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(ts, TIMESTAMP_FORMAT).ok()
}

/// Whether `candidate` is later than `current`.
///
/// Compares instants when both parse, so differing offsets order correctly;
/// otherwise falls back to comparing the text.
fn is_newer(candidate: &str, current: &str) -> bool {
    if let (Some(a), Some(b)) = (parse_timestamp(candidate), parse_timestamp(current)) {
        a > b
    } else {
        candidate > current
    }
}

impl Summary {
    fn from_listing(listing: &MediaListing) -> Result<Self, serde_json::Error> {
        let mut summary = Self {
            items: listing.len(),
            next_cursor: listing.next_cursor().map(str::to_owned),
            has_next_page: listing.has_next_page(),
            ..Self::default()
        };

        for item in listing.items()? {
            let kind = item
                .media_type
                .as_ref()
                .map_or("UNKNOWN", |t| t.as_str())
                .to_owned();
            *summary.by_type.entry(kind).or_default() += 1;
            summary.carousel_children += item.child_count();

            if let Some(ts) = item.timestamp
                && summary
                    .newest
                    .as_deref()
                    .is_none_or(|newest| is_newer(&ts, newest))
            {
                summary.newest = Some(ts);
            }
        }
        Ok(summary)
    }

    /// Label/value rows for display. Per-type counts are indented.
    fn rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![("items".to_owned(), self.items.to_string())];
        for (kind, count) in &self.by_type {
            rows.push((format!("  {kind}"), count.to_string()));
        }
        if self.carousel_children > 0 {
            rows.push((
                "carousel children".to_owned(),
                self.carousel_children.to_string(),
            ));
        }
        if let Some(newest) = &self.newest {
            rows.push(("newest".to_owned(), newest.clone()));
        }
        if let Some(cursor) = &self.next_cursor {
            rows.push(("next cursor".to_owned(), cursor.clone()));
        }
        rows
    }
}
