//! `igsnap fetch` command implementation.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use clap::Args;
use igsnap_config::{CliSettings, Config, InstagramConfig, OutputConfig};
use igsnap_graph::{AccessToken, ClientConfig, FieldSet, GraphClient};
use igsnap_store::SnapshotStore;
use tracing::{error, info, warn};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fetch command.
#[derive(Args)]
pub(crate) struct FetchArgs {
    /// Path to configuration file (default: auto-discover igsnap.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of media items to request (1-100).
    #[arg(short, long)]
    limit: Option<u32>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Directory for the current snapshot and backups.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Graph API base URL.
    #[arg(long)]
    base_url: Option<String>,
}

/// Outcome of a successful run.
#[derive(Debug)]
pub(crate) struct RunSummary {
    pub(crate) items: usize,
    pub(crate) current: PathBuf,
    pub(crate) backup: PathBuf,
    pub(crate) has_next_page: bool,
}

impl FetchArgs {
    /// Execute the fetch command.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing, the fetch fails,
    /// or either snapshot file cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let settings = CliSettings {
            limit: self.limit,
            timeout_seconds: self.timeout,
            output_dir: self.output_dir,
            base_url: self.base_url,
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;

        let summary = run(
            &config,
            |name| std::env::var(name).ok(),
            Local::now().naive_local(),
        )?;

        output.success(&format!("Fetched {} media items", summary.items));
        output.path("current", &summary.current);
        output.path("backup", &summary.backup);
        if summary.has_next_page {
            output.warning("More media available; only the first page was saved");
        }
        Ok(())
    }
}

/// Fetch the media listing and persist it.
///
/// The token is resolved through `lookup` before anything touches the
/// network or the filesystem. `started` stamps the backup file name.
/// If the current snapshot is written and the backup then fails, the
/// run fails but the current snapshot keeps its new content.
pub(crate) fn run<F>(
    config: &Config,
    lookup: F,
    started: NaiveDateTime,
) -> Result<RunSummary, CliError>
where
    F: Fn(&str) -> Option<String>,
{
    let token = resolve_token(&config.instagram.token_env, lookup)?;

    let client = GraphClient::new(client_config(&config.instagram)?);
    info!("Fetching media from Instagram ({})...", client.endpoint());
    let listing = client.fetch_media(&token)?;

    let store = snapshot_store(&config.output_resolved);
    let current = store
        .save_current(listing.as_value())
        .inspect_err(|e| error!("Failed to save JSON file: {e}"))?
        .to_path_buf();
    let backup = store
        .save_backup(listing.as_value(), started)
        .inspect_err(|e| error!("Failed to save JSON file: {e}"))?;

    if listing.has_next_page() {
        warn!("Response has further pages; they are not fetched");
    }
    info!("Successfully completed Instagram media fetch");

    Ok(RunSummary {
        items: listing.len(),
        current,
        backup,
        has_next_page: listing.has_next_page(),
    })
}

/// Read the access token from the environment variable `var`.
///
/// An empty value counts as unset.
fn resolve_token<F>(var: &str, lookup: F) -> Result<AccessToken, CliError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.is_empty() => Ok(AccessToken::new(value)),
        _ => {
            error!("No access token provided. Please set the {var} environment variable.");
            Err(CliError::MissingCredential {
                var: var.to_owned(),
            })
        }
    }
}

fn client_config(instagram: &InstagramConfig) -> Result<ClientConfig, CliError> {
    Ok(ClientConfig {
        base_url: instagram.base_url.clone(),
        media_path: instagram.media_path.clone(),
        limit: instagram.limit,
        fields: FieldSet::from_names(&instagram.fields)?,
        timeout: instagram.timeout_seconds.map(Duration::from_secs),
    })
}

fn snapshot_store(output: &OutputConfig) -> SnapshotStore {
    SnapshotStore::new(
        output.current_path(),
        output.backup_dir(),
        output.backup_prefix.clone(),
    )
}
