//! CLI error types.

use igsnap_config::ConfigError;
use igsnap_graph::GraphError;
use igsnap_store::StoreError;

/// CLI error type. Every variant ends the run with exit status 1.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Access token variable unset or empty.
    #[error("No access token provided. Please set the {var} environment variable.")]
    MissingCredential { var: String },

    #[error("{0}")]
    Graph(#[from] GraphError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Validation(String),
}
