//! Configuration management for igsnap.
//!
//! Parses `igsnap.toml` with serde and auto-discovers the file in the current
//! directory or its parents. Every setting has a default, so running without a
//! config file reproduces the stock behaviour: fetch 50 items from the
//! Instagram Graph API into `data/instagram/`.
//!
//! CLI settings are applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support `${VAR}` and `${VAR:-default}`. Expanded fields:
//! - `instagram.base_url`
//! - `output.dir`
//! - `output.backup_dir`
//!
//! The access token itself is never read from the file. Only the name of the
//! environment variable holding it (`instagram.token_env`) is configurable.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "igsnap.toml";

/// Largest page size accepted by the media endpoint.
pub const MAX_LIMIT: u32 = 100;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override page size.
    pub limit: Option<u32>,
    /// Override request timeout.
    pub timeout_seconds: Option<u64>,
    /// Override output directory (snapshot and, unless set separately, backups).
    pub output_dir: Option<PathBuf>,
    /// Override API base URL.
    pub base_url: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph API settings.
    pub instagram: InstagramConfig,
    /// Output paths as written in TOML.
    output: OutputConfigRaw,

    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Graph API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstagramConfig {
    /// API base URL.
    pub base_url: String,
    /// Path of the media listing endpoint, relative to `base_url`.
    pub media_path: String,
    /// Page size sent as the `limit` parameter.
    pub limit: u32,
    /// Requested media fields, by name.
    pub fields: Vec<String>,
    /// Abort the request after this many seconds. Unset means no timeout.
    pub timeout_seconds: Option<u64>,
    /// Environment variable holding the access token.
    pub token_env: String,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graph.instagram.com".to_owned(),
            media_path: "me/media".to_owned(),
            limit: 50,
            fields: [
                "id",
                "caption",
                "media_type",
                "media_url",
                "thumbnail_url",
                "permalink",
                "timestamp",
                "children",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            timeout_seconds: None,
            token_env: "INSTAGRAM_ACCESS_TOKEN".to_owned(),
        }
    }
}

/// Raw output configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    current_file: Option<String>,
    backup_dir: Option<String>,
    backup_prefix: Option<String>,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Directory holding the current snapshot.
    pub dir: PathBuf,
    /// File name of the current snapshot.
    pub current_file: String,
    /// Directory for backups when it differs from `dir`.
    pub backup_dir: Option<PathBuf>,
    /// File name prefix of backups.
    pub backup_prefix: String,
}

impl OutputConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            dir: base.join("data/instagram"),
            current_file: "current-batch.json".to_owned(),
            backup_dir: None,
            backup_prefix: "backup_".to_owned(),
        }
    }

    /// Path of the current snapshot file.
    #[must_use]
    pub fn current_path(&self) -> PathBuf {
        self.dir.join(&self.current_file)
    }

    /// Directory where backups are written.
    #[must_use]
    pub fn backup_dir(&self) -> &Path {
        self.backup_dir.as_deref().unwrap_or(&self.dir)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message (e.g., "${`SNAPSHOT_DIR`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `igsnap.toml` in the current directory and parents.
    /// Validation runs after CLI settings are applied, so overrides are checked too.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(limit) = settings.limit {
            self.instagram.limit = limit;
        }
        if let Some(timeout) = settings.timeout_seconds {
            self.instagram.timeout_seconds = Some(timeout);
        }
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(dir);
        }
        if let Some(base_url) = &settings.base_url {
            self.instagram.base_url.clone_from(base_url);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            instagram: InstagramConfig::default(),
            output: OutputConfigRaw::default(),
            output_resolved: OutputConfig::with_base(base),
            config_path: None,
        }
    }

    /// Parse configuration from TOML text, resolving paths against `base`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or environment expansion fails.
    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base);
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_instagram()?;
        self.validate_output()?;
        Ok(())
    }

    fn validate_instagram(&self) -> Result<(), ConfigError> {
        let ig = &self.instagram;
        require_non_empty(&ig.base_url, "instagram.base_url")?;
        require_http_url(&ig.base_url, "instagram.base_url")?;
        require_non_empty(&ig.media_path, "instagram.media_path")?;
        require_non_empty(&ig.token_env, "instagram.token_env")?;

        if ig.limit == 0 || ig.limit > MAX_LIMIT {
            return Err(ConfigError::Validation(format!(
                "instagram.limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        if ig.fields.is_empty() {
            return Err(ConfigError::Validation(
                "instagram.fields cannot be empty".to_owned(),
            ));
        }
        if ig.timeout_seconds == Some(0) {
            return Err(ConfigError::Validation(
                "instagram.timeout_seconds must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_output(&self) -> Result<(), ConfigError> {
        let current = &self.output_resolved.current_file;
        require_non_empty(current, "output.current_file")?;
        if current.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "output.current_file must be a file name, not a path".to_owned(),
            ));
        }
        if self.output_resolved.backup_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "output.backup_prefix cannot contain path separators".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.instagram.base_url =
            expand::expand_env(&self.instagram.base_url, "instagram.base_url")?;

        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }
        if let Some(ref dir) = self.output.backup_dir {
            self.output.backup_dir = Some(expand::expand_env(dir, "output.backup_dir")?);
        }

        Ok(())
    }

    /// Resolve relative output paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = OutputConfig::with_base(config_dir);
        let raw = &self.output;

        self.output_resolved = OutputConfig {
            dir: raw
                .dir
                .as_ref()
                .map_or(defaults.dir, |d| config_dir.join(d)),
            current_file: raw.current_file.clone().unwrap_or(defaults.current_file),
            backup_dir: raw.backup_dir.as_ref().map(|d| config_dir.join(d)),
            backup_prefix: raw.backup_prefix.clone().unwrap_or(defaults.backup_prefix),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/work"));
        assert_eq!(config.instagram.base_url, "https://graph.instagram.com");
        assert_eq!(config.instagram.media_path, "me/media");
        assert_eq!(config.instagram.limit, 50);
        assert_eq!(config.instagram.timeout_seconds, None);
        assert_eq!(config.instagram.token_env, "INSTAGRAM_ACCESS_TOKEN");
        assert_eq!(
            config.output_resolved.current_path(),
            PathBuf::from("/work/data/instagram/current-batch.json")
        );
        assert_eq!(
            config.output_resolved.backup_dir(),
            Path::new("/work/data/instagram")
        );
        assert_eq!(config.output_resolved.backup_prefix, "backup_");
    }

    #[test]
    fn test_default_fields_include_children() {
        let config = InstagramConfig::default();
        assert_eq!(config.fields.first().map(String::as_str), Some("id"));
        assert!(config.fields.iter().any(|f| f == "children"));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml_str("", Path::new("/work")).unwrap();
        assert_eq!(config.instagram.limit, 50);
        assert_eq!(
            config.output_resolved.dir,
            PathBuf::from("/work/data/instagram")
        );
    }

    #[test]
    fn test_parse_instagram_section() {
        let toml = r#"
[instagram]
base_url = "https://graph.example.com"
limit = 25
fields = ["id", "caption"]
timeout_seconds = 10
token_env = "IG_TOKEN"
"#;
        let config = Config::from_toml_str(toml, Path::new("/work")).unwrap();
        assert_eq!(config.instagram.base_url, "https://graph.example.com");
        assert_eq!(config.instagram.media_path, "me/media");
        assert_eq!(config.instagram.limit, 25);
        assert_eq!(config.instagram.fields, vec!["id", "caption"]);
        assert_eq!(config.instagram.timeout_seconds, Some(10));
        assert_eq!(config.instagram.token_env, "IG_TOKEN");
    }

    #[test]
    fn test_resolve_output_paths() {
        let toml = r#"
[output]
dir = "snapshots"
current_file = "latest.json"
backup_dir = "snapshots/history"
backup_prefix = "ig_"
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();
        let output = &config.output_resolved;
        assert_eq!(output.dir, PathBuf::from("/project/snapshots"));
        assert_eq!(
            output.current_path(),
            PathBuf::from("/project/snapshots/latest.json")
        );
        assert_eq!(output.backup_dir(), Path::new("/project/snapshots/history"));
        assert_eq!(output.backup_prefix, "ig_");
    }

    #[test]
    fn test_absolute_output_dir_kept() {
        let toml = r#"
[output]
dir = "/var/lib/igsnap"
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();
        assert_eq!(config.output_resolved.dir, PathBuf::from("/var/lib/igsnap"));
    }

    #[test]
    fn test_empty_output_section_uses_defaults() {
        let config = Config::from_toml_str("[output]\n", Path::new("/p")).unwrap();
        assert_eq!(config.output_resolved.current_file, "current-batch.json");
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = Config::from_toml_str("[instagram\nlimit = ", Path::new("/p")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.apply_cli_settings(&CliSettings {
            limit: Some(10),
            timeout_seconds: Some(5),
            output_dir: Some(PathBuf::from("/tmp/out")),
            base_url: Some("http://127.0.0.1:9000".to_owned()),
        });
        assert_eq!(config.instagram.limit, 10);
        assert_eq!(config.instagram.timeout_seconds, Some(5));
        assert_eq!(config.instagram.base_url, "http://127.0.0.1:9000");
        assert_eq!(
            config.output_resolved.current_path(),
            PathBuf::from("/tmp/out/current-batch.json")
        );
        // Backups follow the snapshot dir unless configured separately
        assert_eq!(config.output_resolved.backup_dir(), Path::new("/tmp/out"));
    }

    #[test]
    fn test_apply_cli_settings_keeps_separate_backup_dir() {
        let toml = r#"
[output]
backup_dir = "history"
"#;
        let mut config = Config::from_toml_str(toml, Path::new("/p")).unwrap();
        config.apply_cli_settings(&CliSettings {
            output_dir: Some(PathBuf::from("/elsewhere")),
            ..Default::default()
        });
        assert_eq!(config.output_resolved.backup_dir(), Path::new("/p/history"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.instagram.limit, 50);
        assert_eq!(config.output_resolved.dir, PathBuf::from("/work/data/instagram"));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/igsnap.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_explicit_file_resolves_against_its_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("igsnap.toml");
        std::fs::write(&path, "[output]\ndir = \"out\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.output_resolved.dir, tmp.path().join("out"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("igsnap.toml");
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            limit: Some(0),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_expand_env_vars_missing_var() {
        let toml = r#"
[output]
dir = "${IGSNAP_CONFIG_TEST_UNSET_DIR}"
"#;
        let err = Config::from_toml_str(toml, Path::new("/p")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("output.dir"));
    }

    #[test]
    fn test_expand_env_vars_default() {
        let toml = r#"
[instagram]
base_url = "${IGSNAP_CONFIG_TEST_UNSET_URL:-https://graph.example.com}"
"#;
        let config = Config::from_toml_str(toml, Path::new("/p")).unwrap();
        assert_eq!(config.instagram.base_url, "https://graph.example.com");
    }

    // Validation tests

    fn assert_validation_error(config: &Config, expected: &str) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        assert!(msg.contains(expected), "Expected '{expected}' in: {msg}");
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/work"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.instagram.base_url = "graph.instagram.com".to_owned();
        assert_validation_error(&config, "instagram.base_url");
    }

    #[test]
    fn test_validate_limit_bounds() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.instagram.limit = 0;
        assert_validation_error(&config, "instagram.limit");

        config.instagram.limit = MAX_LIMIT + 1;
        assert_validation_error(&config, "instagram.limit");

        config.instagram.limit = MAX_LIMIT;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_fields() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.instagram.fields.clear();
        assert_validation_error(&config, "instagram.fields");
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.instagram.timeout_seconds = Some(0);
        assert_validation_error(&config, "timeout_seconds");
    }

    #[test]
    fn test_validate_empty_token_env() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.instagram.token_env = "  ".to_owned();
        assert_validation_error(&config, "instagram.token_env");
    }

    #[test]
    fn test_validate_current_file_is_a_name() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.output_resolved.current_file = "nested/current.json".to_owned();
        assert_validation_error(&config, "output.current_file");
    }

    #[test]
    fn test_validate_backup_prefix_separator() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.output_resolved.backup_prefix = "old/backup_".to_owned();
        assert_validation_error(&config, "output.backup_prefix");
    }
}
