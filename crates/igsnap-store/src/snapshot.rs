//! Current snapshot and timestamped backups.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::StoreError;
use crate::file::{persist, persist_new};

/// `strftime` format of the backup timestamp (`20240131_235959`).
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Upper bound on `_N` suffixes tried when backup names collide.
const MAX_BACKUP_SUFFIX: u32 = 1000;

/// Snapshot locations for one output configuration.
///
/// Layout with default settings:
/// ```text
/// data/instagram/
/// +-- current-batch.json              # overwritten every run
/// +-- backup_20240101_120000.json     # one per run
/// +-- backup_20240101_120000_1.json   # second run within the same second
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    current_path: PathBuf,
    backup_dir: PathBuf,
    backup_prefix: String,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(
        current_path: impl Into<PathBuf>,
        backup_dir: impl Into<PathBuf>,
        backup_prefix: impl Into<String>,
    ) -> Self {
        Self {
            current_path: current_path.into(),
            backup_dir: backup_dir.into(),
            backup_prefix: backup_prefix.into(),
        }
    }

    /// Path of the current snapshot.
    #[must_use]
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    #[must_use]
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Backup path for a run started at `at`, before collision handling.
    #[must_use]
    pub fn backup_path(&self, at: NaiveDateTime) -> PathBuf {
        self.backup_path_with_suffix(at, 0)
    }

    fn backup_path_with_suffix(&self, at: NaiveDateTime, suffix: u32) -> PathBuf {
        let stamp = at.format(BACKUP_TIMESTAMP_FORMAT);
        let name = if suffix == 0 {
            format!("{}{stamp}.json", self.backup_prefix)
        } else {
            format!("{}{stamp}_{suffix}.json", self.backup_prefix)
        };
        self.backup_dir.join(name)
    }

    /// Overwrite the current snapshot with `document`.
    ///
    /// # Errors
    ///
    /// See [`persist`].
    pub fn save_current(&self, document: &Value) -> Result<&Path, StoreError> {
        persist(document, &self.current_path)?;
        Ok(&self.current_path)
    }

    /// Write `document` to a new backup file stamped with `at`.
    ///
    /// If a backup for the same second already exists, `_1`, `_2`, ... is
    /// appended to the timestamp. Existing backups are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not an object or the write fails.
    pub fn save_backup(&self, document: &Value, at: NaiveDateTime) -> Result<PathBuf, StoreError> {
        let candidates =
            (0..MAX_BACKUP_SUFFIX).map(|suffix| self.backup_path_with_suffix(at, suffix));
        persist_new(document, &self.backup_dir, candidates)
    }

    /// Existing backup files, oldest first.
    ///
    /// A missing backup directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn backups(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.backup_dir, e)),
        };

        let mut backups: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path != &self.current_path && self.is_backup_name(path))
            .collect();
        backups.sort();
        Ok(backups)
    }

    fn is_backup_name(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| {
                name.starts_with(&self.backup_prefix)
                    && Path::new(name).extension().is_some_and(|ext| ext == "json")
            })
    }
}
