//! Atomic JSON file writes.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use igsnap_graph::json_kind;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::StoreError;

/// Write `document` to `path` as 2-space indented JSON.
///
/// Parent directories are created as needed. Non-ASCII text is written as-is,
/// so captions in any script stay readable. The file is replaced atomically:
/// readers see either the old content or the new, never a partial write.
///
/// # Errors
///
/// - [`StoreError::NotAnObject`] if `document` is not a JSON object
/// - [`StoreError::Io`] if the directory, temp file, or rename fails
pub fn persist(document: &Value, path: &Path) -> Result<(), StoreError> {
    let text = render(document, path)?;
    let tmp = write_temp(parent_dir(path), &text)?;
    tmp.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;

    log_saved(document, path);
    Ok(())
}

/// Write `document` to the first free path produced by `candidates`.
///
/// Existing files are never replaced. Returns the path that was written.
pub(crate) fn persist_new<I>(
    document: &Value,
    dir: &Path,
    candidates: I,
) -> Result<PathBuf, StoreError>
where
    I: IntoIterator<Item = PathBuf>,
{
    let text = render(document, dir)?;
    let mut tmp = write_temp(dir, &text)?;

    for path in candidates {
        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                log_saved(document, &path);
                return Ok(path);
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!("{} exists, trying next name", path.display());
                tmp = e.file;
            }
            Err(e) => return Err(StoreError::io(path, e.error)),
        }
    }

    Err(StoreError::io(
        dir,
        std::io::Error::new(ErrorKind::AlreadyExists, "no free backup file name"),
    ))
}

/// Read a persisted document.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not JSON, or is not an object.
pub fn load(path: &Path) -> Result<Value, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let value: Value = serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if !value.is_object() {
        return Err(StoreError::NotAnObject {
            path: path.to_path_buf(),
            kind: json_kind(&value),
        });
    }
    Ok(value)
}

/// Check the document shape and pretty-print it.
fn render(document: &Value, path: &Path) -> Result<String, StoreError> {
    if !document.is_object() {
        return Err(StoreError::NotAnObject {
            path: path.to_path_buf(),
            kind: json_kind(document),
        });
    }
    serde_json::to_string_pretty(document).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Directory a file lives in; `.` for bare file names.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write `text` to a synced temp file in `dir`, creating `dir` if needed.
fn write_temp(dir: &Path, text: &str) -> Result<NamedTempFile, StoreError> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".igsnap-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(text.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    Ok(tmp)
}

fn log_saved(document: &Value, path: &Path) {
    let items = document
        .get("data")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    tracing::info!("Successfully saved data to {}", path.display());
    tracing::info!("Saved {items} media items");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> Value {
        json!({
            "data": [{
                "id": "1",
                "caption": "hi",
                "media_type": "IMAGE",
                "media_url": "http://x",
                "permalink": "http://y",
                "timestamp": "2024-01-01T00:00:00+0000"
            }]
        })
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("current-batch.json");

        persist(&sample(), &path).unwrap();
        assert_eq!(load(&path).unwrap(), sample());
    }

    #[test]
    fn test_persist_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data/instagram/current-batch.json");

        persist(&sample(), &path).unwrap();
        assert!(path.exists());

        // Second write into the now-existing directory
        persist(&json!({"data": []}), &path).unwrap();
        assert_eq!(load(&path).unwrap(), json!({"data": []}));
    }

    #[test]
    fn test_persist_two_space_indent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");

        persist(&json!({"data": [{"id": "1"}]}), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"data\": [\n    {\n      \"id\": \"1\"\n    }\n  ]\n}");
    }

    #[test]
    fn test_persist_keeps_non_ascii_unescaped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");

        persist(&json!({"data": [{"id": "1", "caption": "東京 café 🌸"}]}), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("東京 café 🌸"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_persist_keeps_large_integers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        let document: Value = serde_json::from_str(
            r#"{"data": [], "paging": {"total": 12345678901234567890123, "ratio": 0.1}}"#,
        )
        .unwrap();

        persist(&document, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"total\": 12345678901234567890123"), "{text}");
        assert!(text.contains("\"ratio\": 0.1"), "{text}");
        assert_eq!(load(&path).unwrap(), document);
    }

    #[test]
    fn test_persist_rejects_non_object() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");

        let err = persist(&json!([1, 2, 3]), &path).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject { kind: "array", .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_persist_overwrites_previous_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");

        persist(&sample(), &path).unwrap();
        persist(&json!({"data": [], "paging": {}}), &path).unwrap();
        assert_eq!(load(&path).unwrap(), json!({"data": [], "paging": {}}));
    }

    #[test]
    fn test_persist_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");

        persist(&sample(), &path).unwrap();
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["out.json".to_owned()]);
    }

    #[test]
    fn test_persist_parent_is_file_fails() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = persist(&sample(), &blocker.join("out.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_persist_onto_directory_fails_and_keeps_it() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("taken");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inside"), "x").unwrap();

        let err = persist(&sample(), &target).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(target.join("inside").exists());
    }

    #[test]
    fn test_persist_new_skips_existing() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("a.json");
        let second = tmp.path().join("b.json");
        fs::write(&first, "{\"old\": true}").unwrap();

        let written = persist_new(&sample(), tmp.path(), [first.clone(), second.clone()]).unwrap();
        assert_eq!(written, second);
        assert_eq!(load(&first).unwrap(), json!({"old": true}));
        assert_eq!(load(&second).unwrap(), sample());
    }

    #[test]
    fn test_persist_new_no_candidates_left() {
        let tmp = TempDir::new().unwrap();
        let only = tmp.path().join("a.json");
        fs::write(&only, "{}").unwrap();

        let err = persist_new(&sample(), tmp.path(), [only]).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{\"data\": [").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
    }

    #[test]
    fn test_load_rejects_non_object() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.json");
        fs::write(&path, "[]").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject { kind: "array", .. }));
    }
}
