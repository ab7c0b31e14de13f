//! Snapshot persistence for igsnap.
//!
//! Writes a fetched media listing as pretty-printed JSON to two places: the
//! current snapshot, overwritten on every run, and a timestamped backup that
//! is never overwritten.
//!
//! - [`persist`]: write one document to one path, atomically
//! - [`load`]: read a persisted document back
//! - [`SnapshotStore`]: current and backup paths for one output directory
//!
//! # Atomicity
//!
//! Each write goes to a temporary file in the target directory which is
//! fsynced and then renamed over the target. A failed write leaves any
//! previous file at that path untouched.

mod error;
mod file;
mod snapshot;

pub use error::StoreError;
pub use file::{load, persist};
pub use snapshot::{BACKUP_TIMESTAMP_FORMAT, SnapshotStore};
