//! Snapshot file store implementation.

use crate::{Action, SnapshotError, SnapshotResult};
use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Store for timestamped session snapshot files.
///
/// All files managed by one store share a base filename; a snapshot lives
/// at `<base>_<YYYYMMDD_HHMMSS_ffffff>.json`. The timestamp has microsecond
/// resolution and sorts lexicographically in chronological order, so the
/// store never needs file metadata to age-order its candidates.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    base: PathBuf,
}

impl SnapshotStore {
    /// Create a store over the given base filename
    /// (e.g. `/tmp/FaCurrentSession.tmp`).
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The configured base filename.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Serialize the entries to a newly timestamped snapshot file.
    ///
    /// Entries are merged into a single path-to-action mapping; when two
    /// entries touch the same path the later one wins. Returns the path
    /// written. On failure no file is left behind that a later restore
    /// would treat as valid.
    pub fn write(&self, entries: &[(String, Action)]) -> SnapshotResult<PathBuf> {
        let path = self.next_path();
        self.write_to(&path, entries)?;
        Ok(path)
    }

    /// Serialize the entries to an explicit path, bypassing autosave naming.
    pub fn write_to(&self, path: &Path, entries: &[(String, Action)]) -> SnapshotResult<()> {
        let mut mapping: BTreeMap<&str, Action> = BTreeMap::new();
        for (file_path, action) in entries {
            mapping.insert(file_path.as_str(), *action);
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        mapping.serialize(&mut ser)?;

        // Write to a temp name, then atomically publish.
        let temp = path.with_extension("json.tmp");
        fs::write(&temp, &buf)?;
        fs::rename(&temp, path)?;

        debug!(path = %path.display(), entries = mapping.len(), "Wrote session snapshot");
        Ok(())
    }

    /// Parse a snapshot file back into path/action pairs, in file order.
    ///
    /// A missing or syntactically invalid file is a [`SnapshotError::Parse`];
    /// well-formed JSON that is not an object of known action tags is a
    /// [`SnapshotError::CorruptSession`].
    pub fn read(&self, path: &Path) -> SnapshotResult<Vec<(String, Action)>> {
        let text = fs::read_to_string(path)
            .map_err(|e| SnapshotError::parse(path, e.to_string()))?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| SnapshotError::parse(path, e.to_string()))?;

        let object = value
            .as_object()
            .ok_or_else(|| SnapshotError::corrupt(path, "expected a path-to-action object"))?;

        let mut entries = Vec::with_capacity(object.len());
        for (file_path, tag) in object {
            let tag = tag.as_str().ok_or_else(|| {
                SnapshotError::corrupt(path, format!("action for {file_path} is not a string"))
            })?;
            let action = Action::from_tag(tag).ok_or_else(|| {
                SnapshotError::corrupt(path, format!("unknown action tag: {tag}"))
            })?;
            entries.push((file_path.clone(), action));
        }

        debug!(path = %path.display(), entries = entries.len(), "Read session snapshot");
        Ok(entries)
    }

    /// All live snapshot files matching the base pattern, oldest first.
    pub fn list_candidates(&self) -> Vec<PathBuf> {
        let pattern = format!("{}_*.json", self.base.display());
        let mut candidates: Vec<PathBuf> = match glob::glob(&pattern) {
            Ok(paths) => paths.filter_map(Result::ok).filter(|p| p.is_file()).collect(),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Invalid snapshot search pattern");
                Vec::new()
            }
        };
        candidates.sort();
        candidates
    }

    /// Delete a snapshot file. Removing a nonexistent file is not an error.
    pub fn delete(&self, path: &Path) -> SnapshotResult<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "Deleted session snapshot");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SnapshotError::Io(e)),
        }
    }

    /// Delete the single oldest snapshot once more than `retain_count`
    /// live files exist. Returns the deleted path, if any.
    pub fn prune(&self, retain_count: usize) -> SnapshotResult<Option<PathBuf>> {
        let candidates = self.list_candidates();
        if candidates.len() <= retain_count {
            return Ok(None);
        }
        let oldest = candidates[0].clone();
        self.delete(&oldest)?;
        Ok(Some(oldest))
    }

    fn next_path(&self) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S_%6f");
        PathBuf::from(format!("{}_{}.json", self.base.display(), timestamp))
    }
}
