//! Directory-snapshot history provider
//!
//! Compares two checked-out trees (the previous and the new release) and
//! reports the changed files. Content identifiers are SHA-256 hex digests of
//! the file bytes.

use crate::errors::{io_error, Result};
use crate::history::{FileChange, HistoryProvider, ReleaseChangeSet};
use apidelta_core::CommitInfo;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A release described by its previous and new directory trees
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    old_dir: PathBuf,
    new_dir: PathBuf,
    commit: CommitInfo,
}

impl DirectorySnapshot {
    pub fn new(
        old_dir: impl Into<PathBuf>,
        new_dir: impl Into<PathBuf>,
        commit: CommitInfo,
    ) -> Self {
        Self {
            old_dir: old_dir.into(),
            new_dir: new_dir.into(),
            commit,
        }
    }

    /// Changed files between `old_dir` and `new_dir`, sorted by path
    ///
    /// # Errors
    ///
    /// `Io` if either tree cannot be walked or a file cannot be read.
    pub fn changeset(
        old_dir: &Path,
        new_dir: &Path,
        commit: CommitInfo,
    ) -> Result<ReleaseChangeSet> {
        let old = read_tree(old_dir)?;
        let mut new = read_tree(new_dir)?;

        let mut files = Vec::new();
        for (path, old_bytes) in old {
            match new.remove(&path) {
                None => files.push(FileChange::deleted(path, old_bytes)),
                Some(new_bytes) if new_bytes != old_bytes => {
                    let id = content_id(&new_bytes);
                    files.push(FileChange::modified(path, old_bytes, new_bytes, id));
                }
                Some(_) => {}
            }
        }
        for (path, new_bytes) in new {
            let id = content_id(&new_bytes);
            files.push(FileChange::added(path, new_bytes, id));
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::debug!(
            commit_id = %commit.commit_id,
            files = files.len(),
            "directory snapshot compared"
        );
        Ok(ReleaseChangeSet::new(commit, files))
    }
}

impl HistoryProvider for DirectorySnapshot {
    fn releases(&self) -> Result<Vec<ReleaseChangeSet>> {
        let release = Self::changeset(&self.old_dir, &self.new_dir, self.commit.clone())?;
        Ok(vec![release])
    }
}

/// SHA-256 hex digest of `content`
pub fn content_id(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Every regular file under `root`, keyed by `/`-separated relative path
fn read_tree(root: &Path) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| io_error("walk_snapshot", root, e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let bytes = fs::read(path).map_err(|e| io_error("read_snapshot_file", path, e))?;
        files.insert(key, bytes);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ChangeStatus;
    use chrono::DateTime;
    use tempfile::TempDir;

    fn commit() -> CommitInfo {
        CommitInfo {
            commit_id: "c0ffee".into(),
            tag: "1.0.1".into(),
            created_at: DateTime::parse_from_rfc3339("2022-02-02T00:00:00+00:00").unwrap(),
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_changeset_classifies_files() {
        let (old, new) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        write(old.path(), "apis/same.json", "{}");
        write(new.path(), "apis/same.json", "{}");
        write(old.path(), "apis/changed.json", "{\"a\":1}");
        write(new.path(), "apis/changed.json", "{\"a\":2}");
        write(old.path(), "apis/gone.json", "{}");
        write(new.path(), "apis/fresh.json", "{}");

        let set = DirectorySnapshot::changeset(old.path(), new.path(), commit()).unwrap();

        let summary: Vec<_> = set.files.iter().map(|f| (f.path.as_str(), f.status)).collect();
        assert_eq!(
            summary,
            vec![
                ("apis/changed.json", ChangeStatus::Modified),
                ("apis/fresh.json", ChangeStatus::Added),
                ("apis/gone.json", ChangeStatus::Deleted),
            ]
        );
        let changed = set.file("apis/changed.json").unwrap();
        assert_eq!(
            changed.new_id.as_deref(),
            Some(content_id(b"{\"a\":2}").as_str())
        );
    }

    #[test]
    fn test_content_id_is_sha256_hex() {
        assert_eq!(
            content_id(b"test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = DirectorySnapshot::changeset(&dir.path().join("nope"), dir.path(), commit())
            .unwrap_err();
        assert_eq!(err.kind(), apidelta_core::ExErrorKind::Io);
    }
}
