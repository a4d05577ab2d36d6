//! History provider boundary
//!
//! A history provider turns some version store (a git repository, directory
//! snapshots, ...) into [`ReleaseChangeSet`]s: commit metadata plus the raw
//! bytes of every changed file.

use crate::errors::Result;
use apidelta_core::CommitInfo;
use std::fmt;

/// How a file changed within a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    /// Any other status code reported by the provider (renames, copies, ...)
    Other(char),
}

impl ChangeStatus {
    pub fn status_char(self) -> char {
        match self {
            ChangeStatus::Added => 'A',
            ChangeStatus::Modified => 'M',
            ChangeStatus::Deleted => 'D',
            ChangeStatus::Other(c) => c,
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_char())
    }
}

/// One changed file of a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    pub status: ChangeStatus,
    pub old_content: Option<Vec<u8>>,
    pub new_content: Option<Vec<u8>>,
    /// Content identifier of the new version
    pub new_id: Option<String>,
}

impl FileChange {
    pub fn added(path: impl Into<String>, content: Vec<u8>, id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: ChangeStatus::Added,
            old_content: None,
            new_content: Some(content),
            new_id: Some(id.into()),
        }
    }

    pub fn modified(
        path: impl Into<String>,
        old_content: Vec<u8>,
        new_content: Vec<u8>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            status: ChangeStatus::Modified,
            old_content: Some(old_content),
            new_content: Some(new_content),
            new_id: Some(id.into()),
        }
    }

    pub fn deleted(path: impl Into<String>, old_content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            status: ChangeStatus::Deleted,
            old_content: Some(old_content),
            new_content: None,
            new_id: None,
        }
    }
}

/// Everything that changed in one release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseChangeSet {
    pub commit: CommitInfo,
    pub files: Vec<FileChange>,
}

impl ReleaseChangeSet {
    pub fn new(commit: CommitInfo, files: Vec<FileChange>) -> Self {
        Self { commit, files }
    }

    pub fn file(&self, path: &str) -> Option<&FileChange> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// Source of release change sets
pub trait HistoryProvider {
    /// Change sets in release order (oldest first)
    ///
    /// # Errors
    ///
    /// Provider-specific I/O failures.
    fn releases(&self) -> Result<Vec<ReleaseChangeSet>>;
}
