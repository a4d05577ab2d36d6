//! Change result types.
//!
//! A [`ServiceChange`] is what one service diff yields; a [`ReleaseDelta`]
//! groups the service changes of one release (commit/tag pair).

use crate::model::ServiceMetadata;
use crate::traversal::Delta;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Commit metadata supplied by the history provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub commit_id: String,
    pub tag: String,
    pub created_at: DateTime<FixedOffset>,
}

/// Per-operation delta: request/response deltas, or one shared `both` delta
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationDelta {
    Shared {
        both: Delta,
    },
    Split {
        #[serde(skip_serializing_if = "Option::is_none")]
        request: Option<Delta>,
        #[serde(skip_serializing_if = "Option::is_none")]
        response: Option<Delta>,
    },
}

impl OperationDelta {
    /// Combine request/response deltas, collapsing identical ones into `both`
    ///
    /// Returns `None` when neither side changed.
    pub fn combine(request: Option<Delta>, response: Option<Delta>) -> Option<Self> {
        match (request, response) {
            (None, None) => None,
            (Some(request), Some(response)) if request == response => {
                Some(OperationDelta::Shared { both: request })
            }
            (request, response) => Some(OperationDelta::Split { request, response }),
        }
    }

    pub fn request(&self) -> Option<&Delta> {
        match self {
            OperationDelta::Split { request, .. } => request.as_ref(),
            OperationDelta::Shared { .. } => None,
        }
    }

    pub fn response(&self) -> Option<&Delta> {
        match self {
            OperationDelta::Split { response, .. } => response.as_ref(),
            OperationDelta::Shared { .. } => None,
        }
    }

    pub fn both(&self) -> Option<&Delta> {
        match self {
            OperationDelta::Shared { both } => Some(both),
            OperationDelta::Split { .. } => None,
        }
    }
}

/// One entry of a service change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    NewMethod {
        operation: String,
    },
    UpdatedMethod {
        operation: String,
        delta: OperationDelta,
    },
}

impl Change {
    pub fn operation(&self) -> &str {
        match self {
            Change::NewMethod { operation } | Change::UpdatedMethod { operation, .. } => operation,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Change::NewMethod { .. })
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::NewMethod { operation } => write!(f, "New Method: {}", operation),
            Change::UpdatedMethod { operation, .. } => write!(f, "Updated Method: {}", operation),
        }
    }
}

/// Changes of one service between two description versions
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceChange {
    service_name: String,
    metadata: ServiceMetadata,
    pub new: bool,
    pub changes: Vec<Change>,
    /// Opaque content identifier of the new model file, set by the caller
    pub model_file: Option<String>,
    pub commit: Option<CommitInfo>,
    /// Release-note entries associated with this service
    pub logs: Vec<String>,
}

impl ServiceChange {
    pub fn new(
        service_name: impl Into<String>,
        metadata: ServiceMetadata,
        changes: Vec<Change>,
        new: bool,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            metadata,
            new,
            changes,
            model_file: None,
            commit: None,
            logs: Vec::new(),
        }
    }

    /// Lower-cased service identifier
    pub fn name(&self) -> String {
        self.service_name.to_lowercase()
    }

    /// Service identifier as it appears in the description
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// `serviceFullName`, falling back to [`ServiceChange::name`]
    pub fn title(&self) -> String {
        self.metadata
            .get_str("serviceFullName")
            .map(str::to_string)
            .unwrap_or_else(|| self.name())
    }

    pub fn metadata(&self) -> &ServiceMetadata {
        &self.metadata
    }

    pub fn count_new(&self) -> usize {
        self.changes.iter().filter(|c| c.is_new()).count()
    }

    pub fn count_updated(&self) -> usize {
        self.changes.len() - self.count_new()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }
}

impl fmt::Display for ServiceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<service:{}", self.name())?;
        if let Some(commit) = &self.commit {
            write!(f, " date:{}", commit.created_at.format("%Y-%m-%d"))?;
        }
        write!(
            f,
            " updated:{} new:{} logs:{}>",
            self.count_updated(),
            self.count_new(),
            if self.logs.is_empty() { "no" } else { "yes" }
        )
    }
}

/// All service changes within one release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseDelta {
    pub commit: CommitInfo,
    pub service_changes: Vec<ServiceChange>,
}

impl ReleaseDelta {
    pub fn new(commit: CommitInfo, service_changes: Vec<ServiceChange>) -> Self {
        Self {
            commit,
            service_changes,
        }
    }

    pub fn len(&self) -> usize {
        self.service_changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.service_changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceChange> {
        self.service_changes.iter()
    }

    /// Number of distinct services touched
    pub fn service_count(&self) -> usize {
        self.service_changes
            .iter()
            .map(|s| s.name())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of operation-level changes across all services
    pub fn change_count(&self) -> usize {
        self.service_changes.iter().map(ServiceChange::len).sum()
    }
}

impl fmt::Display for ReleaseDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short_id: String = self.commit.commit_id.chars().take(5).collect();
        write!(
            f,
            "<release:{} created:{} commit:{} services:{} changes:{}>",
            self.commit.tag,
            self.commit.created_at.format("%Y-%m-%d"),
            short_id,
            self.service_count(),
            self.change_count()
        )
    }
}
