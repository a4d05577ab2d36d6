//! Exported records: the flat, serializable form of diff results consumed by
//! renderers and publishers.

use crate::diff::model::{Change, ReleaseDelta, ServiceChange};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceChangeRecord {
    pub name: String,
    pub title: String,
    /// Associated release-note entries, newline separated
    pub change_log: String,
    pub new: bool,
    pub ops_added: Vec<String>,
    pub ops_updated: Vec<String>,
    pub ops_changes: BTreeMap<String, serde_json::Value>,
    pub model_file: Option<String>,
}

impl ServiceChangeRecord {
    pub fn from_change(change: &ServiceChange) -> Self {
        let mut ops_added = Vec::new();
        let mut ops_updated = Vec::new();
        let mut ops_changes = BTreeMap::new();
        for entry in change.iter() {
            match entry {
                Change::NewMethod { operation } => ops_added.push(operation.clone()),
                Change::UpdatedMethod { operation, delta } => {
                    ops_updated.push(operation.clone());
                    // Delta serialization is infallible: string keys, no floats.
                    let value = serde_json::to_value(delta).unwrap_or(serde_json::Value::Null);
                    ops_changes.insert(operation.clone(), value);
                }
            }
        }

        Self {
            name: change.name(),
            title: change.title(),
            change_log: change.logs.join("\n"),
            new: change.new,
            ops_added,
            ops_updated,
            ops_changes,
            model_file: change.model_file.clone(),
        }
    }

    pub fn count_new(&self) -> usize {
        self.ops_added.len()
    }

    pub fn count_updated(&self) -> usize {
        self.ops_updated.len()
    }

    pub fn len(&self) -> usize {
        self.count_new() + self.count_updated()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One-line headline, e.g. `"ec2 - 2 new 3 updated"`
    pub fn slug(&self) -> String {
        let mut slug = format!("{} - ", self.name);
        if self.new {
            slug.push_str(&format!("new service - {} methods ", self.count_new()));
            return slug;
        }
        if self.count_new() > 0 {
            slug.push_str(&format!("{} new ", self.count_new()));
        }
        if self.count_updated() > 0 {
            slug.push_str(&format!("{} updated", self.count_updated()));
        }
        slug
    }
}

impl From<&ServiceChange> for ServiceChangeRecord {
    fn from(change: &ServiceChange) -> Self {
        Self::from_change(change)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: String,
    pub tag: String,
    pub created: DateTime<FixedOffset>,
    pub service_changes: Vec<ServiceChangeRecord>,
}

impl CommitRecord {
    pub fn from_release(release: &ReleaseDelta) -> Self {
        Self {
            id: release.commit.commit_id.clone(),
            tag: release.commit.tag.clone(),
            created: release.commit.created_at,
            service_changes: release.iter().map(ServiceChangeRecord::from).collect(),
        }
    }

    /// Records for one (lower-cased) service name
    pub fn select<'a>(
        &'a self,
        service_name: &'a str,
    ) -> impl Iterator<Item = &'a ServiceChangeRecord> + 'a {
        self.service_changes
            .iter()
            .filter(move |s| s.name == service_name)
    }

    /// Total operation changes across all services
    pub fn size(&self) -> usize {
        self.service_changes.iter().map(ServiceChangeRecord::len).sum()
    }
}
