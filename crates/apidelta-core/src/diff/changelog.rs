//! Release-note association.
//!
//! A release ships a JSON array of `{category, description}` entries. The
//! categories are loosely related to service identifiers, so a service is
//! matched by trying a fixed list of keys derived from its metadata until one
//! yields entries.

use crate::diff::model::ServiceChange;
use crate::errors::{DeltaError, Result};
use crate::model::ServiceMetadata;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Lower-cased category label to the release-note entries filed under it
pub type ChangeLog = BTreeMap<String, Vec<String>>;

#[derive(Debug, Deserialize)]
struct ChangeLogEntry {
    category: String,
    description: String,
}

/// Parse a release-note file
///
/// Categories lose surrounding backticks and are lower-cased; entries keep
/// file order within a category.
///
/// # Errors
///
/// `InvalidChangeLog` if the bytes are not an array of entries with string
/// `category` and `description` fields.
pub fn parse_change_log(bytes: &[u8]) -> Result<ChangeLog> {
    let entries: Vec<ChangeLogEntry> =
        serde_json::from_slice(bytes).map_err(|e| DeltaError::InvalidChangeLog {
            reason: e.to_string(),
        })?;

    let mut log = ChangeLog::new();
    for entry in entries {
        log.entry(entry.category.trim_matches('`').to_lowercase())
            .or_default()
            .push(entry.description);
    }
    Ok(log)
}

/// `serviceId` values whose release-note category is spelled differently
const LOG_ID_MAP: &[(&str, &str)] = &[
    ("Elastic Load Balancing v2", "elbv2"),
    ("Lex Runtime Service", "lexruntime"),
    ("SFN", "stepfunctions"),
    ("IoT 1Click Devices Service", "iot1click-devices"),
    ("SageMaker A2I Runtime", "augmentedairuntime"),
    ("Cognito Identity Provider", "cognitoidentityserviceprovider"),
    ("Cost Explorer", "savingsplans"),
    ("Budgets", "savingsplans"),
];

type Candidate = fn(&ServiceMetadata, &str) -> Option<String>;

/// Lookup keys in priority order; `None` or empty means "skip"
const CANDIDATES: &[Candidate] = &[
    |m, _| {
        let id = m.get_str("serviceId")?;
        LOG_ID_MAP
            .iter()
            .find(|(service_id, _)| *service_id == id)
            .map(|(_, category)| category.to_string())
    },
    |m, _| m.get_str("serviceId").map(str::to_string),
    |m, _| m.get_str("signingName").map(str::to_string),
    |m, _| m.get_str("endpointPrefix").map(str::to_string),
    |m, _| Some(m.str_or_empty("serviceAbbreviation").replace(' ', "-")),
    |m, _| {
        Some(
            m.str_or_empty("uid")
                .split('-')
                .filter(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()))
                .collect::<Vec<_>>()
                .join("-"),
        )
    },
    |m, _| Some(m.str_or_empty("endpointPrefix").replace('-', "")),
    |m, _| Some(m.str_or_empty("serviceId").replace(' ', "")),
    |m, _| Some(format!("{}service", m.str_or_empty("serviceId"))),
    |_, name| Some(format!("{}service", name.replace('-', ""))),
    |m, _| Some(m.str_or_empty("serviceId").replace(' ', "-")),
];

/// Release-note lookup keys for a service, lower-cased, in priority order
pub fn candidate_keys(metadata: &ServiceMetadata, service_name: &str) -> Vec<String> {
    CANDIDATES
        .iter()
        .filter_map(|candidate| candidate(metadata, service_name))
        .filter(|key| !key.is_empty())
        .map(|key| key.to_lowercase())
        .collect()
}

/// First non-empty entry list among the candidate keys
pub fn find_entries<'a>(
    change_log: &'a ChangeLog,
    metadata: &ServiceMetadata,
    service_name: &str,
) -> Option<&'a [String]> {
    candidate_keys(metadata, service_name)
        .into_iter()
        .find_map(|key| change_log.get(&key).filter(|entries| !entries.is_empty()))
        .map(Vec::as_slice)
}

impl ServiceChange {
    /// Attach this service's release-note entries, if any can be found
    ///
    /// Never fails: an unmatched service is logged and keeps an empty log.
    /// With no change log at all this is a no-op.
    pub fn associate_logs(&mut self, change_log: Option<&ChangeLog>) {
        let Some(change_log) = change_log.filter(|log| !log.is_empty()) else {
            return;
        };

        match find_entries(change_log, self.metadata(), self.service_name()) {
            Some(entries) => self.logs = entries.to_vec(),
            None => {
                let available: Vec<&str> = change_log.keys().map(String::as_str).collect();
                tracing::warn!(
                    service = %self.name(),
                    available = ?available,
                    "no change log entry found"
                );
            }
        }
    }
}
