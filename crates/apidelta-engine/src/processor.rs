//! Release processing
//!
//! Diffs every changed model file of one release and assembles the results
//! into a [`ReleaseDelta`].
//!
//! ## Logging Ownership
//!
//! `ReleaseProcessor::process` owns lifecycle logging for `process_release`.
//! The per-service `diff_service` lifecycle is logged by the core.
//!
//! ## Failure policy
//!
//! The first model file that fails to parse or diff fails the whole release:
//! the failure is logged with the commit id and path, then returned. Results
//! of other files in the same release are discarded.

use crate::config::ProcessorConfig;
use crate::errors::{release_failed, Result};
use crate::history::{ChangeStatus, FileChange, ReleaseChangeSet};
use apidelta_core::diff::{diff_service, parse_change_log, ChangeLog};
use apidelta_core::errors::{ExError, ExErrorKind};
use apidelta_core::{log_op_end, log_op_error, log_op_start};
use apidelta_core::{ReleaseDelta, SchemaDescription, ServiceChange};
use rayon::prelude::*;

pub struct ReleaseProcessor {
    config: ProcessorConfig,
}

impl ReleaseProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Diff every changed model file of `release`
    ///
    /// ## Returns
    ///
    /// The release's service changes in file-path order; empty if no model
    /// file changed in a reportable way.
    ///
    /// ## Errors
    ///
    /// - `InvalidChangeLog`: the release-note file is malformed
    /// - `ReleaseFailed`: a model file failed to parse or diff; the cause is
    ///   the error's source
    pub fn process(&self, release: &ReleaseChangeSet) -> Result<ReleaseDelta> {
        let commit = &release.commit;
        log_op_start!(
            "process_release",
            commit_id = %commit.commit_id,
            tag = %commit.tag
        );
        let start = std::time::Instant::now();

        let result = self.process_impl(release).map_err(|e| {
            log_op_error!(
                "process_release",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                commit_id = %commit.commit_id,
                tag = %commit.tag
            );
            e
        })?;

        log_op_end!(
            "process_release",
            duration_ms = start.elapsed().as_millis() as u64,
            commit_id = %commit.commit_id,
            tag = %commit.tag,
            changes = result.len()
        );

        Ok(result)
    }

    fn process_impl(&self, release: &ReleaseChangeSet) -> Result<ReleaseDelta> {
        let commit = &release.commit;
        let change_log_path = self.config.change_log_path(&commit.tag);
        let change_log = match &change_log_path {
            Some(path) => load_change_log(release, path)?,
            None => None,
        };

        let models: Vec<&FileChange> = release
            .files
            .iter()
            .filter(|f| self.config.is_model_path(&f.path))
            .filter(|f| match f.status {
                ChangeStatus::Added | ChangeStatus::Modified => true,
                other => {
                    tracing::warn!(
                        commit_id = %commit.commit_id,
                        path = %f.path,
                        change = %other,
                        "service file unknown change"
                    );
                    false
                }
            })
            .collect();

        let results: Vec<Result<Option<ServiceChange>>> = if self.config.parallel {
            models.par_iter().map(|f| diff_file(f)).collect()
        } else {
            models.iter().map(|f| diff_file(f)).collect()
        };

        let mut service_changes = Vec::new();
        for (file, result) in models.iter().zip(results) {
            let change = match result {
                Ok(change) => change,
                Err(e) => {
                    tracing::error!(
                        commit_id = %commit.commit_id,
                        path = %file.path,
                        error = %e,
                        "error processing model file"
                    );
                    return Err(release_failed(&commit.commit_id, &file.path, e));
                }
            };
            let Some(mut change) = change else {
                continue;
            };

            change.model_file = file.new_id.clone();
            change.commit = Some(commit.clone());
            change.associate_logs(change_log.as_ref());
            tracing::info!(service_change = %change, "service changed");
            service_changes.push(change);
        }

        Ok(ReleaseDelta::new(commit.clone(), service_changes))
    }
}

/// Release notes shipped with the release itself, if any
fn load_change_log(release: &ReleaseChangeSet, path: &str) -> Result<Option<ChangeLog>> {
    let Some(bytes) = release.file(path).and_then(|f| f.new_content.as_deref()) else {
        return Ok(None);
    };

    parse_change_log(bytes).map(Some).map_err(|e| {
        ExError::from(e)
            .with_commit_id(release.commit.commit_id.clone())
            .with_path(path)
    })
}

fn diff_file(file: &FileChange) -> Result<Option<ServiceChange>> {
    let new = parse_model(file, file.new_content.as_deref())?;
    let old = match file.status {
        ChangeStatus::Modified => Some(parse_model(file, file.old_content.as_deref())?),
        _ => None,
    };
    diff_service(&new, old.as_ref()).map_err(|e| {
        ExError::from(e)
            .with_service(new.metadata.service_name())
            .with_path(file.path.clone())
    })
}

fn parse_model(file: &FileChange, content: Option<&[u8]>) -> Result<SchemaDescription> {
    let bytes = content.ok_or_else(|| {
        ExError::new(ExErrorKind::Internal)
            .with_op("read_model")
            .with_path(file.path.clone())
            .with_message(format!("no content for {} file", file.status))
    })?;
    SchemaDescription::from_slice(bytes).map_err(|e| {
        ExError::from(e)
            .with_op("read_model")
            .with_path(file.path.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidelta_core::CommitInfo;
    use chrono::DateTime;
    use serde_json::json;

    fn commit(tag: &str) -> CommitInfo {
        CommitInfo {
            commit_id: "1234567890".into(),
            tag: tag.into(),
            created_at: DateTime::parse_from_rfc3339("2023-03-03T00:00:00+00:00").unwrap(),
        }
    }

    fn model(service: &str, ops: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "metadata": {"endpointPrefix": service},
            "shapes": {},
            "operations": ops
        }))
        .unwrap()
    }

    #[test]
    fn test_non_model_files_are_ignored() {
        let release = ReleaseChangeSet::new(
            commit("1.0.0"),
            vec![FileChange::added("README.md", b"not json".to_vec(), "r")],
        );
        let delta = ReleaseProcessor::new(ProcessorConfig::default())
            .process(&release)
            .unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn test_deleted_model_is_skipped() {
        let release = ReleaseChangeSet::new(
            commit("1.0.0"),
            vec![FileChange::deleted("svc.json", model("svc", json!({"A": {}})))],
        );
        let delta = ReleaseProcessor::new(ProcessorConfig::default())
            .process(&release)
            .unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn test_added_model_is_stamped() {
        let release = ReleaseChangeSet::new(
            commit("v2.0.0"),
            vec![
                FileChange::added("svc.json", model("svc", json!({"A": {}})), "content-id"),
                FileChange::added(
                    ".changes/2.0.0.json",
                    br#"[{"category": "svc", "description": "launch"}]"#.to_vec(),
                    "log-id",
                ),
            ],
        );
        let delta = ReleaseProcessor::new(ProcessorConfig::default())
            .process(&release)
            .unwrap();

        assert_eq!(delta.len(), 1);
        let change = &delta.service_changes[0];
        assert!(change.new);
        assert_eq!(change.model_file.as_deref(), Some("content-id"));
        assert_eq!(
            change.commit.as_ref().map(|c| c.tag.as_str()),
            Some("v2.0.0")
        );
        assert_eq!(change.logs, vec!["launch"]);
    }

    #[test]
    fn test_malformed_model_fails_the_release() {
        let release = ReleaseChangeSet::new(
            commit("1.0.0"),
            vec![FileChange::added("bad.json", b"{\"shapes\": {\"X\": {}}}".to_vec(), "x")],
        );
        let err = ReleaseProcessor::new(ProcessorConfig::default())
            .process(&release)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ReleaseFailed);
        assert_eq!(err.path(), Some("bad.json"));
        assert_eq!(err.root_cause().kind(), ExErrorKind::MissingTypeTag);
    }
}
