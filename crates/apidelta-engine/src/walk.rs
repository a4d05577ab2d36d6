//! Batch walking across releases
//!
//! Runs the release processor over a sequence of change sets. A failing
//! release stops the walk unless the processor's configuration opts into
//! `continue_on_error`, in which case it is logged, counted and skipped.

use crate::errors::Result;
use crate::history::ReleaseChangeSet;
use crate::processor::ReleaseProcessor;
use apidelta_core::ReleaseDelta;
use apidelta_core_types::RunId;
use std::collections::BTreeSet;

/// Counts over one walk
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WalkSummary {
    /// Fresh per walk; tags the walk's log events
    pub run_id: RunId,
    /// Releases handed to the processor
    pub processed: usize,
    pub releases_with_changes: usize,
    pub service_changes: usize,
    pub operation_changes: usize,
    pub distinct_services: usize,
    /// Releases skipped after an error (only with `continue_on_error`)
    pub failed: usize,
}

/// Process `releases` in order
///
/// ## Returns
///
/// The non-empty release deltas, newest first by commit timestamp, and a
/// summary of the walk.
///
/// ## Errors
///
/// The first release failure, unless `continue_on_error` is set.
pub fn walk_releases<I>(
    processor: &ReleaseProcessor,
    releases: I,
) -> Result<(Vec<ReleaseDelta>, WalkSummary)>
where
    I: IntoIterator<Item = ReleaseChangeSet>,
{
    let mut summary = WalkSummary::default();
    let mut deltas = Vec::new();

    for release in releases {
        summary.processed += 1;
        match processor.process(&release) {
            Ok(delta) if delta.is_empty() => {}
            Ok(delta) => deltas.push(delta),
            Err(e) if processor.config().continue_on_error => {
                tracing::warn!(
                    run_id = %summary.run_id,
                    commit_id = %release.commit.commit_id,
                    error = %e,
                    "release failed, continuing"
                );
                summary.failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    deltas.sort_by(|a, b| b.commit.created_at.cmp(&a.commit.created_at));

    let services: BTreeSet<String> = deltas
        .iter()
        .flat_map(|d| d.iter().map(|s| s.name()))
        .collect();
    summary.releases_with_changes = deltas.len();
    summary.service_changes = deltas.iter().map(ReleaseDelta::len).sum();
    summary.operation_changes = deltas.iter().map(ReleaseDelta::change_count).sum();
    summary.distinct_services = services.len();

    tracing::info!(
        run_id = %summary.run_id,
        processed = summary.processed,
        releases = summary.releases_with_changes,
        service_changes = summary.service_changes,
        operation_changes = summary.operation_changes,
        services = summary.distinct_services,
        failed = summary.failed,
        "walk complete"
    );

    Ok((deltas, summary))
}
