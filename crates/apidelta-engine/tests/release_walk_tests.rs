#![allow(clippy::unwrap_used, clippy::expect_used)]

/// Release walking over directory snapshots
///
/// Two checked-out trees per release go through the snapshot provider, the
/// release processor and the batch walk.
use apidelta_core::errors::ExErrorKind;
use apidelta_core::{CommitInfo, CommitRecord};
use apidelta_engine::{
    walk_releases, DirectorySnapshot, FileChange, ProcessorConfig, ReleaseChangeSet,
    ReleaseProcessor,
};
use chrono::DateTime;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn commit(id: &str, tag: &str, at: &str) -> CommitInfo {
    CommitInfo {
        commit_id: id.into(),
        tag: tag.into(),
        created_at: DateTime::parse_from_rfc3339(at).unwrap(),
    }
}

fn write_json(root: &Path, rel: &str, value: &Value) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn queue_model(members: &[&str], ops: Value) -> Value {
    let members: serde_json::Map<String, Value> = members
        .iter()
        .map(|m| (m.to_string(), json!({"shape": "Str"})))
        .collect();
    json!({
        "metadata": {
            "endpointPrefix": "sqs",
            "serviceId": "SQS",
            "serviceFullName": "Simple Queue"
        },
        "shapes": {
            "Str": {"type": "string"},
            "SendRequest": {"type": "structure", "members": members}
        },
        "operations": ops
    })
}

#[test]
fn test_snapshot_release_end_to_end() {
    // GIVEN an old tree with one service and a new tree that changes it,
    // adds a second service and ships release notes
    let (old, new) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    let send = json!({"Send": {"input": {"shape": "SendRequest"}}});
    write_json(old.path(), "apis/sqs.json", &queue_model(&["Body"], send.clone()));
    write_json(new.path(), "apis/sqs.json", &queue_model(&["Body", "Delay"], send));
    write_json(
        new.path(),
        "apis/sns.json",
        &json!({
            "metadata": {"endpointPrefix": "sns"},
            "shapes": {},
            "operations": {"Publish": {}}
        }),
    );
    write_json(
        new.path(),
        ".changes/1.4.0.json",
        &json!([{"category": "``sqs``", "description": "Adds delay"}]),
    );

    // WHEN processing the snapshot as release v1.4.0
    let set = DirectorySnapshot::changeset(
        old.path(),
        new.path(),
        commit("abcdef123", "v1.4.0", "2024-01-02T03:04:05+00:00"),
    )
    .unwrap();
    let processor = ReleaseProcessor::new(ProcessorConfig {
        model_prefix: "apis/".into(),
        ..ProcessorConfig::default()
    });
    let delta = processor.process(&set).unwrap();

    // THEN both services are reported in path order
    let names: Vec<_> = delta.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["sns", "sqs"]);

    let sns = &delta.service_changes[0];
    assert!(sns.new);
    assert!(sns.logs.is_empty());

    let sqs = &delta.service_changes[1];
    assert!(!sqs.new);
    assert_eq!(sqs.logs, vec!["Adds delay"]);
    assert_eq!(sqs.model_file.as_ref().map(String::len), Some(64));
    assert_eq!(sqs.changes[0].operation(), "Send");
    assert!(!sqs.changes[0].is_new());

    // AND the exported record carries the delta
    let record = CommitRecord::from_release(&delta);
    let exported = serde_json::to_value(&record).unwrap();
    assert_eq!(
        exported["service_changes"][1]["ops_changes"],
        json!({"Send": {"request": {"Delay": "string"}}})
    );
    assert_eq!(
        exported["service_changes"][1]["title"],
        json!("Simple Queue")
    );
}

#[test]
fn test_sequential_and_parallel_processing_agree() {
    let files: Vec<FileChange> = (0..12)
        .map(|i| {
            let body = json!({
                "metadata": {"endpointPrefix": format!("svc{:02}", i)},
                "shapes": {},
                "operations": {"Op": {}}
            });
            FileChange::added(
                format!("svc{:02}.json", i),
                serde_json::to_vec(&body).unwrap(),
                format!("id{}", i),
            )
        })
        .collect();
    let set = ReleaseChangeSet::new(commit("c1", "1.0.0", "2024-01-01T00:00:00+00:00"), files);

    let parallel = ReleaseProcessor::new(ProcessorConfig::default())
        .process(&set)
        .unwrap();
    let sequential = ReleaseProcessor::new(ProcessorConfig {
        parallel: false,
        ..ProcessorConfig::default()
    })
    .process(&set)
    .unwrap();

    assert_eq!(parallel, sequential);
    assert_eq!(parallel.len(), 12);
    assert_eq!(parallel.service_changes[0].name(), "svc00");
}

fn release(id: &str, at: &str, service: &str, body: &[u8]) -> ReleaseChangeSet {
    ReleaseChangeSet::new(
        commit(id, id, at),
        vec![FileChange::added(format!("{}.json", service), body.to_vec(), id)],
    )
}

fn valid(service: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "metadata": {"endpointPrefix": service},
        "operations": {"Get": {}, "Put": {}}
    }))
    .unwrap()
}

#[test]
fn test_walk_sorts_newest_first_and_summarises() {
    let releases = vec![
        release("r1", "2024-01-01T00:00:00+00:00", "alpha", &valid("alpha")),
        release("r2", "2024-03-01T00:00:00+00:00", "beta", &valid("beta")),
        ReleaseChangeSet::new(
            commit("r3", "r3", "2024-02-01T00:00:00+00:00"),
            vec![FileChange::added("notes.txt", b"nothing".to_vec(), "n")],
        ),
        release("r4", "2024-02-15T00:00:00+00:00", "alpha", &valid("alpha")),
    ];

    let processor = ReleaseProcessor::new(ProcessorConfig::default());
    let (deltas, summary) = walk_releases(&processor, releases).unwrap();

    let ids: Vec<_> = deltas.iter().map(|d| d.commit.commit_id.as_str()).collect();
    assert_eq!(ids, vec!["r2", "r4", "r1"]);
    assert_eq!(summary.processed, 4);
    assert_eq!(summary.releases_with_changes, 3);
    assert_eq!(summary.service_changes, 3);
    assert_eq!(summary.operation_changes, 6);
    assert_eq!(summary.distinct_services, 2);
    assert_eq!(summary.failed, 0);
}

#[test]
fn test_walk_stops_at_first_failure() {
    let releases = vec![
        release("ok", "2024-01-01T00:00:00+00:00", "alpha", &valid("alpha")),
        release("bad", "2024-01-02T00:00:00+00:00", "broken", b"{\"shapes\": {\"X\": {}}}"),
        release("later", "2024-01-03T00:00:00+00:00", "beta", &valid("beta")),
    ];

    let processor = ReleaseProcessor::new(ProcessorConfig::default());
    let err = walk_releases(&processor, releases).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ReleaseFailed);
    assert_eq!(err.commit_id(), Some("bad"));
    assert_eq!(err.path(), Some("broken.json"));
}

#[test]
fn test_walk_can_opt_into_continuing() {
    let releases = vec![
        release("ok", "2024-01-01T00:00:00+00:00", "alpha", &valid("alpha")),
        release("bad", "2024-01-02T00:00:00+00:00", "broken", b"not json"),
        release("later", "2024-01-03T00:00:00+00:00", "beta", &valid("beta")),
    ];

    let processor = ReleaseProcessor::new(ProcessorConfig {
        continue_on_error: true,
        ..ProcessorConfig::default()
    });
    let (deltas, summary) = walk_releases(&processor, releases).unwrap();

    assert_eq!(deltas.len(), 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.processed, 3);
}

#[test]
fn test_malformed_release_notes_fail_the_release() {
    let set = ReleaseChangeSet::new(
        commit("c9", "v9.0.0", "2024-01-01T00:00:00+00:00"),
        vec![
            FileChange::added(".changes/9.0.0.json", b"{\"not\": \"a list\"}".to_vec(), "x"),
            FileChange::added("svc.json", valid("svc"), "y"),
        ],
    );

    let err = ReleaseProcessor::new(ProcessorConfig::default())
        .process(&set)
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidChangeLog);
    assert_eq!(err.path(), Some(".changes/9.0.0.json"));
}
