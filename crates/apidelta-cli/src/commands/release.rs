//! Release command
//!
//! Usage: apidelta release --old-dir <DIR> --new-dir <DIR> --tag <TAG> [--config <FILE>] [--json]

use anyhow::{Context, Result};
use apidelta_core::{CommitInfo, CommitRecord, ServiceChangeRecord};
use apidelta_engine::{
    walk_releases, DirectorySnapshot, HistoryProvider, ProcessorConfig, ReleaseProcessor,
};
use chrono::{DateTime, FixedOffset, Utc};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReleaseArgs {
    /// Tree of the previous release
    #[arg(long)]
    pub old_dir: PathBuf,

    /// Tree of the new release
    #[arg(long)]
    pub new_dir: PathBuf,

    /// Release tag, e.g. v1.4.0
    #[arg(long)]
    pub tag: String,

    /// Commit identifier (defaults to the tag)
    #[arg(long)]
    pub commit_id: Option<String>,

    /// Release timestamp in RFC 3339 (defaults to now)
    #[arg(long)]
    pub date: Option<String>,

    /// TOML processor configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub model_prefix: Option<String>,

    #[arg(long)]
    pub model_suffix: Option<String>,

    /// Release-note directory inside the new tree
    #[arg(long)]
    pub changes_dir: Option<String>,

    /// Only process model paths containing this name (repeatable)
    #[arg(long = "service")]
    pub services: Vec<String>,

    /// Diff model files one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Print commit records as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute release command
pub fn execute(args: ReleaseArgs) -> Result<()> {
    let config = load_config(&args)?;
    let created_at: DateTime<FixedOffset> = match &args.date {
        Some(date) => DateTime::parse_from_rfc3339(date)
            .with_context(|| format!("invalid --date '{}'", date))?,
        None => Utc::now().into(),
    };
    let commit = CommitInfo {
        commit_id: args.commit_id.clone().unwrap_or_else(|| args.tag.clone()),
        tag: args.tag.clone(),
        created_at,
    };

    let snapshot = DirectorySnapshot::new(args.old_dir.clone(), args.new_dir.clone(), commit);
    let processor = ReleaseProcessor::new(config);
    let (deltas, summary) = walk_releases(&processor, snapshot.releases()?)?;

    if args.json {
        let records: Vec<CommitRecord> = deltas.iter().map(CommitRecord::from_release).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if deltas.is_empty() {
        println!("no changes");
        return Ok(());
    }
    for delta in &deltas {
        println!("{}", delta);
        for change in delta.iter() {
            println!("  {}", ServiceChangeRecord::from(change).slug());
        }
    }
    println!(
        "{} service change(s), {} operation change(s)",
        summary.service_changes, summary.operation_changes
    );
    Ok(())
}

fn load_config(args: &ReleaseArgs) -> Result<ProcessorConfig> {
    let mut config = match &args.config {
        Some(path) => ProcessorConfig::load(path)?,
        None => ProcessorConfig::default(),
    };
    if let Some(prefix) = &args.model_prefix {
        config.model_prefix = prefix.clone();
    }
    if let Some(suffix) = &args.model_suffix {
        config.model_suffix = suffix.clone();
    }
    if let Some(dir) = &args.changes_dir {
        config.changes_dir = Some(dir.clone());
    }
    if !args.services.is_empty() {
        config.services = args.services.clone();
    }
    if args.sequential {
        config.parallel = false;
    }
    Ok(config)
}
