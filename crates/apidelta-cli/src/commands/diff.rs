//! Diff command
//!
//! Usage: apidelta diff --new <FILE> [--old <FILE>] [--changes <FILE>] [--tag <TAG>]

use anyhow::{Context, Result};
use apidelta_core::diff::{diff_service, parse_change_log};
use apidelta_core::{CommitInfo, CommitRecord, ReleaseDelta, SchemaDescription, ServiceChangeRecord};
use apidelta_engine::fs_history::content_id;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// New version of the service description
    #[arg(long)]
    pub new: PathBuf,

    /// Previous version; omit for a new service
    #[arg(long)]
    pub old: Option<PathBuf>,

    /// Release-note file to associate with the change
    #[arg(long)]
    pub changes: Option<PathBuf>,

    /// Release tag; when given, output is a commit record for that tag
    #[arg(long)]
    pub tag: Option<String>,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> Result<()> {
    let new_bytes = read(&args.new)?;
    let new = SchemaDescription::from_slice(&new_bytes)
        .with_context(|| format!("parsing {}", args.new.display()))?;
    let old = match &args.old {
        Some(path) => Some(
            SchemaDescription::from_slice(&read(path)?)
                .with_context(|| format!("parsing {}", path.display()))?,
        ),
        None => None,
    };
    let change_log = match &args.changes {
        Some(path) => Some(
            parse_change_log(&read(path)?)
                .with_context(|| format!("parsing {}", path.display()))?,
        ),
        None => None,
    };

    let Some(mut change) = diff_service(&new, old.as_ref())? else {
        println!("no changes");
        return Ok(());
    };
    let model_id = content_id(&new_bytes);
    change.model_file = Some(model_id.clone());
    change.associate_logs(change_log.as_ref());

    let output = match args.tag {
        Some(tag) => {
            let commit = CommitInfo {
                commit_id: model_id,
                tag,
                created_at: chrono::Utc::now().into(),
            };
            change.commit = Some(commit.clone());
            let release = ReleaseDelta::new(commit, vec![change]);
            serde_json::to_string_pretty(&CommitRecord::from_release(&release))?
        }
        None => serde_json::to_string_pretty(&ServiceChangeRecord::from(&change))?,
    };
    println!("{}", output);
    Ok(())
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}
