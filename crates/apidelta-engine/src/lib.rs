//! apidelta engine - release processing around the core diff
//!
//! Feeds changed model files of a release through
//! [`apidelta_core::diff_service`], attaches release notes and commit
//! metadata, and walks batches of releases.

pub mod config;
pub mod errors;
pub mod fs_history;
pub mod history;
pub mod processor;
pub mod walk;

pub use config::ProcessorConfig;
pub use fs_history::DirectorySnapshot;
pub use history::{ChangeStatus, FileChange, HistoryProvider, ReleaseChangeSet};
pub use processor::ReleaseProcessor;
pub use walk::{walk_releases, WalkSummary};
