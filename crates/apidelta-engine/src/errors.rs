//! Error handling for apidelta-engine
//!
//! Wraps apidelta-core ExError with engine-specific helpers

use apidelta_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for `path`
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a configuration error
pub fn config_error(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("load_config")
        .with_message(reason)
}

/// Wrap a per-file failure with the release it happened in
pub fn release_failed(commit_id: &str, path: &str, source: ExError) -> ExError {
    ExError::new(ExErrorKind::ReleaseFailed)
        .with_op("process_release")
        .with_commit_id(commit_id)
        .with_path(path)
        .with_message("error processing model file")
        .with_source(source)
}
