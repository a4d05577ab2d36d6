//! Release processor configuration
//!
//! Read from a TOML file; every key is optional. CLI flags are applied on
//! top by the caller.

use crate::errors::{config_error, io_error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Only paths starting with this prefix are model files
    pub model_prefix: String,

    /// Only paths ending with this suffix are model files
    pub model_suffix: String,

    /// Directory of `<tag>.json` release-note files; `None` disables loading
    pub changes_dir: Option<String>,

    /// If non-empty, only model paths containing one of these are processed
    pub services: Vec<String>,

    /// Diff a release's model files on the rayon pool
    pub parallel: bool,

    /// Keep walking after a failed release instead of stopping
    pub continue_on_error: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            model_prefix: String::new(),
            model_suffix: ".json".to_string(),
            changes_dir: Some(".changes".to_string()),
            services: Vec::new(),
            parallel: true,
            continue_on_error: false,
        }
    }
}

impl ProcessorConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the document is not valid TOML or has mistyped keys.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| config_error(e.to_string()))
    }

    /// Load a TOML file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `InvalidConfig` if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| io_error("load_config", path, e))?;
        Self::from_toml_str(&content).map_err(|e| e.with_path(path.display().to_string()))
    }

    /// Whether a changed file path is a model file this processor handles
    ///
    /// Release-note files are never model files, even when they match the
    /// prefix and suffix.
    pub fn is_model_path(&self, path: &str) -> bool {
        path.starts_with(&self.model_prefix)
            && path.ends_with(&self.model_suffix)
            && !self.is_change_log_path(path)
            && (self.services.is_empty() || self.services.iter().any(|s| path.contains(s.as_str())))
    }

    fn is_change_log_path(&self, path: &str) -> bool {
        match self.changes_dir.as_deref().map(|d| d.trim_end_matches('/')) {
            Some(dir) if !dir.is_empty() => path
                .strip_prefix(dir)
                .is_some_and(|rest| rest.starts_with('/')),
            _ => false,
        }
    }

    /// Path of the release-note file for `tag`, if loading is enabled
    pub fn change_log_path(&self, tag: &str) -> Option<String> {
        let dir = self.changes_dir.as_deref()?;
        let file = format!("{}.json", tag.trim_start_matches('v'));
        if dir.is_empty() {
            Some(file)
        } else {
            Some(format!("{}/{}", dir.trim_end_matches('/'), file))
        }
    }
}
