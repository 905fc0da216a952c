//! Analysis configuration with an optional `rqual.toml` override at the
//! analysis root. Absent or unparseable config falls back to defaults with
//! a warning rather than failing the run.

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = "rqual.toml";

/// Extensions the walker accepts.
pub const R_EXTENSIONS: &[&str] = &["r", "R", "Rmd"];

/// Directory names pruned during traversal.
pub const SKIP_DIRECTORIES: &[&str] = &[".git", "node_modules", "__pycache__", ".Rproj.user"];

/// Tie-break order for the repository-level paradigm label. A convention,
/// not hard law, which is why it lives in configuration.
pub const PARADIGM_PRECEDENCE: &[&str] = &["functional", "oop", "mixed"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub extensions: Vec<String>,
    pub skip_directories: Vec<String>,
    /// Extra glob patterns to exclude, matched against full paths.
    pub ignore_patterns: Vec<String>,
    pub paradigm_precedence: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extensions: R_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            skip_directories: SKIP_DIRECTORIES.iter().map(|s| s.to_string()).collect(),
            ignore_patterns: Vec::new(),
            paradigm_precedence: PARADIGM_PRECEDENCE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Load configuration from `<root>/rqual.toml` when present.
pub fn load(root: &Path) -> AnalysisConfig {
    let path = root.join(CONFIG_FILE);
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return AnalysisConfig::default();
    };
    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring invalid {}: {}", path.display(), e);
            AnalysisConfig::default()
        }
    }
}
