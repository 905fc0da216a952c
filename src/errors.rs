//! Error taxonomy for the caller-facing boundary. Malformed R source is
//! never an error: the analyzers absorb it and produce degraded metrics.
//! Only input selection and repository acquisition can fail an invocation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RqualError {
    #[error("target not found: {0}")]
    TargetNotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    #[error("failed to clone {url}")]
    Clone {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("failed to create clone directory")]
    CloneDir(#[source] std::io::Error),
}
