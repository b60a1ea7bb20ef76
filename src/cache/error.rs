//! Error types for cache generation operations.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the generation directory lifecycle.
///
/// Absence of a generation is not an error; lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache root could not be listed.
    #[error("Failed to read cache root {path}: {source}")]
    ReadRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A new generation directory could not be created.
    #[error("Failed to create generation directory {path}: {source}")]
    CreateGeneration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A generation subtree was not fully removed.
    #[error("Failed to remove {path}: {source}")]
    RemoveTree {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    /// Stable machine-readable code for result items
    pub fn code(&self) -> &'static str {
        match self {
            CacheError::ReadRoot { .. } => "read_root",
            CacheError::CreateGeneration { .. } => "create_generation",
            CacheError::RemoveTree { .. } => "remove_tree",
        }
    }
}

/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
