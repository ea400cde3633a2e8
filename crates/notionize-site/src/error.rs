//! Error types for site walking.

use std::path::PathBuf;

/// Site walking error.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// Site directory does not exist or is not a directory.
    #[error("Site directory not found: {}", .0.display())]
    SiteDirNotFound(PathBuf),

    /// Directory listing failed.
    #[error("Failed to read directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single page could not be read. Logged and skipped during a walk.
    #[error("Failed to read page {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Exclusion pattern is not a valid glob.
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
