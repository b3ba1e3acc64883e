//! Catalog loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// A dataset could not be read or parsed.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// The file is missing or unreadable.
    #[error("dataset '{}' could not be read: {source}", path.display())]
    Io {
        /// Dataset path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a JSON array of the expected records.
    #[error("dataset '{}' is not valid: {source}", path.display())]
    Malformed {
        /// Dataset path.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogLoadError {
    /// Path of the dataset that failed.
    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. } | Self::Malformed { path, .. } => path,
        }
    }
}
