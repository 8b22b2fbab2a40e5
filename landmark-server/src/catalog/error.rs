//! Catalog loading errors.

use std::path::PathBuf;

use crate::domain::LandmarkId;

/// Errors from loading the landmark catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Snapshot file could not be read
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file is not a valid catalog
    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two landmarks share an id
    #[error("duplicate landmark id: {0}")]
    DuplicateId(LandmarkId),
}
