//! Error types for apisynth core
//!
//! Errors are isolated per artifact group: an [`SynthError`] recorded for
//! one group never prevents the remaining groups from being processed.

use std::path::PathBuf;

use apisynth_artifact::ArtifactError;
use apisynth_composition::ResolveError;

use crate::catalog::HttpMethod;
use crate::config::ConfigError;
use crate::openapi::CatalogError;

/// Main synthesis error type
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// Malformed catalog entry; only that operation is skipped
    #[error("invalid operation {method} {path:?}: {reason}")]
    InvalidOperation {
        method: HttpMethod,
        path: String,
        reason: String,
    },

    /// Existing artifact cannot be understood; the group is aborted
    #[error("artifact corrupt: {0}")]
    ArtifactCorrupt(#[from] ArtifactError),

    /// Resolver could not answer; the candidate was skipped
    #[error("conflict resolution unavailable for {candidate}: {source}")]
    ConflictResolutionUnavailable {
        candidate: String,
        #[source]
        source: ResolveError,
    },

    /// Persisting an artifact failed; the group is aborted
    #[error("write failed: {0}")]
    WriteFailure(#[from] WriteError),

    /// API description could not be loaded
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration is unusable
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors persisting a merged artifact
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Filesystem failure
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file changed on disk between load and write
    #[error("{path} changed on disk since it was loaded")]
    StaleArtifact { path: PathBuf },

    /// Structural model rejected an insertion
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl WriteError {
    pub(crate) fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for synthesis operations
pub type Result<T> = std::result::Result<T, SynthError>;
