//! Error types for artifact ingress and structural edits

use std::path::PathBuf;

/// Errors raised while loading or editing a test class artifact
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// IO error while reading an existing artifact
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Existing artifact could not be understood
    #[error("corrupt artifact {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// A member with this name is already declared in the class
    #[error("member already declared: {0}")]
    DuplicateMember(String),

    /// Java grammar could not be loaded into the parser
    #[error("parser initialization failed: {0}")]
    ParserInit(String),
}

impl ArtifactError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create corrupt-artifact error for path
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error means the artifact exists but is unusable
    #[inline]
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}
