//! Artifact writer
//!
//! Applies a [`MergePlan`] to a loaded snapshot and persists the result.
//! Each artifact has a single writer for the run: the file is written at
//! most once, only when the plan inserts something, and only if the file
//! on disk still matches what was loaded.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use apisynth_artifact::{ArtifactSnapshot, ContentHash};
use apisynth_composition::MergePlan;
use tempfile::NamedTempFile;

use crate::error::WriteError;

/// Result of applying a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Merged class persisted
    Written {
        path: PathBuf,
        hash: ContentHash,
        added: Vec<String>,
    },
    /// No insertions; file untouched
    Unchanged,
}

impl WriteOutcome {
    /// Check if the file was written
    #[inline]
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }

    /// Names of inserted methods (empty when unchanged)
    #[must_use]
    pub fn added(&self) -> &[String] {
        match self {
            Self::Written { added, .. } => added,
            Self::Unchanged => &[],
        }
    }
}

/// Persists merged artifacts
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Create writer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Insert the plan's methods into `snapshot` and write the class
    ///
    /// All insertions are applied to the model before anything touches the
    /// disk, so a failure leaves the file as it was.
    ///
    /// # Errors
    /// - [`WriteError::Artifact`] if an insertion would duplicate a member
    /// - [`WriteError::StaleArtifact`] if the file changed since load
    /// - [`WriteError::Io`] on filesystem failure
    pub fn apply(
        &self,
        snapshot: &mut ArtifactSnapshot,
        plan: &MergePlan,
    ) -> Result<WriteOutcome, WriteError> {
        let mut added = Vec::with_capacity(plan.insertion_count());
        for (name, definition) in plan.insertions() {
            snapshot.class_mut().add_method(definition, name)?;
            added.push(name.to_string());
        }

        if added.is_empty() {
            tracing::debug!(artifact = %snapshot.identity(), "no insertions, leaving file untouched");
            return Ok(WriteOutcome::Unchanged);
        }

        let path = snapshot.identity().file_path().to_path_buf();
        let created = snapshot.is_new();
        let source = snapshot.class().render();

        check_unchanged(&path, snapshot.base_hash())?;
        persist(&path, source.as_bytes())?;

        let hash = ContentHash::compute(source.as_bytes());
        tracing::info!(
            path = %path.display(),
            hash = %hash.short(),
            added = added.len(),
            created,
            "wrote artifact"
        );

        Ok(WriteOutcome::Written { path, hash, added })
    }
}

/// Refuse to write if the file no longer matches what was loaded
fn check_unchanged(path: &Path, base: Option<ContentHash>) -> Result<(), WriteError> {
    let current = match std::fs::read(path) {
        Ok(bytes) => Some(ContentHash::compute(&bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(WriteError::io_error(path, e)),
    };

    if current == base {
        Ok(())
    } else {
        tracing::warn!(path = %path.display(), "artifact changed on disk since load");
        Err(WriteError::StaleArtifact {
            path: path.to_path_buf(),
        })
    }
}

/// Write to a temp file beside `path`, then rename over it
fn persist(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| WriteError::io_error(dir, e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| WriteError::io_error(dir, e))?;
    temp.write_all(contents)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| WriteError::io_error(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| WriteError::io_error(path, e.error))?;
    Ok(())
}
