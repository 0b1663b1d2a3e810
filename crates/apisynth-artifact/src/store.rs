//! Artifact store: loads a group's test class into an [`ArtifactSnapshot`]

use std::collections::BTreeSet;
use std::io::ErrorKind;

use crate::error::ArtifactError;
use crate::hash::ContentHash;
use crate::identity::ArtifactIdentity;
use crate::java::parse_test_class;
use crate::model::{ShellTemplate, TestClass};

/// A test class as loaded at the start of a run
///
/// # Invariants
/// - `existing` holds exactly the method names declared when loaded
/// - `base` is the hash of the file as read, or `None` if it did not exist
#[derive(Debug, Clone)]
pub struct ArtifactSnapshot {
    identity: ArtifactIdentity,
    class: TestClass,
    existing: BTreeSet<String>,
    base: Option<ContentHash>,
}

impl ArtifactSnapshot {
    /// Identity of the artifact
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &ArtifactIdentity {
        &self.identity
    }

    /// Structural representation
    #[inline]
    #[must_use]
    pub fn class(&self) -> &TestClass {
        &self.class
    }

    /// Mutable structural representation
    #[inline]
    pub fn class_mut(&mut self) -> &mut TestClass {
        &mut self.class
    }

    /// Method names declared when the artifact was loaded
    #[inline]
    #[must_use]
    pub fn existing_method_names(&self) -> &BTreeSet<String> {
        &self.existing
    }

    /// Body fingerprint of a method declared when loaded
    #[must_use]
    pub fn method_fingerprint(&self, name: &str) -> Option<ContentHash> {
        if !self.existing.contains(name) {
            return None;
        }
        self.class.method(name).and_then(|m| m.fingerprint())
    }

    /// Hash of the file contents as loaded (`None` if the file was absent)
    #[inline]
    #[must_use]
    pub fn base_hash(&self) -> Option<ContentHash> {
        self.base
    }

    /// Whether the artifact did not exist on disk when loaded
    #[inline]
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.base.is_none()
    }
}

/// Loads test class artifacts from disk
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    template: ShellTemplate,
}

impl ArtifactStore {
    /// Create store seeding fresh classes from `template`
    #[inline]
    #[must_use]
    pub fn new(template: ShellTemplate) -> Self {
        Self { template }
    }

    /// Load the artifact for `identity`
    ///
    /// A missing file yields an empty class shell. An existing file is
    /// parsed and its declared method names collected.
    ///
    /// # Errors
    /// - [`ArtifactError::Corrupt`] if the file cannot be parsed or lacks the class
    /// - [`ArtifactError::Io`] if the file exists but cannot be read
    pub fn load(&self, identity: &ArtifactIdentity) -> Result<ArtifactSnapshot, ArtifactError> {
        let path = identity.file_path();

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(artifact = %identity, "no existing artifact, seeding shell");
                return Ok(ArtifactSnapshot {
                    identity: identity.clone(),
                    class: TestClass::shell(identity, &self.template),
                    existing: BTreeSet::new(),
                    base: None,
                });
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(ArtifactError::corrupt(path, "file is not valid UTF-8"));
            }
            Err(e) => return Err(ArtifactError::io_error(path, e)),
        };

        let class = parse_test_class(&source, identity.class_name(), path)?;
        let existing: BTreeSet<String> = class.method_names().map(str::to_string).collect();

        tracing::debug!(
            artifact = %identity,
            methods = existing.len(),
            "loaded existing artifact"
        );

        Ok(ArtifactSnapshot {
            identity: identity.clone(),
            class,
            existing,
            base: Some(ContentHash::compute(source.as_bytes())),
        })
    }
}
