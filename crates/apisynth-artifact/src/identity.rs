//! Artifact identity
//!
//! One artifact exists per HTTP method group. Its class name, package and
//! location on disk are a pure function of the group label and the
//! configured package/test-source root.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

/// Suffix appended to the group label to form the class name
pub const CLASS_SUFFIX: &str = "Tests";

/// Where and under which names a group's test class lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactIdentity {
    class_name: String,
    package_name: String,
    file_path: PathBuf,
}

impl ArtifactIdentity {
    /// Derive the identity for a method group (e.g. `GET` -> `GETTests`)
    ///
    /// The file lands at `<test_source_dir>/<package as dirs>/<class>.java`.
    #[must_use]
    pub fn for_group(group: &str, package_name: &str, test_source_dir: &Path) -> Self {
        let class_name = format!("{group}{CLASS_SUFFIX}");
        let mut file_path = test_source_dir.to_path_buf();
        for segment in package_name.split('.').filter(|s| !s.is_empty()) {
            file_path.push(segment);
        }
        file_path.push(format!("{class_name}.java"));

        Self {
            class_name,
            package_name: package_name.to_string(),
            file_path,
        }
    }

    /// Declared class name
    #[inline]
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Java package of the class (may be empty for the default package)
    #[inline]
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Location of the source file
    #[inline]
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl Display for ArtifactIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.package_name.is_empty() {
            write!(f, "{}", self.class_name)
        } else {
            write!(f, "{}.{}", self.package_name, self.class_name)
        }
    }
}
