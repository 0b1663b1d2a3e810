//! Testing utilities for apisynth workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use apisynth_artifact::{parse_test_class, ArtifactIdentity};
use apisynth_composition::{ConflictResolver, ResolveError};
use tempfile::TempDir;

pub const TEST_PACKAGE: &str = "org.example";

/// A temporary test-source root
#[derive(Debug)]
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn identity(&self, group: &str) -> ArtifactIdentity {
        ArtifactIdentity::for_group(group, TEST_PACKAGE, self.root())
    }

    pub fn class_path(&self, group: &str) -> PathBuf {
        self.identity(group).file_path().to_path_buf()
    }

    pub fn write_class(&self, group: &str, source: &str) -> PathBuf {
        let path = self.class_path(group);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, source).unwrap();
        path
    }

    pub fn read_class(&self, group: &str) -> String {
        std::fs::read_to_string(self.class_path(group)).unwrap()
    }

    pub fn class_exists(&self, group: &str) -> bool {
        self.class_path(group).exists()
    }

    /// Every file under the root, relative path -> contents, sorted
    pub fn snapshot(&self) -> Vec<(PathBuf, String)> {
        let mut files = Vec::new();
        collect_files(self.root(), self.root(), &mut files);
        files.sort();
        files
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else {
            let contents = std::fs::read_to_string(&path).unwrap();
            out.push((path.strip_prefix(root).unwrap().to_path_buf(), contents));
        }
    }
}

/// Resolver answering a fixed value and recording every call
#[derive(Debug, Clone, Default)]
pub struct RecordingResolver {
    answer: bool,
    pub asked: Vec<String>,
    pub artifacts: Vec<String>,
}

impl RecordingResolver {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            ..Self::default()
        }
    }

    pub fn declining() -> Self {
        Self::default()
    }
}

impl ConflictResolver for RecordingResolver {
    fn resolve(&mut self, candidate: &str) -> Result<bool, ResolveError> {
        self.asked.push(candidate.to_string());
        Ok(self.answer)
    }

    fn begin_artifact(&mut self, class_name: &str) {
        self.artifacts.push(class_name.to_string());
    }
}

/// Resolver that can never answer (stands in for closed stdin)
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableResolver;

impl ConflictResolver for UnavailableResolver {
    fn resolve(&mut self, _candidate: &str) -> Result<bool, ResolveError> {
        Err(ResolveError::EndOfInput)
    }
}

/// Hand-written class source with the given `(name, body statements)` methods
pub fn java_class(class_name: &str, methods: &[(&str, &str)]) -> String {
    let mut out = format!(
        "package {TEST_PACKAGE};\n\n\
         import io.restassured.response.Response;\n\
         import org.testng.annotations.Test;\n\n\
         import java.util.HashMap;\n\
         import java.util.Map;\n\n\
         public class {class_name} extends BaseAPI {{\n\n\
         \x20   public {class_name}() {{\n\
         \x20       super(\"http://localhost\");\n\
         \x20   }}\n"
    );
    for (name, body) in methods {
        out.push_str(&format!("\n    @Test\n    public void {name}() {{\n"));
        for line in body.lines() {
            out.push_str(&format!("        {}\n", line.trim()));
        }
        out.push_str("    }\n");
    }
    out.push_str("}\n");
    out
}

/// GET test body as synthesized for `path` with no query parameters
pub fn get_body(path: &str) -> String {
    format!(
        "Map<String, String> queryParams = new HashMap<>();\n\
         Response response = getRequest(\"{path}\", queryParams);\n\
         response.then().statusCode(200);"
    )
}

/// Method names declared in `source`, in declaration order
pub fn method_names(source: &str, class_name: &str) -> Vec<String> {
    parse_test_class(source, class_name, Path::new("fixture.java"))
        .unwrap()
        .method_names()
        .map(str::to_string)
        .collect()
}
