//! Method synthesis: one [`TestMethodDefinition`] per endpoint operation

use apisynth_artifact::{escape_java_string, TestMethodDefinition};

use crate::catalog::{EndpointOperation, HttpMethod};
use crate::error::{Result, SynthError};

/// Placeholder value for every declared query parameter
pub const PLACEHOLDER_VALUE: &str = "sampleValue";

/// Status code every generated test asserts
pub const EXPECTED_STATUS: u16 = 200;

/// Drop the leading `/` and collapse every run of characters outside
/// `[A-Za-z0-9]` into a single `_`
///
/// `sanitize("/pet/findByStatus") == "pet_findByStatus"`,
/// `sanitize("/users/{id}") == "users_id_"`
#[must_use]
pub fn sanitize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.strip_prefix('/').unwrap_or(path).chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out
}

/// Test method name for an operation: `test` + method + `_` + sanitized path
#[must_use]
pub fn method_name(method: HttpMethod, path: &str) -> String {
    format!("test{}_{}", method.as_str(), sanitize(path))
}

/// Turns endpoint operations into test method definitions
///
/// Pure string construction; no I/O.
#[derive(Debug, Clone, Default)]
pub struct MethodSynthesizer;

impl MethodSynthesizer {
    /// Create synthesizer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Synthesize the test method for `op`
    ///
    /// # Errors
    /// Returns [`SynthError::InvalidOperation`] for an empty path.
    pub fn synthesize(&self, op: &EndpointOperation) -> Result<TestMethodDefinition> {
        let path = op.path();
        if path.trim().is_empty() {
            return Err(SynthError::InvalidOperation {
                method: op.method(),
                path: path.to_string(),
                reason: "empty path".into(),
            });
        }

        let literal = escape_java_string(path);
        let dispatch = op.method().dispatch_method();
        let mut lines = Vec::with_capacity(op.query_parameters().len() + 3);

        match op.method() {
            HttpMethod::Get => {
                lines.push("Map<String, String> queryParams = new HashMap<>();".to_string());
                for param in op.query_parameters() {
                    lines.push(format!(
                        "queryParams.put(\"{}\", \"{PLACEHOLDER_VALUE}\");",
                        escape_java_string(param)
                    ));
                }
                lines.push(format!(
                    "Response response = {dispatch}(\"{literal}\", queryParams);"
                ));
            }
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete => {
                lines.push("Map<String, Object> bodyParams = new HashMap<>();".to_string());
                lines.push(format!(
                    "Response response = {dispatch}(\"{literal}\", bodyParams);"
                ));
            }
        }
        lines.push(format!("response.then().statusCode({EXPECTED_STATUS});"));

        Ok(TestMethodDefinition::new(
            method_name(op.method(), path),
            lines.join("\n"),
        ))
    }
}
