//! API-description loader
//!
//! Builds an [`EndpointCatalog`] from a local OpenAPI 3 or Swagger 2
//! document in JSON or YAML. Only the parts test synthesis consumes are
//! read: paths, operations, query parameters and the declared server.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::catalog::{EndpointCatalog, EndpointOperation, HttpMethod};

/// Errors loading an API description
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Document could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON document
    #[error("invalid JSON API description: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML document
    #[error("invalid YAML API description: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serialization of an API description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect from a file extension, falling back to the content
    #[must_use]
    pub fn detect(path: &Path, text: &str) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::sniff(text),
        }
    }

    /// Guess from the content: JSON documents open with a brace
    #[must_use]
    pub fn sniff(text: &str) -> Self {
        if text.trim_start().starts_with('{') {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    servers: Vec<RawServer>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default, rename = "basePath")]
    base_path: Option<String>,
    #[serde(default)]
    schemes: Vec<String>,
    /// Raw values so `x-` extensions and other non-path keys cannot fail
    /// the whole document
    #[serde(default)]
    paths: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawPathItem {
    #[serde(default)]
    parameters: Vec<RawParameter>,
    get: Option<RawOperation>,
    put: Option<RawOperation>,
    post: Option<RawOperation>,
    delete: Option<RawOperation>,
    patch: Option<RawOperation>,
    head: Option<RawOperation>,
    options: Option<RawOperation>,
    trace: Option<RawOperation>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOperation {
    #[serde(default)]
    parameters: Vec<RawParameter>,
}

#[derive(Debug, Deserialize)]
struct RawParameter {
    name: Option<String>,
    #[serde(rename = "in")]
    location: Option<String>,
}

impl RawDocument {
    /// OpenAPI 3 `servers[0].url`, else Swagger 2 `scheme://host basePath`
    fn server_url(&self) -> Option<String> {
        if let Some(server) = self.servers.first() {
            return Some(server.url.clone());
        }
        let host = self.host.as_deref()?;
        let scheme = self.schemes.first().map_or("http", String::as_str);
        let base_path = self.base_path.as_deref().unwrap_or("");
        Some(format!("{scheme}://{host}{base_path}"))
    }
}

impl RawPathItem {
    /// Supported operations in synthesis order
    fn operations(&self) -> [(HttpMethod, Option<&RawOperation>); 4] {
        [
            (HttpMethod::Get, self.get.as_ref()),
            (HttpMethod::Put, self.put.as_ref()),
            (HttpMethod::Post, self.post.as_ref()),
            (HttpMethod::Delete, self.delete.as_ref()),
        ]
    }

    fn unsupported(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            ("PATCH", self.patch.is_some()),
            ("HEAD", self.head.is_some()),
            ("OPTIONS", self.options.is_some()),
            ("TRACE", self.trace.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
    }
}

/// Query parameter names from the path item then the operation, first
/// declaration wins
fn query_parameters(shared: &[RawParameter], own: &[RawParameter]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for param in shared.iter().chain(own) {
        let (Some(name), Some("query")) = (param.name.as_deref(), param.location.as_deref()) else {
            continue;
        };
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

impl EndpointCatalog {
    /// Build a catalog from API-description text
    ///
    /// # Errors
    /// Returns [`CatalogError::Json`] or [`CatalogError::Yaml`] if the
    /// document does not deserialize.
    pub fn from_document(text: &str, format: DocumentFormat) -> Result<Self, CatalogError> {
        let raw: RawDocument = match format {
            DocumentFormat::Json => serde_json::from_str(text)?,
            DocumentFormat::Yaml => serde_yaml::from_str::<Option<RawDocument>>(text)?.unwrap_or_default(),
        };

        let mut catalog = EndpointCatalog::default();
        for (path, value) in &raw.paths {
            if !path.starts_with('/') {
                tracing::debug!(key = %path, "skipping non-path key in paths");
                continue;
            }
            let item = RawPathItem::deserialize(value)?;
            for (method, operation) in item.operations() {
                let Some(operation) = operation else {
                    continue;
                };
                catalog.push(EndpointOperation::new(
                    method,
                    path.as_str(),
                    query_parameters(&item.parameters, &operation.parameters),
                ));
            }
            for method in item.unsupported() {
                tracing::debug!(%path, method, "skipping unsupported HTTP method");
            }
        }

        let catalog = match raw.server_url() {
            Some(url) => catalog.with_server_url(url),
            None => catalog,
        };

        tracing::info!(
            operations = catalog.len(),
            server = catalog.server_url().unwrap_or("<none>"),
            "loaded API description"
        );

        Ok(catalog)
    }

    /// Read and load an API description from a local file
    ///
    /// # Errors
    /// Returns [`CatalogError::Io`] if the file cannot be read, or a parse
    /// error if it is not a valid description.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_document(&text, DocumentFormat::detect(path, &text))
    }
}
