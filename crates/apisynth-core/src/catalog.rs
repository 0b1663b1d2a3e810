//! Endpoint catalog
//!
//! The ordered list of endpoint operations extracted from an API
//! description. Pure data; see [`EndpointCatalog::from_document`] for building
//! one from a local OpenAPI/Swagger document.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// HTTP methods test synthesis supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Upper-case method name, as used in class and method names
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Name of the base-client dispatch method for this HTTP method
    #[inline]
    #[must_use]
    pub fn dispatch_method(&self) -> &'static str {
        match self {
            Self::Get => "getRequest",
            Self::Post => "postRequest",
            Self::Put => "putRequest",
            Self::Delete => "deleteRequest",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an HTTP method name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnsupportedMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(UnsupportedMethod(s.to_string())),
        }
    }
}

/// One (path, method) pair with its declared query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointOperation {
    path: String,
    method: HttpMethod,
    query_parameters: Vec<String>,
}

impl EndpointOperation {
    /// Create operation
    #[must_use]
    pub fn new<I, S>(method: HttpMethod, path: impl Into<String>, query_parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            method,
            query_parameters: query_parameters.into_iter().map(Into::into).collect(),
        }
    }

    /// Request path as declared (e.g. `/pet/{petId}`)
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// HTTP method
    #[inline]
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Query parameter names in declaration order
    #[inline]
    #[must_use]
    pub fn query_parameters(&self) -> &[String] {
        &self.query_parameters
    }
}

impl Display for EndpointOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Ordered collection of endpoint operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointCatalog {
    operations: Vec<EndpointOperation>,
    server_url: Option<String>,
}

impl EndpointCatalog {
    /// Create catalog from operations
    #[inline]
    #[must_use]
    pub fn new(operations: Vec<EndpointOperation>) -> Self {
        Self {
            operations,
            server_url: None,
        }
    }

    /// With the server URL declared by the API description
    #[inline]
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Operations in enumeration order
    #[inline]
    #[must_use]
    pub fn operations(&self) -> &[EndpointOperation] {
        &self.operations
    }

    /// Server URL declared by the API description
    #[inline]
    #[must_use]
    pub fn server_url(&self) -> Option<&str> {
        self.server_url.as_deref()
    }

    /// Append operation
    #[inline]
    pub fn push(&mut self, operation: EndpointOperation) {
        self.operations.push(operation);
    }

    /// Number of operations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl FromIterator<EndpointOperation> for EndpointCatalog {
    fn from_iter<I: IntoIterator<Item = EndpointOperation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
