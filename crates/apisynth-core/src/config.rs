//! Synthesis configuration
//!
//! Loaded from an optional TOML file, then adjusted with the `with_*`
//! builders (the CLI maps its flags onto these).

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use apisynth_artifact::{ArtifactIdentity, ShellTemplate};
use serde::{Deserialize, Serialize};

use crate::catalog::{EndpointCatalog, HttpMethod};

/// Base URL used when neither the config nor the API description has one
pub const DEFAULT_BASE_URL: &str = "http://localhost";

/// How name collisions with a different body are answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Ask interactively
    #[default]
    Prompt,
    /// Always add the versioned variant
    Accept,
    /// Always skip
    Decline,
}

impl ConflictPolicy {
    /// Lower-case name as accepted on the command line
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Accept => "accept",
            Self::Decline => "decline",
        }
    }
}

impl Display for ConflictPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "accept" => Ok(Self::Accept),
            "decline" => Ok(Self::Decline),
            other => Err(ConfigError::Invalid(format!(
                "unknown conflict policy '{other}' (expected prompt, accept or decline)"
            ))),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`SynthConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("{0}")]
    Invalid(String),
}

/// Synthesis engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    /// Root of the test-source tree artifacts are written under
    pub test_source_dir: PathBuf,
    /// Java package of generated classes
    pub package_name: String,
    /// Base URL override; falls back to the API description's server
    pub base_url: Option<String>,
    /// Class generated tests extend
    pub base_client: String,
    /// Package of the base client, imported when it differs
    pub base_client_package: Option<String>,
    /// Conflict answer policy
    pub on_conflict: ConflictPolicy,
    /// Plan and report without writing
    pub dry_run: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            test_source_dir: PathBuf::from("src/test/java"),
            package_name: "org.example".to_string(),
            base_url: None,
            base_client: "BaseAPI".to_string(),
            base_client_package: None,
            on_conflict: ConflictPolicy::default(),
            dry_run: false,
        }
    }
}

impl SynthConfig {
    /// Parse TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed or unknown keys, and
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`SynthConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Set test-source root
    #[must_use]
    pub fn with_test_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.test_source_dir = dir.into();
        self
    }

    /// Set package name
    #[must_use]
    pub fn with_package_name(mut self, package: impl Into<String>) -> Self {
        self.package_name = package.into();
        self
    }

    /// Override base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set base client class and optional package
    #[must_use]
    pub fn with_base_client(mut self, class: impl Into<String>, package: Option<String>) -> Self {
        self.base_client = class.into();
        self.base_client_package = package;
        self
    }

    /// Set conflict policy
    #[must_use]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.on_conflict = policy;
        self
    }

    /// Enable or disable dry run
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check values that would produce uncompilable output
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.package_name.is_empty() && !is_qualified_name(&self.package_name) {
            return Err(ConfigError::Invalid(format!(
                "package_name '{}' is not a Java package name",
                self.package_name
            )));
        }
        if !is_identifier(&self.base_client) {
            return Err(ConfigError::Invalid(format!(
                "base_client '{}' is not a Java identifier",
                self.base_client
            )));
        }
        if let Some(package) = &self.base_client_package {
            if !package.is_empty() && !is_qualified_name(package) {
                return Err(ConfigError::Invalid(format!(
                    "base_client_package '{package}' is not a Java package name"
                )));
            }
        }
        if self.base_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            return Err(ConfigError::Invalid("base_url must not be empty".into()));
        }
        Ok(())
    }

    /// Base URL for new classes: override, then the catalog's server, then
    /// [`DEFAULT_BASE_URL`]
    #[must_use]
    pub fn resolve_base_url<'a>(&'a self, catalog: &'a EndpointCatalog) -> &'a str {
        self.base_url
            .as_deref()
            .or_else(|| catalog.server_url())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    /// Shell template for classes that do not exist yet
    #[must_use]
    pub fn shell_template(&self, base_url: &str) -> ShellTemplate {
        ShellTemplate {
            base_url: base_url.to_string(),
            base_client: self.base_client.clone(),
            base_client_package: self.base_client_package.clone(),
        }
    }

    /// Artifact identity of a method group
    #[must_use]
    pub fn identity_for(&self, method: HttpMethod) -> ArtifactIdentity {
        ArtifactIdentity::for_group(method.as_str(), &self.package_name, &self.test_source_dir)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn is_qualified_name(s: &str) -> bool {
    s.split('.').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = SynthConfig::default();
        assert_eq!(config.test_source_dir, PathBuf::from("src/test/java"));
        assert_eq!(config.package_name, "org.example");
        assert_eq!(config.on_conflict, ConflictPolicy::Prompt);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SynthConfig::from_toml_str(
            r#"
            package_name = "com.acme.api"
            on_conflict = "decline"
            "#,
        )
        .unwrap();

        assert_eq!(config.package_name, "com.acme.api");
        assert_eq!(config.on_conflict, ConflictPolicy::Decline);
        assert_eq!(config.base_client, "BaseAPI");
        assert!(!config.dry_run);
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = SynthConfig::from_toml_str("packge_name = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_rejected() {
        let err = SynthConfig::from_toml_str("package_name = \"org.1bad\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SynthConfig::default()
            .with_base_client("Base API", None)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("base_client"));
    }

    #[test]
    fn base_url_resolution_order() {
        let catalog = EndpointCatalog::default();
        let config = SynthConfig::default();
        assert_eq!(config.resolve_base_url(&catalog), DEFAULT_BASE_URL);

        let catalog = catalog.with_server_url("https://api.example");
        assert_eq!(config.resolve_base_url(&catalog), "https://api.example");

        let config = config.with_base_url("http://staging:8080");
        assert_eq!(config.resolve_base_url(&catalog), "http://staging:8080");
    }

    #[test]
    fn policy_parse() {
        assert_eq!("Accept".parse::<ConflictPolicy>().unwrap(), ConflictPolicy::Accept);
        assert!("maybe".parse::<ConflictPolicy>().is_err());
        assert_eq!(ConflictPolicy::Decline.to_string(), "decline");
    }

    #[test]
    fn identity_follows_package() {
        let config = SynthConfig::default()
            .with_test_source_dir("/tmp/t")
            .with_package_name("com.acme");
        let identity = config.identity_for(HttpMethod::Delete);
        assert_eq!(identity.class_name(), "DELETETests");
        assert_eq!(
            identity.file_path(),
            Path::new("/tmp/t/com/acme/DELETETests.java")
        );
    }
}
