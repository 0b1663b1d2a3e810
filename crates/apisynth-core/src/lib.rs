//! apisynth core
//!
//! Incremental synthesis of API test classes: turns an endpoint catalog
//! into one Java test class per HTTP method and merges new test methods
//! into classes generated by earlier runs, without touching existing ones.
//!
//! # Core Concepts
//!
//! - [`EndpointCatalog`]: ordered endpoint operations, loadable from OpenAPI/Swagger
//! - [`MethodSynthesizer`]: one test method definition per operation
//! - [`ArtifactWriter`]: applies a merge plan and persists it atomically
//! - [`SynthesisEngine`]: groups, plans and writes, isolating failures per group
//!
//! # Example
//!
//! ```rust,ignore
//! use apisynth_core::{EndpointCatalog, SynthConfig, SynthesisEngine};
//! use apisynth_composition::FixedResolver;
//!
//! let catalog = EndpointCatalog::from_path("petstore.yaml")?;
//! let engine = SynthesisEngine::new(SynthConfig::default());
//! let report = engine.run(&catalog, &mut FixedResolver::decline_all());
//! assert!(report.is_success());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod catalog;
mod config;
mod engine;
mod error;
mod openapi;
mod synthesizer;
mod writer;

pub use catalog::{EndpointCatalog, EndpointOperation, HttpMethod, UnsupportedMethod};
pub use config::{ConfigError, ConflictPolicy, SynthConfig, DEFAULT_BASE_URL};
pub use engine::{GroupOutcome, GroupReport, MethodGroups, RunReport, SynthesisEngine};
pub use error::{Result, SynthError, WriteError};
pub use openapi::{CatalogError, DocumentFormat};
pub use synthesizer::{method_name, sanitize, MethodSynthesizer, EXPECTED_STATUS, PLACEHOLDER_VALUE};
pub use writer::{ArtifactWriter, WriteOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
