//! apisynth artifact system
//!
//! Structural model of generated Java test classes.
//!
//! # Core Concepts
//!
//! - [`ArtifactIdentity`]: class name, package and file path of a method group
//! - [`TestMethodDefinition`]: a synthesized test method (name + body)
//! - [`TestClass`]: ordered members framed by preamble and trailer text
//! - [`ArtifactStore`]: loads an existing class (tree-sitter) or seeds a shell
//! - [`ArtifactSnapshot`]: the loaded class plus the method names it declares
//! - [`ContentHash`]: Blake3 fingerprints for bodies and on-disk contents
//!
//! # Example
//!
//! ```rust,ignore
//! use apisynth_artifact::{ArtifactIdentity, ArtifactStore, TestMethodDefinition};
//!
//! let identity = ArtifactIdentity::for_group("GET", "org.example", root);
//! let mut snapshot = ArtifactStore::default().load(&identity)?;
//! let def = TestMethodDefinition::new("testGET_users", body);
//! snapshot.class_mut().add_method(&def, def.name())?;
//! let source = snapshot.class().render();
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod hash;
mod identity;
mod java;
mod method;
mod model;
mod store;

pub use error::ArtifactError;
pub use hash::ContentHash;
pub use identity::{ArtifactIdentity, CLASS_SUFFIX};
pub use java::parse_test_class;
pub use method::{body_fingerprint, normalize_body, TestMethodDefinition, MEMBER_INDENT, STATEMENT_INDENT};
pub use model::{escape_java_string, Member, MemberKind, ShellTemplate, TestClass};
pub use store::{ArtifactSnapshot, ArtifactStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
