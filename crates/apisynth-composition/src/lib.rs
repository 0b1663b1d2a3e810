//! apisynth composition
//!
//! Decides how synthesized test methods merge into existing test classes.
//!
//! # Core Concepts
//!
//! - [`MergePlanner`]: per-candidate decision state machine
//! - [`MergeDecision`]: add, skip, or add as a `V2` sibling
//! - [`MergePlan`]: decisions for one artifact, in candidate order
//! - [`ConflictResolver`]: injectable accept/decline policy for conflicts
//!
//! # Example
//!
//! ```rust,ignore
//! use apisynth_composition::{FixedResolver, MergePlanner};
//!
//! let mut resolver = FixedResolver::decline_all();
//! let mut planner = MergePlanner::new(&mut resolver);
//! let plan = planner.plan(&snapshot, &definitions);
//! for (name, method) in plan.insertions() {
//!     snapshot.class_mut().add_method(method, name)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod decision;
mod planner;
mod resolver;

pub use decision::{versioned_name, MergeDecision, MergePlan, SkipReason, VERSION_SUFFIX};
pub use planner::MergePlanner;
pub use resolver::{ConflictResolver, FixedResolver, PromptResolver, ResolveError, ScriptedResolver};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
