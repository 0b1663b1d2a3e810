//! Merge decisions and plans

use std::fmt::{self, Display, Formatter};

use apisynth_artifact::TestMethodDefinition;

/// Suffix of the one supported versioned variant
pub const VERSION_SUFFIX: &str = "V2";

/// Name of the versioned sibling for `name`
#[inline]
#[must_use]
pub fn versioned_name(name: &str) -> String {
    format!("{name}{VERSION_SUFFIX}")
}

/// Why a candidate was not inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Same name, same body
    Identical,

    /// The `V2` sibling already carries this body
    AlreadyVersioned,

    /// A `V2` sibling exists with a different body; no deeper version is
    /// created
    VersionLimitReached,

    /// The resolver declined a new version
    Declined,

    /// The resolver could not answer; treated as a decline
    Unresolved,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Identical => "identical method exists",
            Self::AlreadyVersioned => "versioned variant already exists",
            Self::VersionLimitReached => "versioned variant exists with a different body",
            Self::Declined => "new version declined",
            Self::Unresolved => "conflict unresolved",
        };
        f.write_str(text)
    }
}

/// Outcome of comparing one candidate against an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeDecision {
    /// Insert under its own name
    Add(TestMethodDefinition),

    /// Leave the artifact as it is for this candidate
    SkipExisting {
        /// Candidate name
        name: String,
        /// Why nothing is inserted
        reason: SkipReason,
    },

    /// Insert under `versioned_name`, keeping the existing method untouched
    AddVersioned {
        /// Candidate definition
        method: TestMethodDefinition,
        /// Name it is declared under
        versioned_name: String,
    },
}

impl MergeDecision {
    /// Definition and declared name, for decisions that insert
    #[must_use]
    pub fn insertion(&self) -> Option<(&str, &TestMethodDefinition)> {
        match self {
            Self::Add(method) => Some((method.name(), method)),
            Self::AddVersioned {
                method,
                versioned_name,
            } => Some((versioned_name.as_str(), method)),
            Self::SkipExisting { .. } => None,
        }
    }

    /// Whether this decision inserts a member
    #[inline]
    #[must_use]
    pub fn is_insertion(&self) -> bool {
        !matches!(self, Self::SkipExisting { .. })
    }
}

impl Display for MergeDecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(method) => write!(f, "add {}", method.name()),
            Self::SkipExisting { name, reason } => write!(f, "skip {name} ({reason})"),
            Self::AddVersioned {
                method,
                versioned_name,
            } => write!(f, "add {versioned_name} (new version of {})", method.name()),
        }
    }
}

/// Decisions for one artifact, in candidate order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    decisions: Vec<MergeDecision>,
}

impl MergePlan {
    /// Create plan from decisions
    #[inline]
    #[must_use]
    pub fn new(decisions: Vec<MergeDecision>) -> Self {
        Self { decisions }
    }

    /// All decisions in evaluation order
    #[inline]
    #[must_use]
    pub fn decisions(&self) -> &[MergeDecision] {
        &self.decisions
    }

    /// Members to insert, in evaluation order
    pub fn insertions(&self) -> impl Iterator<Item = (&str, &TestMethodDefinition)> {
        self.decisions.iter().filter_map(MergeDecision::insertion)
    }

    /// Whether applying the plan changes the artifact
    #[inline]
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.decisions.iter().any(MergeDecision::is_insertion)
    }

    /// Number of inserting decisions
    #[inline]
    #[must_use]
    pub fn insertion_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.is_insertion()).count()
    }

    /// Number of skipped candidates
    #[inline]
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.decisions.len() - self.insertion_count()
    }
}
