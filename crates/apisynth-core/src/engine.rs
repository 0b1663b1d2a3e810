//! Synthesis engine
//!
//! Walks the catalog once, partitions synthesized methods by HTTP method,
//! then loads, plans and writes each group's artifact in turn. Groups are
//! processed sequentially and fail independently.

use apisynth_artifact::{ArtifactIdentity, ArtifactStore, TestMethodDefinition};
use apisynth_composition::{ConflictResolver, MergePlan, MergePlanner};
use indexmap::IndexMap;

use crate::catalog::{EndpointCatalog, HttpMethod};
use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::synthesizer::MethodSynthesizer;
use crate::writer::{ArtifactWriter, WriteOutcome};

/// Synthesized definitions per HTTP method, in first-appearance order
pub type MethodGroups = IndexMap<HttpMethod, Vec<TestMethodDefinition>>;

/// What happened to one group
#[derive(Debug)]
pub struct GroupOutcome {
    /// Decisions for every candidate in the group
    pub plan: MergePlan,
    /// Write result; `None` in dry-run mode
    pub write: Option<WriteOutcome>,
}

/// Report for one artifact group
#[derive(Debug)]
pub struct GroupReport {
    /// HTTP method of the group
    pub method: HttpMethod,
    /// Target artifact
    pub identity: ArtifactIdentity,
    /// Outcome, or the error that aborted the group
    pub result: Result<GroupOutcome, SynthError>,
}

impl GroupReport {
    /// Check if the group completed
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Check if the group's artifact was written
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(
            &self.result,
            Ok(GroupOutcome {
                write: Some(WriteOutcome::Written { .. }),
                ..
            })
        )
    }
}

/// Outcome of a whole run
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per group, in first-appearance order
    pub groups: Vec<GroupReport>,
    /// Operations rejected by the synthesizer
    pub rejected: Vec<SynthError>,
    /// Conflicts the resolver could not answer (treated as declines)
    pub unresolved: Vec<SynthError>,
}

impl RunReport {
    /// True when no group failed
    ///
    /// Rejected operations and unresolved conflicts do not count as
    /// failures; both are skips.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.groups.iter().all(GroupReport::is_ok)
    }

    /// Groups that failed
    pub fn failures(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|g| !g.is_ok())
    }

    /// Report for `method`, if the catalog had operations for it
    #[must_use]
    pub fn group(&self, method: HttpMethod) -> Option<&GroupReport> {
        self.groups.iter().find(|g| g.method == method)
    }

    /// Number of artifacts written
    #[must_use]
    pub fn written_count(&self) -> usize {
        self.groups.iter().filter(|g| g.is_written()).count()
    }
}

/// Drives synthesis, planning and writing for a catalog
#[derive(Debug, Clone, Default)]
pub struct SynthesisEngine {
    config: SynthConfig,
    synthesizer: MethodSynthesizer,
    writer: ArtifactWriter,
}

impl SynthesisEngine {
    /// Create engine with `config`
    #[must_use]
    pub fn new(config: SynthConfig) -> Self {
        Self {
            config,
            synthesizer: MethodSynthesizer::new(),
            writer: ArtifactWriter::new(),
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Synthesize every operation and partition by HTTP method
    ///
    /// Invalid operations are returned separately and do not stop the walk.
    pub fn group(&self, catalog: &EndpointCatalog) -> (MethodGroups, Vec<SynthError>) {
        let mut groups = MethodGroups::new();
        let mut rejected = Vec::new();

        for op in catalog.operations() {
            match self.synthesizer.synthesize(op) {
                Ok(definition) => groups.entry(op.method()).or_default().push(definition),
                Err(e) => {
                    tracing::warn!(operation = %op, error = %e, "skipping invalid operation");
                    rejected.push(e);
                }
            }
        }

        (groups, rejected)
    }

    /// Run synthesis for `catalog`, consulting `resolver` on conflicts
    pub fn run<R: ConflictResolver + ?Sized>(
        &self,
        catalog: &EndpointCatalog,
        resolver: &mut R,
    ) -> RunReport {
        let (groups, rejected) = self.group(catalog);
        let store = ArtifactStore::new(
            self.config
                .shell_template(self.config.resolve_base_url(catalog)),
        );
        let mut planner = MergePlanner::new(resolver);
        let mut report = RunReport {
            rejected,
            ..RunReport::default()
        };

        tracing::info!(
            operations = catalog.len(),
            groups = groups.len(),
            dry_run = self.config.dry_run,
            "starting synthesis run"
        );

        for (method, definitions) in &groups {
            let span = tracing::info_span!("artifact_group", method = %method);
            let _guard = span.enter();

            let identity = self.config.identity_for(*method);
            let result = self.process_group(&identity, definitions, &store, &mut planner);

            report.unresolved.extend(planner.take_failures().into_iter().map(
                |(candidate, source)| SynthError::ConflictResolutionUnavailable { candidate, source },
            ));

            match &result {
                Ok(outcome) => tracing::info!(
                    class = identity.class_name(),
                    candidates = definitions.len(),
                    added = outcome.plan.insertion_count(),
                    skipped = outcome.plan.skipped_count(),
                    written = outcome.write.as_ref().is_some_and(WriteOutcome::is_written),
                    "group complete"
                ),
                Err(e) => tracing::error!(class = identity.class_name(), error = %e, "group failed"),
            }

            report.groups.push(GroupReport {
                method: *method,
                identity,
                result,
            });
        }

        report
    }

    fn process_group<R: ConflictResolver + ?Sized>(
        &self,
        identity: &ArtifactIdentity,
        definitions: &[TestMethodDefinition],
        store: &ArtifactStore,
        planner: &mut MergePlanner<'_, R>,
    ) -> Result<GroupOutcome, SynthError> {
        let mut snapshot = store.load(identity)?;
        let plan = planner.plan(&snapshot, definitions);

        if self.config.dry_run {
            return Ok(GroupOutcome { plan, write: None });
        }

        let write = self.writer.apply(&mut snapshot, &plan)?;
        Ok(GroupOutcome {
            plan,
            write: Some(write),
        })
    }
}
