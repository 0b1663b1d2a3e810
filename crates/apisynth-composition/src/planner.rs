//! Merge planner
//!
//! Decides, per synthesized method, whether to add it, skip it, or add it
//! as a versioned sibling. The snapshot's method names are the authority on
//! what already exists; names added earlier in the same run count too.
//!
//! Existing method bodies are never replaced. The only remediation for a
//! changed body is an additive `V2` sibling, and only one version level is
//! supported: once a `V2` exists, further collisions are skipped (and a
//! differing `V2` is reported as [`SkipReason::VersionLimitReached`]).

use std::collections::HashMap;

use apisynth_artifact::{ArtifactSnapshot, ContentHash, TestMethodDefinition};

use crate::decision::{versioned_name, MergeDecision, MergePlan, SkipReason};
use crate::resolver::{ConflictResolver, ResolveError};

/// Plans merges against artifact snapshots, consulting a resolver on
/// conflicts
///
/// Resolver answers are remembered by candidate name for the planner's
/// lifetime, so each distinct colliding name is asked about at most once.
#[derive(Debug)]
pub struct MergePlanner<'r, R: ConflictResolver + ?Sized> {
    resolver: &'r mut R,
    answers: HashMap<String, bool>,
    failures: Vec<(String, ResolveError)>,
}

impl<'r, R: ConflictResolver + ?Sized> MergePlanner<'r, R> {
    /// Create planner over `resolver`
    #[inline]
    #[must_use]
    pub fn new(resolver: &'r mut R) -> Self {
        Self {
            resolver,
            answers: HashMap::new(),
            failures: Vec::new(),
        }
    }

    /// Resolver failures since the last call, with the candidate name
    ///
    /// Each failure was treated as a decline.
    pub fn take_failures(&mut self) -> Vec<(String, ResolveError)> {
        std::mem::take(&mut self.failures)
    }

    /// Plan the merge of `candidates` into `snapshot`
    ///
    /// Decisions come back in candidate order.
    pub fn plan(
        &mut self,
        snapshot: &ArtifactSnapshot,
        candidates: &[TestMethodDefinition],
    ) -> MergePlan {
        // name -> body fingerprint, for everything declared so far
        let mut known: HashMap<String, Option<ContentHash>> = snapshot
            .existing_method_names()
            .iter()
            .map(|name| (name.clone(), snapshot.method_fingerprint(name)))
            .collect();

        let class_name = snapshot.identity().class_name();
        self.resolver.begin_artifact(class_name);
        let decisions = candidates
            .iter()
            .map(|candidate| {
                let decision = self.decide(&mut known, candidate);
                tracing::debug!(class = class_name, %decision, "merge decision");
                decision
            })
            .collect();

        MergePlan::new(decisions)
    }

    fn decide(
        &mut self,
        known: &mut HashMap<String, Option<ContentHash>>,
        candidate: &TestMethodDefinition,
    ) -> MergeDecision {
        let name = candidate.name();
        let fingerprint = candidate.fingerprint();

        let existing = match known.get(name) {
            Some(existing) => *existing,
            None => {
                known.insert(name.to_string(), Some(fingerprint));
                return MergeDecision::Add(candidate.clone());
            }
        };

        if existing == Some(fingerprint) {
            return skip(name, SkipReason::Identical);
        }

        let v2 = versioned_name(name);
        if let Some(versioned) = known.get(&v2) {
            if *versioned == Some(fingerprint) {
                return skip(name, SkipReason::AlreadyVersioned);
            }
            tracing::warn!(
                method = name,
                versioned = %v2,
                "method changed again after {v2} was added; only one version level is supported, skipping"
            );
            return skip(name, SkipReason::VersionLimitReached);
        }

        match self.ask(name) {
            Some(true) => {
                known.insert(v2.clone(), Some(fingerprint));
                MergeDecision::AddVersioned {
                    method: candidate.clone(),
                    versioned_name: v2,
                }
            }
            Some(false) => skip(name, SkipReason::Declined),
            None => skip(name, SkipReason::Unresolved),
        }
    }

    /// Ask the resolver once per name; `None` if it could not answer
    fn ask(&mut self, name: &str) -> Option<bool> {
        if let Some(answer) = self.answers.get(name) {
            return Some(*answer);
        }
        match self.resolver.resolve(name) {
            Ok(answer) => {
                self.answers.insert(name.to_string(), answer);
                Some(answer)
            }
            Err(e) => {
                tracing::warn!(method = name, error = %e, "conflict resolution unavailable, skipping");
                self.answers.insert(name.to_string(), false);
                self.failures.push((name.to_string(), e));
                None
            }
        }
    }
}

fn skip(name: &str, reason: SkipReason) -> MergeDecision {
    MergeDecision::SkipExisting {
        name: name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{FixedResolver, ScriptedResolver};
    use apisynth_artifact::{ArtifactIdentity, ArtifactStore, ShellTemplate, TestClass};
    use std::path::Path;

    const OLD_BODY: &str = "Response response = getRequest(\"/pets\", queryParams);\nresponse.then().statusCode(200);";
    const NEW_BODY: &str = "Map<String, String> queryParams = new HashMap<>();\nqueryParams.put(\"limit\", \"sampleValue\");\nResponse response = getRequest(\"/pets\", queryParams);\nresponse.then().statusCode(200);";

    /// Snapshot of a GETTests class on disk declaring `methods`
    fn snapshot_with(dir: &Path, methods: &[(&str, &str)]) -> ArtifactSnapshot {
        let identity = ArtifactIdentity::for_group("GET", "org.example", dir);
        let mut class = TestClass::shell(&identity, &ShellTemplate::default());
        for (name, body) in methods {
            class
                .add_method(&TestMethodDefinition::new(*name, *body), name)
                .unwrap();
        }
        std::fs::create_dir_all(identity.file_path().parent().unwrap()).unwrap();
        std::fs::write(identity.file_path(), class.render()).unwrap();
        ArtifactStore::default().load(&identity).unwrap()
    }

    fn empty_snapshot(dir: &Path) -> ArtifactSnapshot {
        let identity = ArtifactIdentity::for_group("GET", "org.example", dir);
        ArtifactStore::default().load(&identity).unwrap()
    }

    #[test]
    fn new_names_are_added_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = empty_snapshot(dir.path());
        let mut resolver = ScriptedResolver::new();
        let mut planner = MergePlanner::new(&mut resolver);

        let candidates = vec![
            TestMethodDefinition::new("testGET_users", OLD_BODY),
            TestMethodDefinition::new("testGET_users_id_", OLD_BODY),
        ];
        let plan = planner.plan(&snapshot, &candidates);

        let names: Vec<_> = plan.insertions().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["testGET_users", "testGET_users_id_"]);
        assert!(resolver.asked().is_empty());
    }

    #[test]
    fn identical_collision_skips_without_asking() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with(dir.path(), &[("testGET_pets", OLD_BODY)]);
        let mut resolver = ScriptedResolver::new();
        let plan = MergePlanner::new(&mut resolver)
            .plan(&snapshot, &[TestMethodDefinition::new("testGET_pets", OLD_BODY)]);

        assert_eq!(
            plan.decisions(),
            [MergeDecision::SkipExisting {
                name: "testGET_pets".to_string(),
                reason: SkipReason::Identical,
            }]
        );
        assert!(resolver.asked().is_empty());
    }

    #[test]
    fn accepted_conflict_adds_v2() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with(dir.path(), &[("testGET_pets", OLD_BODY)]);
        let mut resolver = ScriptedResolver::new().answer("testGET_pets", true);
        let candidate = TestMethodDefinition::new("testGET_pets", NEW_BODY);

        let plan = MergePlanner::new(&mut resolver).plan(&snapshot, &[candidate.clone()]);

        assert_eq!(
            plan.decisions(),
            [MergeDecision::AddVersioned {
                method: candidate,
                versioned_name: "testGET_petsV2".to_string(),
            }]
        );
        assert_eq!(resolver.asked(), ["testGET_pets"]);
    }

    #[test]
    fn declined_conflict_skips() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with(dir.path(), &[("testGET_pets", OLD_BODY)]);
        let mut resolver = FixedResolver::decline_all();
        let plan = MergePlanner::new(&mut resolver)
            .plan(&snapshot, &[TestMethodDefinition::new("testGET_pets", NEW_BODY)]);

        assert!(!plan.has_changes());
        assert!(matches!(
            plan.decisions()[0],
            MergeDecision::SkipExisting { reason: SkipReason::Declined, .. }
        ));
    }

    #[test]
    fn existing_v2_short_circuits_resolver() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with(
            dir.path(),
            &[("testGET_pets", OLD_BODY), ("testGET_petsV2", NEW_BODY)],
        );
        let mut resolver = ScriptedResolver::new().otherwise(true);
        let plan = MergePlanner::new(&mut resolver)
            .plan(&snapshot, &[TestMethodDefinition::new("testGET_pets", NEW_BODY)]);

        assert!(matches!(
            plan.decisions()[0],
            MergeDecision::SkipExisting { reason: SkipReason::AlreadyVersioned, .. }
        ));
        assert!(resolver.asked().is_empty());
    }

    #[test]
    fn third_distinct_body_hits_version_limit() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with(
            dir.path(),
            &[("testGET_pets", OLD_BODY), ("testGET_petsV2", NEW_BODY)],
        );
        let mut resolver = ScriptedResolver::new().otherwise(true);
        let third = TestMethodDefinition::new("testGET_pets", "response.then().statusCode(204);");
        let plan = MergePlanner::new(&mut resolver).plan(&snapshot, &[third]);

        assert!(matches!(
            plan.decisions()[0],
            MergeDecision::SkipExisting { reason: SkipReason::VersionLimitReached, .. }
        ));
        assert!(resolver.asked().is_empty());
    }

    #[test]
    fn unavailable_answer_is_a_skip() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with(dir.path(), &[("testGET_pets", OLD_BODY)]);
        let mut resolver = ScriptedResolver::new();
        let plan = MergePlanner::new(&mut resolver)
            .plan(&snapshot, &[TestMethodDefinition::new("testGET_pets", NEW_BODY)]);

        assert!(matches!(
            plan.decisions()[0],
            MergeDecision::SkipExisting { reason: SkipReason::Unresolved, .. }
        ));
    }

    #[test]
    fn resolver_failures_are_collected() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with(dir.path(), &[("testGET_pets", OLD_BODY)]);
        let mut resolver = ScriptedResolver::new();
        let mut planner = MergePlanner::new(&mut resolver);
        planner.plan(&snapshot, &[TestMethodDefinition::new("testGET_pets", NEW_BODY)]);

        let failures = planner.take_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "testGET_pets");
        assert!(matches!(failures[0].1, ResolveError::Unavailable(_)));
        assert!(planner.take_failures().is_empty());
    }

    #[test]
    fn collisions_within_one_run_are_detected() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = empty_snapshot(dir.path());
        let mut resolver = ScriptedResolver::new().otherwise(true);

        // `/a-b` and `/a_b` sanitize to the same method name
        let candidates = vec![
            TestMethodDefinition::new("testGET_a_b", "getRequest(\"/a-b\", queryParams);"),
            TestMethodDefinition::new("testGET_a_b", "getRequest(\"/a_b\", queryParams);"),
        ];
        let plan = MergePlanner::new(&mut resolver).plan(&snapshot, &candidates);

        let names: Vec<_> = plan.insertions().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["testGET_a_b", "testGET_a_bV2"]);
    }

    #[test]
    fn resolver_asked_once_per_name() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with(dir.path(), &[("testGET_pets", OLD_BODY)]);
        let mut resolver = ScriptedResolver::new().answer("testGET_pets", false);
        let mut planner = MergePlanner::new(&mut resolver);

        let candidate = TestMethodDefinition::new("testGET_pets", NEW_BODY);
        let first = planner.plan(&snapshot, &[candidate.clone()]);
        let second = planner.plan(&snapshot, &[candidate]);
        drop(planner);

        assert_eq!(first, second);
        assert_eq!(resolver.asked().len(), 1);
    }

    #[test]
    fn existing_methods_are_never_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with(dir.path(), &[("testGET_pets", OLD_BODY)]);
        let mut resolver = FixedResolver::accept_all();
        let plan = MergePlanner::new(&mut resolver)
            .plan(&snapshot, &[TestMethodDefinition::new("testGET_pets", NEW_BODY)]);

        assert!(plan.insertions().all(|(name, _)| name != "testGET_pets"));
    }

    proptest::proptest! {
        #[test]
        fn insertions_never_clash(
            existing in proptest::collection::btree_set("[ab]{1,2}", 0..4),
            candidates in proptest::collection::vec(("[ab]{1,2}", 0u8..3), 0..8),
            accept in proptest::bool::ANY,
        ) {
            let dir = tempfile::tempdir().unwrap();
            let methods: Vec<(&str, &str)> = existing.iter().map(|n| (n.as_str(), OLD_BODY)).collect();
            let snapshot = snapshot_with(dir.path(), &methods);
            let candidates: Vec<TestMethodDefinition> = candidates
                .iter()
                .map(|(name, variant)| {
                    TestMethodDefinition::new(name.as_str(), format!("{OLD_BODY}\nv({variant});"))
                })
                .collect();

            let mut resolver = ScriptedResolver::new().otherwise(accept);
            let plan = MergePlanner::new(&mut resolver).plan(&snapshot, &candidates);

            let mut declared: Vec<String> = existing.iter().cloned().collect();
            for (name, _) in plan.insertions() {
                proptest::prop_assert!(!declared.iter().any(|d| d == name), "{} inserted twice", name);
                declared.push(name.to_string());
            }
            proptest::prop_assert_eq!(plan.decisions().len(), candidates.len());
        }
    }
}
