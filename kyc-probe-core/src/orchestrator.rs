//! Sequencing of setup, the five scenarios and fan-out provisioning

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::backend::{IdentityProvisioner, Submitter};
use crate::errors::OrchestrationError;
use crate::runner::{ScenarioRun, ScenarioRunner};
use crate::scenario::{ScenarioKind, ScenarioPlan};
use crate::types::TestIdentity;

/// Which scenarios a run executes; always in run order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSelection(BTreeSet<ScenarioKind>);

impl ScenarioSelection {
    pub fn all() -> Self {
        Self(ScenarioKind::all().iter().copied().collect())
    }

    pub fn only(kinds: impl IntoIterator<Item = ScenarioKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    pub fn contains(&self, kind: ScenarioKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn needs_user_a(&self) -> bool {
        self.contains(ScenarioKind::Race)
            || self.contains(ScenarioKind::SequentialRetry)
            || self.contains(ScenarioKind::ParallelDifferentKeys)
            || self.contains(ScenarioKind::ParallelDifferentIdentities)
    }

    fn needs_user_b(&self) -> bool {
        self.contains(ScenarioKind::ParallelDifferentIdentities)
    }
}

impl Default for ScenarioSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Run-level knobs
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub race_fan_out: usize,
    pub fan_out_users: usize,
    pub selection: ScenarioSelection,
    /// Where the run points, shown in the report header
    pub target: String,
    /// Description of the uploaded document
    pub payload: String,
    pub preview_chars: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            race_fan_out: 5,
            fan_out_users: 100,
            selection: ScenarioSelection::all(),
            target: String::new(),
            payload: String::new(),
            preview_chars: 100,
        }
    }
}

/// A setup identity as shown in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupUser {
    pub label: String,
    pub backend_user_id: String,
    pub email: String,
}

/// How many of the requested fan-out identities could be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FanOutProvisioning {
    pub requested: usize,
    pub created: usize,
    pub failures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedScenario {
    pub kind: ScenarioKind,
    pub reason: String,
}

/// Everything a run observed, ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub started_at: DateTime<Utc>,
    pub target: String,
    pub payload: String,
    pub preview_chars: usize,
    pub setup: Vec<SetupUser>,
    pub scenarios: Vec<ScenarioRun>,
    pub fan_out: Option<FanOutProvisioning>,
    pub skipped: Vec<SkippedScenario>,
}

impl ProbeReport {
    pub fn scenario(&self, kind: ScenarioKind) -> Option<&ScenarioRun> {
        self.scenarios.iter().find(|run| run.kind == kind)
    }
}

/// Drives a complete probe run
pub struct Orchestrator<P, S> {
    provisioner: P,
    runner: ScenarioRunner<S>,
    settings: OrchestratorSettings,
}

impl<P, S> Orchestrator<P, S>
where
    P: IdentityProvisioner,
    S: Submitter + 'static,
{
    pub fn new(provisioner: P, submitter: Arc<S>, settings: OrchestratorSettings) -> Self {
        Self {
            provisioner,
            runner: ScenarioRunner::new(submitter),
            settings,
        }
    }

    /// Run the selected scenarios in order
    ///
    /// Fails only when a setup user (User A or User B) cannot be created, in
    /// which case no scenario runs. Fan-out users that fail to provision are
    /// left out of scenario 5 and listed in the report.
    pub async fn run(&self) -> Result<ProbeReport, OrchestrationError> {
        let started_at = Utc::now();
        let selection = &self.settings.selection;
        let mut setup = Vec::new();
        let mut scenarios = Vec::new();
        let mut skipped = Vec::new();
        let mut fan_out = None;

        let user_a = if selection.needs_user_a() {
            Some(self.provision_setup("User A", "UserA", &mut setup).await?)
        } else {
            None
        };
        let user_b = if selection.needs_user_b() {
            Some(self.provision_setup("User B", "UserB", &mut setup).await?)
        } else {
            None
        };

        if let Some(ref user_a) = user_a {
            if selection.contains(ScenarioKind::Race) {
                let plan = ScenarioPlan::race(user_a, self.settings.race_fan_out);
                scenarios.push(self.runner.run(plan).await);
            }

            // Only starts once the race pool above has fully drained
            if selection.contains(ScenarioKind::SequentialRetry) {
                let plan = ScenarioPlan::sequential_retry(user_a);
                scenarios.push(self.runner.run(plan).await);
            }

            if selection.contains(ScenarioKind::ParallelDifferentKeys) {
                let plan = ScenarioPlan::parallel_different_keys(user_a);
                scenarios.push(self.runner.run(plan).await);
            }

            if let Some(ref user_b) = user_b {
                let plan = ScenarioPlan::parallel_different_identities(user_a, user_b);
                scenarios.push(self.runner.run(plan).await);
            }
        }

        if selection.contains(ScenarioKind::HighFanOut) {
            let (identities, provisioning) = self.provision_fan_out().await;

            if identities.is_empty() {
                warn!("No users created for the fan-out scenario, skipping it");
                skipped.push(SkippedScenario {
                    kind: ScenarioKind::HighFanOut,
                    reason: "No users created".to_string(),
                });
            } else {
                let plan = ScenarioPlan::high_fan_out(&identities);
                scenarios.push(self.runner.run(plan).await);
            }

            fan_out = Some(provisioning);
        }

        Ok(ProbeReport {
            started_at,
            target: self.settings.target.clone(),
            payload: self.settings.payload.clone(),
            preview_chars: self.settings.preview_chars,
            setup,
            scenarios,
            fan_out,
            skipped,
        })
    }

    async fn provision_setup(
        &self,
        label: &str,
        name_prefix: &str,
        setup: &mut Vec<SetupUser>,
    ) -> Result<Arc<TestIdentity>, OrchestrationError> {
        match self.provisioner.provision(name_prefix).await {
            Ok(identity) => {
                info!(
                    user = label,
                    id = identity.backend_user_id(),
                    email = identity.email(),
                    "Setup user created"
                );
                setup.push(SetupUser {
                    label: label.to_string(),
                    backend_user_id: identity.backend_user_id().to_string(),
                    email: identity.email().to_string(),
                });
                Ok(Arc::new(identity))
            }
            Err(source) => {
                error!(user = label, "Failed to create setup user: {}", source);
                Err(OrchestrationError::SetupFailed {
                    user: label.to_string(),
                    source,
                })
            }
        }
    }

    /// One user at a time, so registration failures stay attributable
    async fn provision_fan_out(&self) -> (Vec<Arc<TestIdentity>>, FanOutProvisioning) {
        let requested = self.settings.fan_out_users;
        let mut identities = Vec::with_capacity(requested);
        let mut failures = Vec::new();

        info!(requested, "Creating fan-out users");
        for index in 0..requested {
            match self.provisioner.provision("UserD").await {
                Ok(identity) => {
                    debug!(index, id = identity.backend_user_id(), "Fan-out user created");
                    identities.push(Arc::new(identity));
                }
                Err(e) => {
                    warn!(index, "Failed to create fan-out user: {}", e);
                    failures.push(format!("UserD_{}: {}", index, e));
                }
            }
        }

        let provisioning = FanOutProvisioning {
            requested,
            created: identities.len(),
            failures,
        };
        (identities, provisioning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProvisionError;
    use crate::types::{SubmissionOutcome, SubmissionTask};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Hands out sequential ids; fails the calls whose index is listed
    struct FakeProvisioner {
        next: AtomicUsize,
        fail_on: HashSet<usize>,
    }

    impl FakeProvisioner {
        fn failing_on(indices: impl IntoIterator<Item = usize>) -> Self {
            Self {
                next: AtomicUsize::new(0),
                fail_on: indices.into_iter().collect(),
            }
        }
    }

    #[async_trait]
    impl IdentityProvisioner for FakeProvisioner {
        async fn provision(&self, name_prefix: &str) -> Result<TestIdentity, ProvisionError> {
            let index = self.next.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(&index) {
                return Err(ProvisionError::RegistrationFailed {
                    status_code: 400,
                    body: "Email already exists".to_string(),
                });
            }
            TestIdentity::new(
                format!("token-{}", index),
                index.to_string(),
                format!("{}{}@example.com", name_prefix.to_lowercase(), index),
            )
        }
    }

    /// Backend stand-in: first submission per (user, type) wins, the rest conflict
    #[derive(Default)]
    struct DedupBackend {
        seen: Mutex<HashSet<(String, String)>>,
    }

    #[async_trait]
    impl Submitter for DedupBackend {
        async fn submit(&self, task: &SubmissionTask) -> SubmissionOutcome {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let key = (
                task.identity().backend_user_id().to_string(),
                task.document_type().to_string(),
            );
            let fresh = self
                .seen
                .lock()
                .map(|mut seen| seen.insert(key))
                .unwrap_or(false);
            if fresh {
                SubmissionOutcome::new(task.label(), 202, "accepted", Duration::from_millis(5))
            } else {
                SubmissionOutcome::new(task.label(), 409, "pending request", Duration::from_millis(5))
            }
        }
    }

    fn settings(fan_out_users: usize) -> OrchestratorSettings {
        OrchestratorSettings {
            fan_out_users,
            target: "http://localhost:8080/api".to_string(),
            payload: "test_doc.png (69 bytes, image/png)".to_string(),
            ..OrchestratorSettings::default()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_full_run_in_order() {
        let orchestrator = Orchestrator::new(
            FakeProvisioner::failing_on([]),
            Arc::new(DedupBackend::default()),
            settings(20),
        );
        let report = orchestrator.run().await.unwrap();

        let kinds: Vec<_> = report.scenarios.iter().map(|run| run.kind).collect();
        assert_eq!(kinds, ScenarioKind::all().to_vec());
        assert_eq!(report.setup.len(), 2);

        let race = report.scenario(ScenarioKind::Race).unwrap();
        assert_eq!(race.result.success_count + race.result.failure_count, 5);
        assert_eq!(race.result.success_count, 1);

        let retry = report.scenario(ScenarioKind::SequentialRetry).unwrap();
        assert!(retry.started_at >= race.finished_at);
        assert_eq!(retry.result.failure_count, 1);

        let keys = report.scenario(ScenarioKind::ParallelDifferentKeys).unwrap();
        assert_eq!(keys.result.success_count, 2);

        let identities = report
            .scenario(ScenarioKind::ParallelDifferentIdentities)
            .unwrap();
        assert_eq!(identities.result.total(), 2);

        let fan_out = report.scenario(ScenarioKind::HighFanOut).unwrap();
        assert_eq!(fan_out.dispatched, 20);
        assert_eq!(fan_out.result.total(), 20);
        assert_eq!(fan_out.result.success_count, 20);

        // Scenario windows never overlap
        for pair in report.scenarios.windows(2) {
            assert!(pair[1].started_at >= pair[0].finished_at);
        }
    }

    #[tokio::test]
    async fn test_setup_failure_stops_the_run() {
        let orchestrator = Orchestrator::new(
            FakeProvisioner::failing_on([1]),
            Arc::new(DedupBackend::default()),
            settings(3),
        );

        match orchestrator.run().await {
            Err(OrchestrationError::SetupFailed { user, source }) => {
                assert_eq!(user, "User B");
                assert!(matches!(source, ProvisionError::RegistrationFailed { .. }));
            }
            Ok(_) => panic!("run should stop when User B cannot be created"),
        }
    }

    #[tokio::test]
    async fn test_partial_fan_out_provisioning() {
        // Calls 0 and 1 are the setup users; fan-out users are calls 2..12
        let orchestrator = Orchestrator::new(
            FakeProvisioner::failing_on([3, 7, 8]),
            Arc::new(DedupBackend::default()),
            settings(10),
        );
        let report = orchestrator.run().await.unwrap();

        let provisioning = report.fan_out.as_ref().unwrap();
        assert_eq!(provisioning.requested, 10);
        assert_eq!(provisioning.created, 7);
        assert_eq!(provisioning.failures.len(), 3);

        let fan_out = report.scenario(ScenarioKind::HighFanOut).unwrap();
        assert_eq!(fan_out.dispatched, 7);
        assert_eq!(fan_out.result.total(), 7);
    }

    #[tokio::test]
    async fn test_fan_out_skipped_without_users() {
        let orchestrator = Orchestrator::new(
            FakeProvisioner::failing_on(0..4),
            Arc::new(DedupBackend::default()),
            OrchestratorSettings {
                selection: ScenarioSelection::only([ScenarioKind::HighFanOut]),
                ..settings(4)
            },
        );
        let report = orchestrator.run().await.unwrap();

        assert!(report.setup.is_empty());
        assert!(report.scenarios.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].kind, ScenarioKind::HighFanOut);
        assert_eq!(report.fan_out.as_ref().unwrap().created, 0);
    }

    #[tokio::test]
    async fn test_selection_only_provisions_needed_users() {
        let orchestrator = Orchestrator::new(
            FakeProvisioner::failing_on([]),
            Arc::new(DedupBackend::default()),
            OrchestratorSettings {
                selection: ScenarioSelection::only([
                    ScenarioKind::SequentialRetry,
                    ScenarioKind::Race,
                ]),
                ..settings(0)
            },
        );
        let report = orchestrator.run().await.unwrap();

        assert_eq!(report.setup.len(), 1);
        let kinds: Vec<_> = report.scenarios.iter().map(|run| run.kind).collect();
        assert_eq!(kinds, vec![ScenarioKind::Race, ScenarioKind::SequentialRetry]);
        assert!(report.fan_out.is_none());
    }
}
