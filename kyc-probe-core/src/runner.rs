//! Bounded concurrent dispatch of one scenario's tasks

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, ScenarioResult};
use crate::backend::Submitter;
use crate::scenario::{ScenarioKind, ScenarioPlan, Topology};
use crate::types::{serialize_seconds, SubmissionOutcome};

/// A drained scenario: its window and every outcome it produced
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRun {
    pub kind: ScenarioKind,
    pub topology: Topology,
    pub dispatched: usize,
    #[serde(skip)]
    pub started_at: Instant,
    #[serde(skip)]
    pub finished_at: Instant,
    #[serde(rename = "elapsed_seconds", serialize_with = "serialize_seconds")]
    pub elapsed: Duration,
    pub result: ScenarioResult,
}

/// Runs scenario plans against a submitter
///
/// Every run builds its own worker pool sized to the plan's topology and
/// joins all of it before returning, so no two scenarios ever share workers
/// or overlap in time.
pub struct ScenarioRunner<S> {
    submitter: Arc<S>,
}

impl<S> Clone for ScenarioRunner<S> {
    fn clone(&self) -> Self {
        Self {
            submitter: Arc::clone(&self.submitter),
        }
    }
}

impl<S> ScenarioRunner<S>
where
    S: Submitter + 'static,
{
    pub fn new(submitter: Arc<S>) -> Self {
        Self { submitter }
    }

    /// Dispatch every task exactly once and collect one outcome per task
    ///
    /// A task that fails, or whose worker panics, never disturbs its
    /// siblings; the panic is recorded as a transport-failure outcome.
    pub async fn run(&self, plan: ScenarioPlan) -> ScenarioRun {
        let kind = plan.kind();
        let topology = plan.topology();
        let max_in_flight = topology.max_in_flight();
        let tasks = plan.into_tasks();
        let dispatched = tasks.len();

        info!(
            scenario = %kind,
            tasks = dispatched,
            max_in_flight,
            "Starting scenario"
        );

        let semaphore = Arc::new(Semaphore::new(max_in_flight));
        let started_at = Instant::now();
        let mut handles: Vec<(String, JoinHandle<SubmissionOutcome>)> =
            Vec::with_capacity(dispatched);

        for task in tasks {
            let label = task.label().to_string();
            let submitter = Arc::clone(&self.submitter);
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return SubmissionOutcome::transport_failure(
                            task.label(),
                            format!("worker pool closed: {}", e),
                            Duration::ZERO,
                        )
                    }
                };

                debug!(
                    label = task.label(),
                    document_type = %task.document_type(),
                    document_number = task.document_number(),
                    "Dispatching submission"
                );
                submitter.submit(&task).await
            });

            handles.push((label, handle));
        }

        let mut outcomes = Vec::with_capacity(dispatched);
        for (label, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(label = %label, "Submission worker failed: {}", e);
                    SubmissionOutcome::transport_failure(
                        label,
                        format!("submission worker failed: {}", e),
                        Duration::ZERO,
                    )
                }
            };
            outcomes.push(outcome);
        }

        let finished_at = Instant::now();
        let result = aggregate(outcomes);

        info!(
            scenario = %kind,
            success = result.success_count,
            failure = result.failure_count,
            elapsed_ms = (finished_at - started_at).as_millis() as u64,
            "Scenario drained"
        );

        ScenarioRun {
            kind,
            topology,
            dispatched,
            started_at,
            finished_at,
            elapsed: finished_at - started_at,
            result,
        }
    }
}
