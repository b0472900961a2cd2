//! The five concurrency scenarios and their dispatch topologies

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::types::{DocumentType, SubmissionTask, TestIdentity};

/// Which concurrency property a scenario probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// N identical submissions (same user, type and number) in parallel
    Race,
    /// One new submission for the raced type after the race drained
    SequentialRetry,
    /// Same user, two document types at once
    ParallelDifferentKeys,
    /// Two users, same document type at once
    ParallelDifferentIdentities,
    /// Many distinct users at once
    HighFanOut,
}

impl ScenarioKind {
    /// Short name accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::Race => "race",
            ScenarioKind::SequentialRetry => "retry",
            ScenarioKind::ParallelDifferentKeys => "keys",
            ScenarioKind::ParallelDifferentIdentities => "identities",
            ScenarioKind::HighFanOut => "fan-out",
        }
    }

    /// Position in the run, 1-based
    pub fn number(&self) -> usize {
        match self {
            ScenarioKind::Race => 1,
            ScenarioKind::SequentialRetry => 2,
            ScenarioKind::ParallelDifferentKeys => 3,
            ScenarioKind::ParallelDifferentIdentities => 4,
            ScenarioKind::HighFanOut => 5,
        }
    }

    /// Report heading for a run that dispatched `tasks` submissions
    pub fn title(&self, tasks: usize) -> String {
        match self {
            ScenarioKind::Race => format!(
                "Race Condition: {} concurrent requests (User A, PAN)",
                tasks
            ),
            ScenarioKind::SequentialRetry => {
                "Sequential Retry: New request (User A, PAN, New Doc Number)".to_string()
            }
            ScenarioKind::ParallelDifferentKeys => {
                "Parallel Different Docs: User A submitting PASSPORT and AADHAAR simultaneously"
                    .to_string()
            }
            ScenarioKind::ParallelDifferentIdentities => {
                "Different Users: User A (LICENSE) vs User B (LICENSE)".to_string()
            }
            ScenarioKind::HighFanOut => format!(
                "High Concurrency: {} different users submitting simultaneously",
                tasks
            ),
        }
    }

    /// All scenarios in run order
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::Race,
            ScenarioKind::SequentialRetry,
            ScenarioKind::ParallelDifferentKeys,
            ScenarioKind::ParallelDifferentIdentities,
            ScenarioKind::HighFanOut,
        ]
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = ScenarioKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "race" | "1" => Ok(ScenarioKind::Race),
            "retry" | "2" => Ok(ScenarioKind::SequentialRetry),
            "keys" | "3" => Ok(ScenarioKind::ParallelDifferentKeys),
            "identities" | "4" => Ok(ScenarioKind::ParallelDifferentIdentities),
            "fan-out" | "fanout" | "5" => Ok(ScenarioKind::HighFanOut),
            _ => Err(ScenarioKindError::Unknown(s.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ScenarioKindError {
    #[error("Unknown scenario: '{0}'. Known scenarios are: race, retry, keys, identities, fan-out")]
    Unknown(String),
}

/// How a scenario's tasks are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Topology {
    /// One call at a time
    Sequential,
    /// Up to `max_in_flight` calls outstanding at once
    Parallel { max_in_flight: usize },
}

impl Topology {
    /// Worker limit; never zero
    pub fn max_in_flight(&self) -> usize {
        match self {
            Topology::Sequential => 1,
            Topology::Parallel { max_in_flight } => (*max_in_flight).max(1),
        }
    }
}

/// A scenario's tasks plus the topology to dispatch them with
#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    kind: ScenarioKind,
    topology: Topology,
    tasks: Vec<SubmissionTask>,
}

impl ScenarioPlan {
    pub fn new(kind: ScenarioKind, topology: Topology, tasks: Vec<SubmissionTask>) -> Self {
        Self {
            kind,
            topology,
            tasks,
        }
    }

    /// `fan_out` identical PAN submissions sharing one document number
    pub fn race(identity: &Arc<TestIdentity>, fan_out: usize) -> Self {
        let document_number = document_number(DocumentType::Pan);
        let tasks = (1..=fan_out)
            .map(|attempt| {
                SubmissionTask::new(
                    format!("attempt {}", attempt),
                    Arc::clone(identity),
                    DocumentType::Pan,
                    document_number.clone(),
                )
            })
            .collect();

        Self::new(
            ScenarioKind::Race,
            Topology::Parallel {
                max_in_flight: fan_out,
            },
            tasks,
        )
    }

    /// A single PAN submission with a fresh document number
    pub fn sequential_retry(identity: &Arc<TestIdentity>) -> Self {
        let task = SubmissionTask::new(
            "retry",
            Arc::clone(identity),
            DocumentType::Pan,
            document_number(DocumentType::Pan),
        );
        Self::new(ScenarioKind::SequentialRetry, Topology::Sequential, vec![task])
    }

    /// PASSPORT and AADHAAR for the same user at once
    pub fn parallel_different_keys(identity: &Arc<TestIdentity>) -> Self {
        let tasks = [DocumentType::Passport, DocumentType::Aadhaar]
            .into_iter()
            .map(|doc_type| {
                SubmissionTask::new(
                    doc_type.as_str(),
                    Arc::clone(identity),
                    doc_type,
                    document_number(doc_type),
                )
            })
            .collect();

        Self::new(
            ScenarioKind::ParallelDifferentKeys,
            Topology::Parallel { max_in_flight: 2 },
            tasks,
        )
    }

    /// LICENSE for two different users at once
    pub fn parallel_different_identities(
        user_a: &Arc<TestIdentity>,
        user_b: &Arc<TestIdentity>,
    ) -> Self {
        let tasks = [("User A", user_a), ("User B", user_b)]
            .into_iter()
            .map(|(label, identity)| {
                SubmissionTask::new(
                    label,
                    Arc::clone(identity),
                    DocumentType::License,
                    document_number(DocumentType::License),
                )
            })
            .collect();

        Self::new(
            ScenarioKind::ParallelDifferentIdentities,
            Topology::Parallel { max_in_flight: 2 },
            tasks,
        )
    }

    /// One VOTER_ID submission per identity, all in flight together
    ///
    /// Document numbers are drawn until unique across the whole plan.
    pub fn high_fan_out(identities: &[Arc<TestIdentity>]) -> Self {
        let mut issued = HashSet::with_capacity(identities.len());
        let tasks = identities
            .iter()
            .enumerate()
            .map(|(index, identity)| {
                let number = loop {
                    let candidate = document_number(DocumentType::VoterId);
                    if issued.insert(candidate.clone()) {
                        break candidate;
                    }
                };
                SubmissionTask::new(
                    format!("user {} ({})", index + 1, identity.email()),
                    Arc::clone(identity),
                    DocumentType::VoterId,
                    number,
                )
            })
            .collect();

        Self::new(
            ScenarioKind::HighFanOut,
            Topology::Parallel {
                max_in_flight: identities.len(),
            },
            tasks,
        )
    }

    pub fn kind(&self) -> ScenarioKind {
        self.kind
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn tasks(&self) -> &[SubmissionTask] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<SubmissionTask> {
        self.tasks
    }
}

/// `<PREFIX><5 upper-case hex chars>`, e.g. `PAN3FA9C`
pub fn document_number(document_type: DocumentType) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}",
        document_type.number_prefix(),
        suffix[..5].to_uppercase()
    )
}
