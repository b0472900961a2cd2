//! Core of kyc-probe: scenario planning, bounded concurrent dispatch and
//! aggregation of upload outcomes
//!
//! Network access goes through the [`IdentityProvisioner`] and [`Submitter`]
//! traits, so everything here runs against in-process fakes in tests.

pub mod aggregate;
pub mod backend;
pub mod errors;
pub mod orchestrator;
pub mod payload;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod types;

pub use aggregate::{aggregate, preview, LatencyStats, ScenarioResult};
pub use backend::{IdentityProvisioner, Submitter};
pub use errors::{OrchestrationError, PayloadError, ProvisionError};
pub use orchestrator::{
    FanOutProvisioning, Orchestrator, OrchestratorSettings, ProbeReport, ScenarioSelection,
    SetupUser, SkippedScenario,
};
pub use payload::{build_payload, Payload};
pub use runner::{ScenarioRun, ScenarioRunner};
pub use scenario::{document_number, ScenarioKind, ScenarioKindError, ScenarioPlan, Topology};
pub use types::{
    classify, Classification, DocumentType, DocumentTypeError, SubmissionOutcome, SubmissionTask,
    TestIdentity, TRANSPORT_FAILURE_STATUS,
};
