//! The network seam: what the harness needs from a KYC backend client

use async_trait::async_trait;

use crate::errors::ProvisionError;
use crate::types::{SubmissionOutcome, SubmissionTask, TestIdentity};

/// Creates fresh registered-and-authenticated test users
#[async_trait]
pub trait IdentityProvisioner: Send + Sync {
    /// Register and log in a new user whose name starts with `name_prefix`.
    /// No retries: one failed step makes the identity unusable.
    async fn provision(&self, name_prefix: &str) -> Result<TestIdentity, ProvisionError>;
}

/// Executes one document submission
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Always yields an outcome; transport failures are folded into a
    /// sentinel-status outcome rather than returned as errors.
    async fn submit(&self, task: &SubmissionTask) -> SubmissionOutcome;
}
