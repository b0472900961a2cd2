//! Identities, submission tasks and their outcomes

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::errors::ProvisionError;

/// Status recorded when a submission never got an HTTP response
pub const TRANSPORT_FAILURE_STATUS: u16 = 599;

/// Document types accepted by the KYC upload endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Pan,
    Passport,
    Aadhaar,
    License,
    VoterId,
}

impl DocumentType {
    /// Wire representation sent as the `documentType` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pan => "PAN",
            DocumentType::Passport => "PASSPORT",
            DocumentType::Aadhaar => "AADHAAR",
            DocumentType::License => "LICENSE",
            DocumentType::VoterId => "VOTER_ID",
        }
    }

    /// Prefix used when generating document numbers
    pub fn number_prefix(&self) -> &'static str {
        match self {
            DocumentType::Pan => "PAN",
            DocumentType::Passport => "PASS",
            DocumentType::Aadhaar => "AAD",
            DocumentType::License => "LIC",
            DocumentType::VoterId => "VOTE",
        }
    }

    /// Get all supported document types
    pub fn all() -> &'static [DocumentType] {
        &[
            DocumentType::Pan,
            DocumentType::Passport,
            DocumentType::Aadhaar,
            DocumentType::License,
            DocumentType::VoterId,
        ]
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = DocumentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PAN" => Ok(DocumentType::Pan),
            "PASSPORT" => Ok(DocumentType::Passport),
            "AADHAAR" => Ok(DocumentType::Aadhaar),
            "LICENSE" => Ok(DocumentType::License),
            "VOTER_ID" => Ok(DocumentType::VoterId),
            _ => Err(DocumentTypeError::InvalidType(s.to_string())),
        }
    }
}

/// Errors that can occur when parsing document types
#[derive(Error, Debug, Clone)]
pub enum DocumentTypeError {
    #[error("Invalid document type: '{0}'. Supported types are: PAN, PASSPORT, AADHAAR, LICENSE, VOTER_ID")]
    InvalidType(String),
}

/// A registered and authenticated backend user
///
/// Construction fails unless both the session token and the backend user id
/// are present, so any `TestIdentity` in hand can be used for submissions.
#[derive(Clone, PartialEq, Eq)]
pub struct TestIdentity {
    session_token: String,
    backend_user_id: String,
    email: String,
}

impl TestIdentity {
    pub fn new(
        session_token: impl Into<String>,
        backend_user_id: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, ProvisionError> {
        let session_token = session_token.into();
        let backend_user_id = backend_user_id.into();

        if session_token.trim().is_empty() {
            return Err(ProvisionError::IncompleteIdentity {
                missing: "session token".to_string(),
            });
        }
        if backend_user_id.trim().is_empty() {
            return Err(ProvisionError::IncompleteIdentity {
                missing: "backend user id".to_string(),
            });
        }

        Ok(Self {
            session_token,
            backend_user_id,
            email: email.into(),
        })
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    pub fn backend_user_id(&self) -> &str {
        &self.backend_user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

// Tokens end up in logs otherwise
impl fmt::Debug for TestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestIdentity")
            .field("session_token", &"<redacted>")
            .field("backend_user_id", &self.backend_user_id)
            .field("email", &self.email)
            .finish()
    }
}

/// One document submission to dispatch
#[derive(Debug, Clone)]
pub struct SubmissionTask {
    label: String,
    identity: Arc<TestIdentity>,
    document_type: DocumentType,
    document_number: String,
}

impl SubmissionTask {
    pub fn new(
        label: impl Into<String>,
        identity: Arc<TestIdentity>,
        document_type: DocumentType,
        document_number: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            identity,
            document_type,
            document_number: document_number.into(),
        }
    }

    /// Human-readable name used in the report
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn identity(&self) -> &TestIdentity {
        &self.identity
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn document_number(&self) -> &str {
        &self.document_number
    }
}

/// Closed success/failure classification of an upload status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Success,
    Failure,
}

/// Classify an upload status code: 200 and 202 are the only successes
pub fn classify(status_code: u16) -> Classification {
    match status_code {
        200 | 202 => Classification::Success,
        _ => Classification::Failure,
    }
}

/// The result of exactly one dispatched submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    label: String,
    status_code: u16,
    body: String,
    #[serde(rename = "latency_seconds", serialize_with = "serialize_seconds")]
    latency: Duration,
}

impl SubmissionOutcome {
    pub fn new(
        label: impl Into<String>,
        status_code: u16,
        body: impl Into<String>,
        latency: Duration,
    ) -> Self {
        Self {
            label: label.into(),
            status_code,
            body: body.into(),
            latency,
        }
    }

    /// Outcome for a call that failed before any response arrived
    pub fn transport_failure(
        label: impl Into<String>,
        error: impl fmt::Display,
        latency: Duration,
    ) -> Self {
        Self::new(label, TRANSPORT_FAILURE_STATUS, error.to_string(), latency)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn classification(&self) -> Classification {
        classify(self.status_code)
    }

    pub fn is_success(&self) -> bool {
        self.classification() == Classification::Success
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status_code == TRANSPORT_FAILURE_STATUS
    }
}

pub(crate) fn serialize_seconds<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_from_str() {
        assert_eq!("PAN".parse::<DocumentType>().unwrap(), DocumentType::Pan);
        assert_eq!("passport".parse::<DocumentType>().unwrap(), DocumentType::Passport);
        assert_eq!("voter_id".parse::<DocumentType>().unwrap(), DocumentType::VoterId);
        assert!("DRIVING".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_document_type_wire_names() {
        for doc_type in DocumentType::all() {
            assert_eq!(doc_type.as_str().parse::<DocumentType>().unwrap(), *doc_type);
            assert_eq!(
                serde_json::to_value(doc_type).unwrap(),
                serde_json::json!(doc_type.as_str())
            );
        }
    }

    #[test]
    fn test_classify_success_set() {
        assert_eq!(classify(200), Classification::Success);
        assert_eq!(classify(202), Classification::Success);
        assert_eq!(classify(201), Classification::Failure);
        assert_eq!(classify(204), Classification::Failure);
        assert_eq!(classify(400), Classification::Failure);
        assert_eq!(classify(409), Classification::Failure);
        assert_eq!(classify(TRANSPORT_FAILURE_STATUS), Classification::Failure);
    }

    #[test]
    fn test_identity_requires_token_and_id() {
        assert!(TestIdentity::new("token", "42", "a@example.com").is_ok());

        let err = TestIdentity::new("", "42", "a@example.com").unwrap_err();
        assert!(matches!(err, ProvisionError::IncompleteIdentity { .. }));

        let err = TestIdentity::new("token", " ", "a@example.com").unwrap_err();
        assert!(matches!(err, ProvisionError::IncompleteIdentity { .. }));
    }

    #[test]
    fn test_identity_debug_redacts_token() {
        let identity = TestIdentity::new("secret-jwt", "42", "a@example.com").unwrap();
        let debug = format!("{:?}", identity);
        assert!(!debug.contains("secret-jwt"));
        assert!(debug.contains("42"));
    }

    #[test]
    fn test_transport_failure_outcome() {
        let outcome = SubmissionOutcome::transport_failure(
            "attempt 1",
            "connection refused",
            Duration::from_millis(3),
        );
        assert_eq!(outcome.status_code(), TRANSPORT_FAILURE_STATUS);
        assert!(outcome.is_transport_failure());
        assert!(!outcome.is_success());
        assert_eq!(outcome.body(), "connection refused");
    }

    #[test]
    fn test_outcome_serializes_latency_in_seconds() {
        let outcome = SubmissionOutcome::new("retry", 202, "accepted", Duration::from_millis(1500));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["latency_seconds"], serde_json::json!(1.5));
        assert_eq!(value["status_code"], serde_json::json!(202));
    }
}
