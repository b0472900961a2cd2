//! Error types for provisioning, payload loading and orchestration

use std::path::PathBuf;
use thiserror::Error;

/// Why a test identity could not be created
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProvisionError {
    #[error("Registration failed with HTTP {status_code}: {body}")]
    RegistrationFailed { status_code: u16, body: String },

    #[error("Authentication failed with HTTP {status_code}: {body}")]
    AuthenticationFailed { status_code: u16, body: String },

    #[error("Backend response is missing the {missing}")]
    IncompleteIdentity { missing: String },

    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl ProvisionError {
    pub fn transport(error: impl std::fmt::Display) -> Self {
        ProvisionError::Transport {
            message: error.to_string(),
        }
    }
}

/// Errors loading a document payload from disk
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Failed to read payload {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Payload {0} is empty")]
    Empty(PathBuf),

    #[error("Payload {path} has unsupported extension '{extension}' (expected png, jpg, jpeg, pdf or txt)")]
    UnsupportedType { path: PathBuf, extension: String },
}

/// Failures that stop the run before or between scenarios
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("Failed to create setup user {user}: {source}")]
    SetupFailed {
        user: String,
        #[source]
        source: ProvisionError,
    },
}
