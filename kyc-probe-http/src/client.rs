//! reqwest client for the KYC backend

use async_trait::async_trait;
use kyc_probe_core::{
    IdentityProvisioner, Payload, ProvisionError, SubmissionOutcome, SubmissionTask, Submitter,
    TestIdentity,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::credentials::generate_registration;
use crate::errors::HttpError;
use crate::types::{LoginRequest, LoginResponse, RegisterResponse};

/// Talks to the three backend endpoints the harness uses
///
/// One pooled `reqwest::Client` is shared by every concurrent submission;
/// cloning a `KycApiClient` shares the pool and the payload buffer.
#[derive(Debug, Clone)]
pub struct KycApiClient {
    client: Client,
    config: ClientConfig,
    payload: Payload,
}

impl KycApiClient {
    pub fn new(config: ClientConfig, payload: Payload) -> Result<Self, HttpError> {
        Url::parse(&config.api_root)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", config.api_root, e)))?;

        debug!(
            "Creating KYC client for {} with {}s timeout",
            config.api_root,
            config.timeout.as_secs()
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()?;

        Ok(Self {
            client,
            config,
            payload,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_root, path)
    }

    fn upload_form(&self, task: &SubmissionTask) -> Result<Form, reqwest::Error> {
        let file = Part::stream_with_length(self.payload.bytes(), self.payload.len() as u64)
            .file_name(self.payload.file_name().to_string())
            .mime_str(self.payload.content_type())?;

        Ok(Form::new()
            .text("userId", task.identity().backend_user_id().to_string())
            .text("documentType", task.document_type().as_str())
            .text("documentNumber", task.document_number().to_string())
            .part("file", file))
    }
}

#[async_trait]
impl IdentityProvisioner for KycApiClient {
    async fn provision(&self, name_prefix: &str) -> Result<TestIdentity, ProvisionError> {
        let registration =
            generate_registration(name_prefix, &self.config.user_password, &self.config.user_dob);
        let email = registration.email.clone();

        debug!(name = %registration.name, email = %email, "Registering user");
        let response = self
            .client
            .post(self.endpoint("auth/register"))
            .json(&registration)
            .send()
            .await
            .map_err(ProvisionError::transport)?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            warn!(name = %registration.name, status = status.as_u16(), "Registration failed");
            return Err(ProvisionError::RegistrationFailed {
                status_code: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(ProvisionError::transport)?;
        let user_id = serde_json::from_str::<RegisterResponse>(&body)
            .ok()
            .and_then(|registered| registered.user_id())
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                warn!(name = %registration.name, "Registration response has no user id");
                ProvisionError::IncompleteIdentity {
                    missing: "backend user id".to_string(),
                }
            })?;

        let login = LoginRequest {
            email: email.clone(),
            password: self.config.user_password.clone(),
        };
        let response = self
            .client
            .post(self.endpoint("auth/login"))
            .json(&login)
            .send()
            .await
            .map_err(ProvisionError::transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(email = %email, status = status.as_u16(), "Login failed");
            return Err(ProvisionError::AuthenticationFailed {
                status_code: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(ProvisionError::transport)?;
        let token = serde_json::from_str::<LoginResponse>(&body)
            .ok()
            .and_then(|session| session.access_token)
            .unwrap_or_default();
        let identity = TestIdentity::new(token, user_id, email)?;

        info!(id = identity.backend_user_id(), email = identity.email(), "User provisioned");
        Ok(identity)
    }
}

#[async_trait]
impl Submitter for KycApiClient {
    async fn submit(&self, task: &SubmissionTask) -> SubmissionOutcome {
        let form = match self.upload_form(task) {
            Ok(form) => form,
            Err(e) => {
                return SubmissionOutcome::transport_failure(
                    task.label(),
                    format!("failed to build upload form: {}", e),
                    std::time::Duration::ZERO,
                )
            }
        };

        let request = self
            .client
            .post(self.endpoint("kyc/upload"))
            .bearer_auth(task.identity().session_token())
            .multipart(form);

        let start = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let latency = start.elapsed();
                warn!(label = task.label(), "Upload failed before a response: {}", e);
                return SubmissionOutcome::transport_failure(task.label(), e, latency);
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                let latency = start.elapsed();
                warn!(label = task.label(), status, "Failed to read upload response: {}", e);
                return SubmissionOutcome::transport_failure(task.label(), e, latency);
            }
        };
        let latency = start.elapsed();

        debug!(
            label = task.label(),
            status,
            latency_ms = latency.as_millis() as u64,
            "Upload completed"
        );
        SubmissionOutcome::new(task.label(), status, body, latency)
    }
}
