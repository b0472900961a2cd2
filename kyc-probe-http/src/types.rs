//! Request and response bodies of the auth endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Body of `POST /auth/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub password: String,
    pub is_active: bool,
    pub dob: String,
}

/// The part of the returned user record the harness needs
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    /// Numeric on the current backend; kept loose so string ids also work
    #[serde(default)]
    pub id: Option<JsonValue>,
}

impl RegisterResponse {
    /// The id as a form-field string, or `None` if absent or null
    pub fn user_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}
