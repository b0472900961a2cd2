//! Target backend configuration

use crate::error::ConfigResult;
use crate::validation::{validate_http_url, Validatable};
use serde::{Deserialize, Serialize};

/// Where the KYC backend lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// API root; endpoints are resolved as `{base_url}/auth/register` etc.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl TargetConfig {
    /// Base URL without any trailing slash
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_http_url(&self.base_url, "base_url", self.domain_name())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_defaults() {
        let config = TargetConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_root_strips_trailing_slash() {
        let config = TargetConfig {
            base_url: "http://kyc.internal:9000/api/".to_string(),
        };
        assert_eq!(config.api_root(), "http://kyc.internal:9000/api");
    }

    #[test]
    fn test_target_rejects_non_http() {
        let config = TargetConfig {
            base_url: "file:///tmp/api".to_string(),
        };
        assert!(config.validate().is_err());
    }
}
