//! Upload payload configuration

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Payload configuration; without a path the builtin 1x1 PNG is uploaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadConfig {
    /// Real document to upload instead of the builtin image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Validatable for PayloadConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(ref path) = self.path {
            if path.as_os_str().is_empty() {
                return Err(self.validation_error("path cannot be empty"));
            }
            if path.file_name().is_none() {
                return Err(self.validation_error(format!(
                    "path {} does not name a file",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_validation() {
        assert!(PayloadConfig::default().validate().is_ok());

        let config = PayloadConfig {
            path: Some(PathBuf::from("docs/passport.png")),
        };
        assert!(config.validate().is_ok());

        let config = PayloadConfig {
            path: Some(PathBuf::new()),
        };
        assert!(config.validate().is_err());
    }
}
