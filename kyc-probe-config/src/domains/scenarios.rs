//! Scenario sizing and test-identity settings

use crate::error::ConfigResult;
use crate::validation::{
    validate_at_most, validate_positive, validate_required_string, Validatable,
};
use serde::{Deserialize, Serialize};

/// Upper bound on fan-out identities; each one is a permanent backend registration
pub const MAX_FAN_OUT_USERS: usize = 1000;

/// Scenario configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Number of identical submissions fired in the race scenario
    #[serde(default = "default_race_fan_out")]
    pub race_fan_out: usize,

    /// Number of identities provisioned for the high fan-out scenario
    #[serde(default = "default_fan_out_users")]
    pub fan_out_users: usize,

    /// Characters of each response body shown in the report
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Password registered for every generated identity
    #[serde(default = "default_user_password")]
    pub user_password: String,

    /// Date of birth registered for every generated identity
    #[serde(default = "default_user_dob")]
    pub user_dob: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            race_fan_out: default_race_fan_out(),
            fan_out_users: default_fan_out_users(),
            preview_chars: default_preview_chars(),
            user_password: default_user_password(),
            user_dob: default_user_dob(),
        }
    }
}

impl Validatable for ScenarioConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.race_fan_out, "race_fan_out", self.domain_name())?;
        validate_positive(self.fan_out_users, "fan_out_users", self.domain_name())?;
        validate_at_most(
            self.fan_out_users,
            MAX_FAN_OUT_USERS,
            "fan_out_users",
            self.domain_name(),
        )?;
        validate_positive(self.preview_chars, "preview_chars", self.domain_name())?;
        validate_required_string(&self.user_password, "user_password", self.domain_name())?;
        validate_required_string(&self.user_dob, "user_dob", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "scenarios"
    }
}

fn default_race_fan_out() -> usize {
    5
}

fn default_fan_out_users() -> usize {
    100
}

fn default_preview_chars() -> usize {
    100
}

fn default_user_password() -> String {
    "Password@123".to_string()
}

fn default_user_dob() -> String {
    "1990-01-01".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_defaults() {
        let config = ScenarioConfig::default();
        assert_eq!(config.race_fan_out, 5);
        assert_eq!(config.fan_out_users, 100);
        assert_eq!(config.preview_chars, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scenario_bounds() {
        let mut config = ScenarioConfig::default();
        config.fan_out_users = MAX_FAN_OUT_USERS + 1;
        assert!(config.validate().is_err());

        config = ScenarioConfig::default();
        config.race_fan_out = 0;
        assert!(config.validate().is_err());

        config = ScenarioConfig::default();
        config.user_password = String::new();
        assert!(config.validate().is_err());
    }
}
