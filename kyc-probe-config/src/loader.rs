//! Configuration loading and environment variable handling

use crate::domains::ProbeConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "KYC_PROBE".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<ProbeConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: ProbeConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<ProbeConfig> {
        let mut config = ProbeConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<ProbeConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut ProbeConfig) -> ConfigResult<()> {
        if let Ok(base_url) = self.get_env_var("BASE_URL") {
            config.target.base_url = base_url;
        }

        self.apply_http_overrides(&mut config.http)?;
        self.apply_scenario_overrides(&mut config.scenarios)?;

        if let Ok(path) = self.get_env_var("PAYLOAD_PATH") {
            config.payload.path = Some(PathBuf::from(path));
        }

        self.apply_logging_overrides(&mut config.logging)?;

        Ok(())
    }

    /// Apply HTTP config overrides
    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        let timeout_overridden = match self.get_env_var("HTTP_TIMEOUT") {
            Ok(timeout) => {
                let seconds: u64 = self.parse_env("HTTP_TIMEOUT", &timeout)?;
                config.timeout = std::time::Duration::from_secs(seconds);
                true
            }
            Err(_) => false,
        };

        if let Ok(connect_timeout) = self.get_env_var("HTTP_CONNECT_TIMEOUT") {
            let seconds: u64 = self.parse_env("HTTP_CONNECT_TIMEOUT", &connect_timeout)?;
            config.connect_timeout = std::time::Duration::from_secs(seconds);
        } else if timeout_overridden {
            // A short HTTP_TIMEOUT alone also shortens the connect phase
            config.connect_timeout = config.connect_timeout.min(config.timeout);
        }

        if let Ok(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        Ok(())
    }

    /// Apply scenario config overrides
    fn apply_scenario_overrides(
        &self,
        config: &mut crate::domains::scenarios::ScenarioConfig,
    ) -> ConfigResult<()> {
        if let Ok(users) = self.get_env_var("FAN_OUT_USERS") {
            config.fan_out_users = self.parse_env("FAN_OUT_USERS", &users)?;
        }

        if let Ok(race) = self.get_env_var("RACE_FAN_OUT") {
            config.race_fan_out = self.parse_env("RACE_FAN_OUT", &race)?;
        }

        if let Ok(chars) = self.get_env_var("PREVIEW_CHARS") {
            config.preview_chars = self.parse_env("PREVIEW_CHARS", &chars)?;
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    fn parse_env<T>(&self, name: &str, value: &str) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        value
            .trim()
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {}_{}: {}", self.prefix, name, e)))
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
