//! Client configuration

use kyc_probe_config::ProbeConfig;
use std::time::Duration;

/// Everything the backend client needs, flattened from [`ProbeConfig`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root without trailing slash, e.g. `http://localhost:8080/api`
    pub api_root: String,

    /// Whole-request timeout
    pub timeout: Duration,

    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,

    pub pool_max_idle_per_host: usize,

    /// Password given to every generated user
    pub user_password: String,

    /// Date of birth given to every generated user
    pub user_dob: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from(&ProbeConfig::default())
    }
}

impl ClientConfig {
    /// Defaults pointed at another API root
    pub fn with_api_root(api_root: impl Into<String>) -> Self {
        let api_root = api_root.into();
        Self {
            api_root: api_root.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

impl From<&ProbeConfig> for ClientConfig {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            api_root: config.target.api_root().to_string(),
            timeout: config.http.timeout,
            connect_timeout: config.http.connect_timeout,
            user_agent: config.http.user_agent.clone(),
            pool_max_idle_per_host: config.http.pool_max_idle_per_host,
            user_password: config.scenarios.user_password.clone(),
            user_dob: config.scenarios.user_dob.clone(),
        }
    }
}
