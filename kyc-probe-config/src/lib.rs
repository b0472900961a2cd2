//! Domain-driven configuration for the kyc-probe harness
//!
//! Configuration is split by functional domain (target, http, scenarios,
//! payload, logging), each with defaults, validation and environment
//! variable overrides. Running with no file and no environment yields the
//! stock settings for a backend on `localhost:8080`.

pub mod error;
pub mod loader;
pub mod validation;

pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

pub use domains::{
    http::HttpConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    payload::PayloadConfig,
    scenarios::ScenarioConfig,
    target::TargetConfig,
    ProbeConfig,
};

pub use domains::utils::serde_duration;
