//! Integration tests for kyc-probe-config

use kyc_probe_config::*;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use temp_env::with_vars;

#[test]
fn test_default_config_validation() {
    let config = ProbeConfig::default();
    assert!(config.validate_all().is_ok());
    assert_eq!(config.target.base_url, "http://localhost:8080/api");
    assert_eq!(config.scenarios.fan_out_users, 100);
    assert!(config.payload.path.is_none());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("KYC_PROBE_BASE_URL", Some("http://kyc.staging:8080/api")),
        ("KYC_PROBE_HTTP_TIMEOUT", Some("60")),
        ("KYC_PROBE_FAN_OUT_USERS", Some("25")),
        ("KYC_PROBE_RACE_FAN_OUT", Some("8")),
        ("KYC_PROBE_PAYLOAD_PATH", Some("/tmp/passport.png")),
        ("KYC_PROBE_LOG_LEVEL", Some("debug")),
        ("KYC_PROBE_LOG_FORMAT", Some("json")),
    ];

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();

        assert_eq!(config.target.base_url, "http://kyc.staging:8080/api");
        assert_eq!(config.http.timeout, Duration::from_secs(60));
        assert_eq!(config.scenarios.fan_out_users, 25);
        assert_eq!(config.scenarios.race_fan_out, 8);
        assert_eq!(config.payload.path, Some(PathBuf::from("/tmp/passport.png")));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    });
}

#[test]
fn test_short_http_timeout_override() {
    let vars = vec![
        ("KYC_PROBE_HTTP_TIMEOUT", Some("5")),
        ("KYC_PROBE_HTTP_CONNECT_TIMEOUT", None::<&str>),
    ];
    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.http.timeout, Duration::from_secs(5));
        assert_eq!(config.http.connect_timeout, Duration::from_secs(5));
    });

    let vars = vec![
        ("KYC_PROBE_HTTP_TIMEOUT", Some("5")),
        ("KYC_PROBE_HTTP_CONNECT_TIMEOUT", Some("2")),
    ];
    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.http.connect_timeout, Duration::from_secs(2));
    });

    let vars = vec![
        ("KYC_PROBE_HTTP_TIMEOUT", Some("5")),
        ("KYC_PROBE_HTTP_CONNECT_TIMEOUT", Some("8")),
    ];
    with_vars(vars, || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::DomainError { .. }));
    });
}

#[test]
fn test_invalid_env_values_are_rejected() {
    with_vars(vec![("KYC_PROBE_FAN_OUT_USERS", Some("lots"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
    });

    with_vars(vec![("KYC_PROBE_FAN_OUT_USERS", Some("5000"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::DomainError { .. }));
    });

    with_vars(vec![("KYC_PROBE_BASE_URL", Some("localhost"))], || {
        assert!(ConfigLoader::new().from_env().is_err());
    });
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("PROBE_TEST_RACE_FAN_OUT", Some("3"))], || {
        let config = ConfigLoader::with_prefix("PROBE_TEST").from_env().unwrap();
        assert_eq!(config.scenarios.race_fan_out, 3);
    });
}

#[test]
fn test_yaml_config_round_trip() {
    let yaml = ProbeConfig::generate_sample();
    let parsed: ProbeConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(parsed.validate_all().is_ok());
    assert_eq!(parsed.scenarios, ScenarioConfig::default());
}

#[test]
fn test_load_from_file_with_partial_sections() {
    let yaml = r#"
target:
  base_url: "https://kyc.example.com/api"

http:
  timeout: 45

scenarios:
  fan_out_users: 10
  preview_chars: 40

logging:
  level: warn
  format: compact
"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    with_vars(vec![("KYC_PROBE_FAN_OUT_USERS", None::<&str>)], || {
        let config = ConfigLoader::new().load(Some(file.path())).unwrap();

        assert_eq!(config.target.api_root(), "https://kyc.example.com/api");
        assert_eq!(config.http.timeout, Duration::from_secs(45));
        assert_eq!(config.http.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.scenarios.fan_out_users, 10);
        assert_eq!(config.scenarios.race_fan_out, 5);
        assert_eq!(config.scenarios.preview_chars, 40);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Compact);
    });
}

#[test]
fn test_env_overrides_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"scenarios:\n  fan_out_users: 10\n").unwrap();

    with_vars(vec![("KYC_PROBE_FAN_OUT_USERS", Some("12"))], || {
        let config = ConfigLoader::new().from_file(file.path()).unwrap();
        assert_eq!(config.scenarios.fan_out_users, 12);
    });
}

#[test]
fn test_missing_file_is_an_error() {
    let err = ConfigLoader::new()
        .from_file("/definitely/not/here/kyc-probe.yaml")
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError(_)));
}
