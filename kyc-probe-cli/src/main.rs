use anyhow::{bail, Context, Result};
use clap::Parser;
use kyc_probe_config::{ConfigLoader, ProbeConfig};
use kyc_probe_core::{
    build_payload, Orchestrator, OrchestratorSettings, ScenarioSelection,
};
use kyc_probe_http::{ClientConfig, KycApiClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

mod cli;
mod logging;

use cli::Cli;
use logging::init_tracing;

/// Load configuration from file or environment
///
/// An explicit `--config` path that does not exist is an error; only the
/// absence of `--config` falls back to environment and defaults.
fn load_config(config_path: Option<&PathBuf>) -> Result<ProbeConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => {
            if !path.exists() {
                bail!("Configuration file not found: {:?}", path);
            }
            loader
                .from_file(path)
                .context(format!("Failed to load configuration from {:?}", path))
        }
        None => loader
            .from_env()
            .context("Failed to load configuration from environment"),
    }
}

/// Fold command-line overrides into the loaded configuration
fn apply_cli_overrides(cli: &Cli, config: &mut ProbeConfig) -> Result<()> {
    if let Some(base_url) = &cli.base_url {
        config.target.base_url = base_url.clone();
    }
    if let Some(users) = cli.fan_out_users {
        config.scenarios.fan_out_users = users;
    }
    config
        .validate_all()
        .context("Invalid command-line overrides")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", ProbeConfig::generate_sample());
        return Ok(());
    }

    let mut config = load_config(cli.config.as_ref())?;
    apply_cli_overrides(&cli, &mut config)?;
    init_tracing(cli.log_level.as_ref(), &config.logging)?;
    if let Some(path) = &cli.config {
        info!("Loaded configuration from: {:?}", path);
    }

    info!(target_url = config.target.api_root(), "kyc-probe starting");

    let payload = build_payload(config.payload.path.as_deref())
        .context("Failed to prepare the upload payload")?;
    info!("Using payload {}", payload);

    let client = KycApiClient::new(ClientConfig::from(&config), payload.clone())
        .context("Failed to build the HTTP client")?;

    let selection = if cli.only.is_empty() {
        ScenarioSelection::all()
    } else {
        ScenarioSelection::only(cli.only.iter().copied())
    };

    let settings = OrchestratorSettings {
        race_fan_out: config.scenarios.race_fan_out,
        fan_out_users: config.scenarios.fan_out_users,
        selection,
        target: config.target.api_root().to_string(),
        payload: payload.to_string(),
        preview_chars: config.scenarios.preview_chars,
    };

    let orchestrator = Orchestrator::new(client.clone(), Arc::new(client), settings);
    let report = match orchestrator.run().await {
        Ok(report) => report,
        Err(e) => {
            error!("Probe aborted: {}", e);
            return Err(e).context("Setup failed, no scenarios were run");
        }
    };

    if cli.json {
        let json = report.to_json().context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", report);
    }

    info!(scenarios = report.scenarios.len(), "kyc-probe finished");
    Ok(())
}
