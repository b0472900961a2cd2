//! CLI argument parsing definitions

use clap::Parser;
use kyc_probe_core::ScenarioKind;
use std::path::PathBuf;

/// Probe a KYC document-upload API for concurrency bugs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// API root of the backend, e.g. http://localhost:8080/api
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Number of users created for the fan-out scenario
    #[arg(long, value_name = "COUNT")]
    pub fan_out_users: Option<usize>,

    /// Run only these scenarios (race, retry, keys, identities, fan-out or 1-5)
    #[arg(long, value_name = "SCENARIOS", value_delimiter = ',')]
    pub only: Vec<ScenarioKind>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub print_config: bool,
}
