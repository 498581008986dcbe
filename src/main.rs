//! cep-race command line.
//!
//! Looks up one CEP on every configured provider and prints the first answer.
//! Exit status: 0 on success, 1 when the first provider to finish failed,
//! 2 on timeout, 3 when the race could not start (config or CEP rejected).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cep_race::config::{load_config, validate_config, ConfigError, RaceConfig};
use cep_race::observability::logging::init_logging;
use cep_race::race::EXIT_STARTUP_ERROR;
use cep_race::{render, LookupQuery, OutputFormat, RaceCoordinator, RaceStrategy};

#[derive(Parser)]
#[command(name = "cep-race")]
#[command(about = "Race several CEP lookup services and print the fastest answer", long_about = None)]
struct Cli {
    /// CEP to look up (NNNNNNNN or NNNNN-NNN)
    cep: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overall deadline in milliseconds
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// How to treat a provider that fails first
    #[arg(short, long, value_enum)]
    strategy: Option<RaceStrategy>,

    /// Only race the named provider (repeatable)
    #[arg(short, long = "provider")]
    providers: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, query) = match prepare(&cli) {
        Ok(prepared) => prepared,
        Err(e) => {
            // Logging may not be up yet when the config file itself is bad.
            eprintln!("error: {}", e);
            return ExitCode::from(EXIT_STARTUP_ERROR);
        }
    };

    let coordinator = RaceCoordinator::from_config(&config);

    tracing::info!(
        cep = %query,
        providers = ?coordinator.provider_names(),
        timeout_ms = config.timeout_ms,
        "Configuration loaded"
    );

    let outcome = coordinator.race(&query).await;
    println!("{}", render(&outcome, cli.format));

    // Losing lookups are dropped with the runtime; nothing waits for them.
    ExitCode::from(outcome.exit_code())
}

/// Load config, apply CLI overrides, validate, and parse the CEP.
fn prepare(cli: &Cli) -> Result<(RaceConfig, LookupQuery), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RaceConfig::default(),
    };

    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    init_logging(&config.observability.log_level);

    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if !cli.providers.is_empty() {
        let unknown = config.retain_providers(&cli.providers);
        if !unknown.is_empty() {
            tracing::warn!(unknown = ?unknown, "Ignoring unknown providers");
        }
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    let query = LookupQuery::parse(&cli.cep)?;
    Ok((config, query))
}
