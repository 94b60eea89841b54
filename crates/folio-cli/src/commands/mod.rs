mod analyze;
mod ping;
mod shell;

use std::sync::Arc;

use folio_core::{FolioConfig, ValuationService};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = resolve_config(cli)?;
    debug!(endpoint = %config.endpoint, timeout_ms = config.timeout_ms, "configuration resolved");
    let service = ValuationService::from_config(&config);

    match &cli.command {
        Command::Analyze(args) => analyze::run(args, &service, cli.format, cli.pretty).await,
        Command::Shell => shell::run(Arc::new(service), cli.format, cli.pretty).await,
        Command::Ping => ping::run(&service).await,
    }
}

/// Defaults, config file and environment, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<FolioConfig, CliError> {
    let mut config = FolioConfig::load(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.trim().to_string();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    config.validate()?;
    Ok(config)
}
