//! CLI argument definitions for folio.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Build a draft from arguments or a file, submit it once, print the result |
//! | `shell` | Interactive draft editing with background analysis |
//! | `ping` | Print the valuation service banner |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--config` | none | TOML configuration file |
//! | `--endpoint` | config | Valuation endpoint URL |
//! | `--timeout-ms` | config | Request timeout in ms |
//! | `--log-level` | `RUST_LOG` or `warn` | tracing filter directive |
//!
//! # Examples
//!
//! ```bash
//! folio analyze --holding AAPL:10:150 --holding MSFT:5:310.5
//! folio analyze --file holdings.json --format json --pretty
//! folio --endpoint http://10.0.0.5:5000/analyze shell
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Portfolio analyzer client.
///
/// Assemble holdings (ticker, share count, cost per share), send them to a
/// valuation service, and view the market value, cost and gain/loss.
#[derive(Debug, Parser)]
#[command(
    name = "folio",
    author,
    version,
    about = "Portfolio analyzer client",
    long_about = "folio builds a draft portfolio, submits it to a valuation service, and renders \
the returned summary, allocation and per-holding table.\n\
\n\
Holdings the service cannot price are shown as error rows; the rest of the \
portfolio is still displayed.\n\
\n\
Use 'folio <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// TOML configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Valuation endpoint, overriding config and FOLIO_ENDPOINT.
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log filter (e.g. `debug`, `folio_core=info`). Logs go to stderr.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary, allocation and holdings table.
    Table,
    /// The view model as a JSON object.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a portfolio once and print the analysis.
    ///
    /// # Examples
    ///
    ///   folio analyze --holding AAPL:10:150
    ///   folio analyze --file holdings.json --format json
    Analyze(AnalyzeArgs),

    /// Edit a draft interactively; analyses run in the background.
    ///
    /// Type 'help' inside the shell for the command list.
    Shell,

    /// Check that the valuation service is reachable.
    Ping,
}

#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Holding as TICKER:QUANTITY:COST_BASIS (repeatable).
    #[arg(long = "holding", value_name = "TICKER:QTY:COST")]
    pub holdings: Vec<String>,

    /// JSON file with holdings: an array, or an object with a "holdings" array.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}
