//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Verity CLI - Ask an untrusted miner network and get one consensus answer.
#[derive(Debug, Parser)]
#[command(name = "verity")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true, env = "VERITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run consensus offline over a file of miner responses
    Consensus(ConsensusArgs),

    /// Ask a live miner network
    Ask(AskArgs),

    /// Show or validate configuration
    Config(ConfigArgs),
}

/// Arguments for the consensus command.
#[derive(Debug, Parser)]
pub struct ConsensusArgs {
    /// The query the responses answer
    #[arg(short, long)]
    pub query: String,

    /// File holding the miner body (any supported shape, or plain text)
    #[arg(short, long)]
    pub responses: PathBuf,

    /// JSON array of corroborating sources
    #[arg(short, long)]
    pub sources: Option<PathBuf>,

    /// JSON array of per-miner provenance, overriding any in the responses file
    #[arg(short, long)]
    pub provenance: Option<PathBuf>,

    /// Enrichment context (live prices, scores, ...)
    #[arg(long)]
    pub context: Option<String>,

    /// Current time in seconds since the Unix epoch, for source recency
    #[arg(long)]
    pub now: Option<u64>,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// The query to answer
    #[arg(short, long)]
    pub query: String,

    /// Miner-pool gateway URL
    #[arg(short, long, env = "VERITY_ENDPOINT")]
    pub endpoint: String,

    /// Bearer token for the gateway
    #[arg(long, env = "VERITY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Enrichment context (live prices, scores, ...)
    #[arg(long)]
    pub context: Option<String>,

    /// JSON array of corroborating sources to serve for this query
    #[arg(short, long)]
    pub sources: Option<PathBuf>,

    /// Dispatch attempts before giving up
    #[arg(long, default_value = "3")]
    pub retries: u32,
}

/// Arguments for configuration commands.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration as TOML
    Show,

    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to --config)
        file: Option<PathBuf>,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
