//! Ask command implementation.

use crate::cli::AskArgs;
use crate::commands::read_sources;
use crate::error::Result;
use crate::output::Formatter;
use tracing::info;
use verity_oracle::{HttpDispatcher, Oracle, OracleConfig};
use verity_sources::{CachedSourceProvider, StaticSourceProvider};

/// Execute the ask command.
pub async fn execute_ask(args: AskArgs, config: OracleConfig, formatter: &Formatter) -> Result<()> {
    let mut dispatcher = HttpDispatcher::new(&args.endpoint)
        .with_timeout(config.dispatch_timeout())
        .with_max_retries(args.retries);
    if let Some(key) = args.api_key {
        dispatcher = dispatcher.with_api_key(key);
    }

    let sources = match &args.sources {
        Some(path) => read_sources(path)?,
        None => Vec::new(),
    };
    let provider = CachedSourceProvider::new(StaticSourceProvider::new(sources), config.cache_ttl());

    info!("Asking miner pool at {}", args.endpoint);
    let oracle = Oracle::new(dispatcher, provider, config)?;
    let answer = oracle.answer_with_context(&args.query, args.context).await?;

    println!("{}", formatter.format_result(&answer.result, Some(&answer.metadata))?);
    Ok(())
}
