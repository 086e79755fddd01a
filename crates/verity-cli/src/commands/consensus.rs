//! Consensus command implementation.

use crate::cli::ConsensusArgs;
use crate::commands::read_sources;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use tracing::{debug, warn};
use verity_domain::{ConsensusResult, MinerProvenance};
use verity_oracle::{ConsensusEngine, OracleConfig, RawMinerBatch};

/// Execute the consensus command.
pub fn execute_consensus(args: ConsensusArgs, config: &OracleConfig, formatter: &Formatter) -> Result<()> {
    let result = run_offline(args, config)?;
    println!("{}", formatter.format_result(&result, None)?);
    Ok(())
}

/// Decode the files named in `args` and run one round.
pub fn run_offline(args: ConsensusArgs, config: &OracleConfig) -> Result<ConsensusResult> {
    if args.query.trim().is_empty() {
        return Err(CliError::InvalidInput("query is empty".to_string()));
    }

    let body = std::fs::read_to_string(&args.responses)?;
    let batch = RawMinerBatch::decode(&body)?;
    debug!("Responses file has shape '{}'", batch.shape());
    let (responses, decoded_provenance) = batch.into_round();

    let provenance = match &args.provenance {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            let provenance: Vec<MinerProvenance> = serde_json::from_str(&contents)?;
            Some(provenance)
        }
        None => decoded_provenance,
    };

    let sources = match &args.sources {
        Some(path) => read_sources(path)?,
        None => Vec::new(),
    };

    if responses.is_empty() {
        warn!("No usable responses in {}", args.responses.display());
    }

    let engine = ConsensusEngine::new(config.consensus.clone(), config.ranking.clone());
    Ok(engine.run(
        args.query.trim(),
        &responses,
        provenance.as_deref(),
        sources,
        args.context,
        args.now,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn args(query: &str, responses: PathBuf) -> ConsensusArgs {
        ConsensusArgs {
            query: query.to_string(),
            responses,
            sources: None,
            provenance: None,
            context: None,
            now: None,
        }
    }

    #[test]
    fn test_plain_text_file_is_one_response() {
        let file = write_temp("The capital is Paris.");
        let result = run_offline(args("Capital of France?", file.path().to_path_buf()), &OracleConfig::default()).unwrap();
        assert_eq!(result.responded(), 1);
    }

    #[test]
    fn test_provenance_file_overrides() {
        let responses = write_temp(r#"["Paris", "Paris"]"#);
        let provenance = write_temp(r#"[{"address": "5A", "acknowledged": true}, {"address": "5B"}]"#);

        let mut round = args("Capital of France?", responses.path().to_path_buf());
        round.provenance = Some(provenance.path().to_path_buf());
        let result = run_offline(round, &OracleConfig::default()).unwrap();

        assert_eq!(result.miners[0].address, "5A");
        assert_eq!(result.miners[1].address, "5B");
    }

    #[test]
    fn test_empty_query_rejected() {
        let file = write_temp("[]");
        let result = run_offline(args("  ", file.path().to_path_buf()), &OracleConfig::default());
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_bad_sources_file() {
        let responses = write_temp(r#"["Yes"]"#);
        let sources = write_temp(r#"{"not": "a list"}"#);
        let mut round = args("q", responses.path().to_path_buf());
        round.sources = Some(sources.path().to_path_buf());
        assert!(matches!(
            run_offline(round, &OracleConfig::default()),
            Err(CliError::InvalidInput(_))
        ));
    }
}
