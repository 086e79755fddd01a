//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;
use verity_oracle::OracleConfig;

/// Execute a config action.
pub fn execute_config(
    args: ConfigArgs,
    config: &OracleConfig,
    config_path: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            println!("{}", formatter.format_config(config)?);
        }
        ConfigAction::Validate { file } => {
            let path = file
                .as_deref()
                .or(config_path)
                .ok_or_else(|| CliError::InvalidInput("No configuration file given".to_string()))?;
            OracleConfig::from_file(path)?;
            println!("{}", formatter.success(&format!("{} is valid", path.display())));
        }
    }
    Ok(())
}
