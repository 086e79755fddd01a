//! Configuration loading for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use verity_oracle::OracleConfig;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Load the oracle configuration from `path`, or the defaults when none is given.
pub fn load(path: Option<&Path>) -> Result<OracleConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            Ok(OracleConfig::from_file(path)?)
        }
        None => Ok(OracleConfig::default()),
    }
}
