//! Command implementations.

pub mod ask;
pub mod config;
pub mod consensus;

pub use self::ask::execute_ask;
pub use self::config::execute_config;
pub use self::consensus::execute_consensus;

use crate::error::{CliError, Result};
use std::path::Path;
use verity_domain::SourceItem;

/// Read a JSON array of sources from `path`.
pub fn read_sources(path: &Path) -> Result<Vec<SourceItem>> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| {
        CliError::InvalidInput(format!("{}: expected a JSON array of sources: {}", path.display(), e))
    })
}
