//! Verity Oracle
//!
//! Turns a query into one consensus answer by asking an untrusted miner pool.
//!
//! # Overview
//!
//! The Oracle is the ingestion boundary of Verity. It builds the miner
//! prompt, dispatches it, decodes whatever body shape the pool returns,
//! strips model reasoning from every answer, fetches corroborating sources,
//! and hands the round to `verity-consensus`.
//!
//! # Architecture
//!
//! ```text
//! Query → Prompt → MinerDispatcher → RawMinerBatch → sanitize → ConsensusEngine → OracleAnswer
//!                  SourceProvider  → fact checks + corroboration ↗
//! ```
//!
//! # Key Features
//!
//! - **Single decoder**: every body shape resolves once into [`RawMinerBatch`]
//! - **Degraded path**: dispatch failure, timeout, or an undecodable body still
//!   yields a low-confidence answer built from sources
//! - **Best-effort sources**: provider errors and timeouts become empty lists
//!
//! # Example Usage
//!
//! ```
//! use verity_oracle::{MockDispatcher, Oracle, OracleConfig};
//! use verity_sources::StaticSourceProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = MockDispatcher::from_answers(["Yes, it reopened.", "Yes, it reopened.", "No."]);
//! let oracle = Oracle::new(dispatcher, StaticSourceProvider::default(), OracleConfig::default())?;
//!
//! let answer = oracle.answer("Did the bridge reopen?").await?;
//! println!("{} ({:.0}%)", answer.result.answer_text, answer.result.confidence * 100.0);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;

pub mod batch;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod http;
pub mod oracle;
pub mod prompt;
pub mod sanitize;
pub mod types;

pub use batch::{DecodedMiner, RawMinerBatch};
pub use config::OracleConfig;
pub use dispatcher::MockDispatcher;
pub use engine::ConsensusEngine;
pub use error::OracleError;
pub use http::HttpDispatcher;
pub use oracle::Oracle;
pub use prompt::PromptBuilder;
pub use sanitize::sanitize_answer;
pub use types::{OracleAnswer, RoundMetadata};
