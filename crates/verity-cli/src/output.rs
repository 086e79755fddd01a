//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use verity_domain::{ConsensusResult, Verdict};
use verity_oracle::{OracleConfig, RoundMetadata};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a consensus result, with round metadata when the round was live.
    pub fn format_result(&self, result: &ConsensusResult, metadata: Option<&RoundMetadata>) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_result_json(result, metadata),
            OutputFormat::Table => Ok(self.format_result_table(result, metadata)),
        }
    }

    /// Format the active configuration.
    pub fn format_config(&self, config: &OracleConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            OutputFormat::Table => Ok(toml::to_string_pretty(config)?),
        }
    }

    fn format_result_json(&self, result: &ConsensusResult, metadata: Option<&RoundMetadata>) -> Result<String> {
        let mut value = serde_json::json!({
            "summary": result.summary,
            "result": result,
        });
        if let Some(metadata) = metadata {
            value["metadata"] = serde_json::to_value(metadata)?;
        }
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_result_table(&self, result: &ConsensusResult, metadata: Option<&RoundMetadata>) -> String {
        let mut sections = Vec::new();

        if result.degraded {
            sections.push(self.warning("Miner network unavailable; answer built from sources only"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["Answer".to_string(), result.answer_text.clone()]);
        builder.push_record(["Verdict".to_string(), self.verdict(result.verdict)]);
        builder.push_record(["Label".to_string(), result.label.to_string()]);
        builder.push_record(["Confidence".to_string(), format!("{}%", result.summary.confidence_percent)]);
        builder.push_record([
            "Miners".to_string(),
            format!("{} agree / {} disagree", result.agreements, result.disagreements),
        ]);
        builder.push_record(["Method".to_string(), result.summary.methodology.clone()]);
        if let Some(metadata) = metadata {
            builder.push_record(["Time".to_string(), format!("{} ms", metadata.processing_time_ms)]);
        }
        sections.push(styled(builder));

        if !result.miners.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["#", "Miner", "Weight", "Similarity", "Majority"]);
            for miner in &result.miners {
                builder.push_record([
                    miner.index.to_string(),
                    miner.address.clone(),
                    format!("{:.2}", miner.weight),
                    format!("{:.2}", miner.similarity_to_answer),
                    if miner.in_majority { "yes" } else { "no" }.to_string(),
                ]);
            }
            sections.push(styled(builder));
        }

        if result.sources.is_empty() {
            sections.push(self.colorize("No corroborating sources.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Source", "Domain", "Tier", "URL"]);
            for source in &result.sources {
                builder.push_record([
                    source.title.clone(),
                    source.domain.clone(),
                    source.reliability.as_str().to_string(),
                    source.url.clone(),
                ]);
            }
            sections.push(styled(builder));
        }

        sections.join("\n")
    }

    fn verdict(&self, verdict: Verdict) -> String {
        let color = match verdict {
            Verdict::True => "green",
            Verdict::False => "red",
            Verdict::Uncertain => "yellow",
        };
        self.colorize(verdict.as_str(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_consensus::{run_consensus, ConsensusConfig, ConsensusContext};
    use verity_domain::MinerResponse;

    fn create_test_result() -> ConsensusResult {
        let responses = MinerResponse::from_texts(["Paris", "Paris", "Lyon"]);
        run_consensus(
            "What is the capital of France?",
            &responses,
            None,
            &ConsensusContext::default(),
            &ConsensusConfig::default(),
        )
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_result(&create_test_result(), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["result"]["answer_text"], "Paris");
        assert_eq!(value["summary"]["miner_consensus"]["responded"], 3);
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_result(&create_test_result(), None).unwrap();
        assert!(output.contains("Answer"));
        assert!(output.contains("Paris"));
        assert!(output.contains("miner-0002"));
        assert!(output.contains("No corroborating sources"));
    }

    #[test]
    fn test_config_formats() {
        let config = OracleConfig::default();
        let toml_out = Formatter::new(OutputFormat::Table, false).format_config(&config).unwrap();
        assert!(toml_out.contains("dispatch_timeout_secs = 30"));
        let json_out = Formatter::new(OutputFormat::Json, false).format_config(&config).unwrap();
        assert!(json_out.contains("\"dispatch_timeout_secs\": 30"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.verdict(Verdict::True), "True");
    }
}
