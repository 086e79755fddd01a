//! Decode raw miner-pool bodies into one round of responses
//!
//! Miner pools answer in several JSON shapes (and occasionally plain text).
//! The shape is resolved once here, so nothing downstream ever inspects raw
//! JSON.

use crate::error::OracleError;
use crate::sanitize::sanitize_answer;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use verity_domain::{MinerProvenance, MinerResponse};

const TEXT_KEYS: &[&str] = &["response", "answer", "text", "content", "output", "completion"];
const ADDRESS_KEYS: &[&str] = &["hotkey", "address", "miner", "uid"];
const ACK_KEYS: &[&str] = &["ack", "acknowledged"];
const HASH_KEYS: &[&str] = &["hash_verified", "verified"];

/// One miner's answer as found in the body
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedMiner {
    /// Answer text, before sanitization
    pub text: String,
    /// Reported miner address
    pub address: Option<String>,
    /// Reported acknowledgement
    pub acknowledged: Option<bool>,
    /// Reported hash verification
    pub hash_verified: Option<bool>,
    /// Reported trust weight
    pub weight: Option<f64>,
}

impl DecodedMiner {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn has_provenance(&self) -> bool {
        self.address.is_some() || self.acknowledged.is_some() || self.hash_verified.is_some()
    }
}

/// The shapes a miner-pool body can take
#[derive(Debug, Clone, PartialEq)]
pub enum RawMinerBatch {
    /// `{"choices": [{"message": {"content": ..}} | {"text": ..}]}`
    Choices(Vec<DecodedMiner>),
    /// `{"results": [{"response": .., "hotkey": .., "ack": ..}]}`
    Results(Vec<DecodedMiner>),
    /// `{"miners": [...]}`, same entries as `Results`
    Miners(Vec<DecodedMiner>),
    /// `{"responses": [string | object]}`
    Responses(Vec<DecodedMiner>),
    /// A bare JSON array of strings or objects
    PlainList(Vec<DecodedMiner>),
    /// Anything that is not JSON: a single answer
    PlainText(String),
}

impl RawMinerBatch {
    /// Resolve the shape of a body
    ///
    /// Non-JSON bodies are plain text. JSON that matches no known shape is a
    /// decode error.
    pub fn decode(body: &str) -> Result<Self, OracleError> {
        let unfenced = strip_code_fence(body);
        let value: Value = match serde_json::from_str(&unfenced) {
            Ok(value) => value,
            Err(_) => {
                debug!("Body is not JSON, treating as a single plain-text answer");
                return Ok(RawMinerBatch::PlainText(body.trim().to_string()));
            }
        };

        match value {
            Value::Array(items) => Ok(RawMinerBatch::PlainList(decode_entries(&items))),
            Value::String(text) => Ok(RawMinerBatch::PlainText(text)),
            Value::Object(map) => decode_object(&map),
            other => Err(OracleError::Decode(format!(
                "Unsupported miner body: {}",
                kind_of(&other)
            ))),
        }
    }

    /// Decoded entries in body order
    pub fn miners(&self) -> Vec<DecodedMiner> {
        match self {
            RawMinerBatch::Choices(m)
            | RawMinerBatch::Results(m)
            | RawMinerBatch::Miners(m)
            | RawMinerBatch::Responses(m)
            | RawMinerBatch::PlainList(m) => m.clone(),
            RawMinerBatch::PlainText(text) => vec![DecodedMiner::plain(text.clone())],
        }
    }

    /// Short name of the shape, for logs
    pub fn shape(&self) -> &'static str {
        match self {
            RawMinerBatch::Choices(_) => "choices",
            RawMinerBatch::Results(_) => "results",
            RawMinerBatch::Miners(_) => "miners",
            RawMinerBatch::Responses(_) => "responses",
            RawMinerBatch::PlainList(_) => "plain_list",
            RawMinerBatch::PlainText(_) => "plain_text",
        }
    }

    /// Sanitize and index the answers into a round
    ///
    /// Answers that are empty after sanitization are dropped. Provenance is
    /// `None` unless at least one entry reported a provenance field.
    pub fn into_round(self) -> (Vec<MinerResponse>, Option<Vec<MinerProvenance>>) {
        let shape = self.shape();
        let decoded = self.miners();
        let reported = decoded.iter().any(DecodedMiner::has_provenance);

        let mut responses = Vec::with_capacity(decoded.len());
        let mut provenance = Vec::with_capacity(decoded.len());

        for miner in decoded {
            let text = sanitize_answer(&miner.text);
            if text.is_empty() {
                continue;
            }
            let mut response = MinerResponse::new(responses.len(), text);
            if let Some(weight) = miner.weight {
                response = response.with_weight(weight);
            }
            responses.push(response);
            provenance.push(MinerProvenance {
                address: miner.address,
                acknowledged: miner.acknowledged.unwrap_or(false),
                hash_verified: miner.hash_verified.unwrap_or(false),
            });
        }

        debug!(shape, responses = responses.len(), reported, "Decoded miner batch");
        (responses, reported.then_some(provenance))
    }
}

fn decode_object(map: &Map<String, Value>) -> Result<RawMinerBatch, OracleError> {
    if let Some(items) = map.get("choices").and_then(Value::as_array) {
        return Ok(RawMinerBatch::Choices(decode_entries(items)));
    }
    if let Some(items) = map.get("results").and_then(Value::as_array) {
        return Ok(RawMinerBatch::Results(decode_entries(items)));
    }
    if let Some(items) = map.get("miners").and_then(Value::as_array) {
        return Ok(RawMinerBatch::Miners(decode_entries(items)));
    }
    if let Some(items) = map.get("responses").and_then(Value::as_array) {
        return Ok(RawMinerBatch::Responses(decode_entries(items)));
    }
    // A single miner object
    if let Some(miner) = decode_entry(&Value::Object(map.clone())) {
        return Ok(RawMinerBatch::PlainList(vec![miner]));
    }

    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    Err(OracleError::Decode(format!(
        "No miner answers found in object with keys [{}]",
        keys.join(", ")
    )))
}

fn decode_entries(items: &[Value]) -> Vec<DecodedMiner> {
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let decoded = decode_entry(item);
            if decoded.is_none() {
                warn!("Skipping miner entry {}: no answer text", idx);
            }
            decoded
        })
        .collect()
}

fn decode_entry(item: &Value) -> Option<DecodedMiner> {
    let obj = match item {
        Value::String(text) => return Some(DecodedMiner::plain(text.clone())),
        Value::Object(obj) => obj,
        _ => return None,
    };

    let text = entry_text(obj)?;
    Some(DecodedMiner {
        text,
        address: ADDRESS_KEYS.iter().find_map(|k| obj.get(*k)).and_then(scalar_string),
        acknowledged: ACK_KEYS.iter().find_map(|k| obj.get(*k)).and_then(Value::as_bool),
        hash_verified: HASH_KEYS.iter().find_map(|k| obj.get(*k)).and_then(Value::as_bool),
        weight: obj.get("weight").and_then(Value::as_f64),
    })
}

fn entry_text(obj: &Map<String, Value>) -> Option<String> {
    // Chat-completion style: {"message": {"content": ..}}
    if let Some(content) = obj
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
    {
        return Some(content.to_string());
    }
    TEXT_KEYS
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Remove a surrounding markdown code fence, if any
fn strip_code_fence(body: &str) -> String {
    let trimmed = body.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() < 2 {
        return String::new();
    }
    let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
        lines.len() - 1
    } else {
        lines.len()
    };
    lines[1..end].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_choices() {
        let body = r#"{"choices": [{"message": {"content": "Yes"}}, {"text": "No"}]}"#;
        let batch = RawMinerBatch::decode(body).unwrap();
        assert_eq!(batch.shape(), "choices");
        let (responses, provenance) = batch.into_round();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[1].raw_text, "No");
        assert!(provenance.is_none());
    }

    #[test]
    fn test_decode_results_with_provenance() {
        let body = r#"{"results": [
            {"response": "Paris", "hotkey": "5Gx", "ack": true, "hash_verified": true},
            {"answer": "Paris", "uid": 17}
        ]}"#;
        let (responses, provenance) = RawMinerBatch::decode(body).unwrap().into_round();
        let provenance = provenance.unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(provenance[0].address.as_deref(), Some("5Gx"));
        assert!(provenance[0].acknowledged && provenance[0].hash_verified);
        assert_eq!(provenance[1].address.as_deref(), Some("17"));
        assert!(!provenance[1].acknowledged);
    }

    #[test]
    fn test_decode_miners_and_responses() {
        let miners = RawMinerBatch::decode(r#"{"miners": [{"output": "a"}]}"#).unwrap();
        assert_eq!(miners.shape(), "miners");

        let responses = RawMinerBatch::decode(r#"{"responses": ["a", {"text": "b"}, 3]}"#).unwrap();
        assert_eq!(responses.shape(), "responses");
        assert_eq!(responses.miners().len(), 2);
    }

    #[test]
    fn test_decode_plain_list_and_fence() {
        let body = "```json\n[\"Yes\", \"Yes\"]\n```";
        let batch = RawMinerBatch::decode(body).unwrap();
        assert_eq!(batch.shape(), "plain_list");
        assert_eq!(batch.miners().len(), 2);
    }

    #[test]
    fn test_decode_plain_text() {
        let batch = RawMinerBatch::decode("The capital is Paris.").unwrap();
        assert_eq!(batch, RawMinerBatch::PlainText("The capital is Paris.".to_string()));
    }

    #[test]
    fn test_decode_unknown_object_fails() {
        assert!(matches!(
            RawMinerBatch::decode(r#"{"status": "ok"}"#),
            Err(OracleError::Decode(_))
        ));
        assert!(RawMinerBatch::decode("42").is_err());
    }

    #[test]
    fn test_into_round_sanitizes_and_drops_empty() {
        let body = r#"["<think>hmm</think>Yes", "<think>never finished", "  "]"#;
        let (responses, _) = RawMinerBatch::decode(body).unwrap().into_round();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].raw_text, "Yes");
        assert_eq!(responses[0].index, 0);
    }

    #[test]
    fn test_weight_is_carried() {
        let body = r#"[{"text": "a", "weight": 0.5}]"#;
        let (responses, _) = RawMinerBatch::decode(body).unwrap().into_round();
        assert_eq!(responses[0].weight, 0.5);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
    }
}
