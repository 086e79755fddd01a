//! Mock miner dispatcher for deterministic testing

use crate::error::OracleError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use verity_domain::traits::{MinerDispatcher, SessionParams};

/// Body value that makes the mock fail instead of answering
const ERROR_SENTINEL: &str = "ERROR";

/// Mock dispatcher returning pre-configured bodies without network calls
///
/// Per-prompt bodies are matched by substring, first match wins, so tests can
/// key on the query text rather than the whole prompt.
///
/// # Examples
///
/// ```
/// use verity_oracle::MockDispatcher;
/// use verity_domain::traits::{MinerDispatcher, SessionParams};
///
/// let mut dispatcher = MockDispatcher::new(r#"["Yes", "Yes"]"#);
/// dispatcher.add_body("capital of France", r#"["Paris"]"#);
///
/// let params = SessionParams::default();
/// assert_eq!(dispatcher.dispatch("What is the capital of France?", &params).unwrap(), r#"["Paris"]"#);
/// assert_eq!(dispatcher.dispatch("anything else", &params).unwrap(), r#"["Yes", "Yes"]"#);
/// assert_eq!(dispatcher.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockDispatcher {
    default_body: String,
    bodies: Arc<Mutex<Vec<(String, String)>>>,
    delay: Option<Duration>,
    call_count: Arc<Mutex<usize>>,
}

impl MockDispatcher {
    /// Create a mock returning `body` for every prompt
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            default_body: body.into(),
            bodies: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Build a plain-list body from answer texts
    pub fn from_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let answers: Vec<String> = answers.into_iter().map(Into::into).collect();
        Self::new(serde_json::Value::from(answers).to_string())
    }

    /// A mock that fails every dispatch
    pub fn failing() -> Self {
        Self::new(ERROR_SENTINEL)
    }

    /// Return `body` for prompts containing `pattern`
    pub fn add_body(&mut self, pattern: impl Into<String>, body: impl Into<String>) {
        self.bodies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((pattern.into(), body.into()));
    }

    /// Fail for prompts containing `pattern`
    pub fn add_error(&mut self, pattern: impl Into<String>) {
        self.add_body(pattern, ERROR_SENTINEL);
    }

    /// Sleep before answering, to exercise timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times dispatch was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner()) = 0;
    }
}

impl Default for MockDispatcher {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl MinerDispatcher for MockDispatcher {
    type Error = OracleError;

    fn dispatch(&self, prompt: &str, _params: &SessionParams) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner()) += 1;

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let body = self
            .bodies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map(|(_, body)| body.clone())
            .unwrap_or_else(|| self.default_body.clone());

        if body == ERROR_SENTINEL {
            return Err(OracleError::Dispatch("Mock dispatch error".to_string()));
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_body() {
        let dispatcher = MockDispatcher::new("Paris");
        let body = dispatcher.dispatch("q", &SessionParams::default()).unwrap();
        assert_eq!(body, "Paris");
    }

    #[test]
    fn test_from_answers_is_plain_list() {
        let dispatcher = MockDispatcher::from_answers(["Yes", "No \"really\""]);
        let body = dispatcher.dispatch("q", &SessionParams::default()).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, vec!["Yes", "No \"really\""]);
    }

    #[test]
    fn test_error_injection() {
        let mut dispatcher = MockDispatcher::new("ok");
        dispatcher.add_error("explode");
        let params = SessionParams::default();
        assert!(matches!(
            dispatcher.dispatch("please explode", &params),
            Err(OracleError::Dispatch(_))
        ));
        assert!(dispatcher.dispatch("fine", &params).is_ok());
        assert!(MockDispatcher::failing().dispatch("x", &params).is_err());
    }

    #[test]
    fn test_call_count_shared_between_clones() {
        let dispatcher = MockDispatcher::default();
        let clone = dispatcher.clone();
        let params = SessionParams::default();

        dispatcher.dispatch("a", &params).unwrap();
        clone.dispatch("b", &params).unwrap();
        assert_eq!(dispatcher.call_count(), 2);

        dispatcher.reset_call_count();
        assert_eq!(clone.call_count(), 0);
    }
}
