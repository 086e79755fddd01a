//! HTTP miner dispatcher
//!
//! Posts the prompt to a miner-pool gateway and returns the raw body. The
//! dispatcher is synchronous: the [`Oracle`](crate::Oracle) calls it from
//! `spawn_blocking`, so it uses reqwest's blocking client.
//!
//! # Features
//!
//! - JSON POST of the prompt plus session parameters
//! - Retry logic with exponential backoff
//! - Per-request timeout
//!
//! # Examples
//!
//! ```no_run
//! use verity_oracle::HttpDispatcher;
//! use verity_domain::traits::{MinerDispatcher, SessionParams};
//!
//! let dispatcher = HttpDispatcher::new("http://localhost:8091/v1/query").with_max_retries(2);
//! let body = dispatcher.dispatch("Is the sky blue?", &SessionParams::default());
//! ```

use crate::error::OracleError;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use verity_domain::traits::{MinerDispatcher, SessionParams};

/// Default timeout for one request (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Dispatcher for a miner-pool HTTP gateway
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    endpoint: String,
    timeout: Duration,
    max_retries: u32,
    api_key: Option<String>,
}

/// Request body for the gateway
#[derive(Serialize)]
struct DispatchRequest<'a> {
    prompt: &'a str,
    sample_size: usize,
    temperature: f64,
    max_tokens: u32,
}

impl HttpDispatcher {
    /// Create a new dispatcher for `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            api_key: None,
        }
    }

    /// Set the maximum number of attempts (at least one is always made)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send a bearer token with each request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Gateway endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post(&self, prompt: &str, params: &SessionParams) -> Result<String, OracleError> {
        // Built per call: the blocking client must not be created or dropped
        // on an async worker thread.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| OracleError::Dispatch(format!("Failed to build HTTP client: {}", e)))?;

        let request_body = DispatchRequest {
            prompt,
            sample_size: params.sample_size,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            let mut request = client.post(&self.endpoint).json(&request_body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            match request.send() {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response
                            .text()
                            .map_err(|e| OracleError::Decode(format!("Failed to read body: {}", e)))?;
                        debug!("Miner pool answered with {} bytes", body.len());
                        return Ok(body);
                    }

                    let error_text = response
                        .text()
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    let error = OracleError::Dispatch(format!("HTTP {}: {}", status, error_text));

                    // Client errors will not improve on retry, rate limits might
                    if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(OracleError::Timeout(self.timeout.as_secs()));
                }
                Err(e) => {
                    last_error = Some(OracleError::Dispatch(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Dispatch attempt {} failed, retrying in {:?}", attempts, delay);
                std::thread::sleep(delay);
            }
        }

        Err(last_error.unwrap_or_else(|| OracleError::Dispatch("Max retries exceeded".to_string())))
    }
}

impl MinerDispatcher for HttpDispatcher {
    type Error = OracleError;

    fn dispatch(&self, prompt: &str, params: &SessionParams) -> Result<String, Self::Error> {
        self.post(prompt, params)
    }
}
