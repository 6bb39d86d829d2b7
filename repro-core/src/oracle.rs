//! Text-completion oracle interface.
//!
//! The oracle is consulted twice in the pipeline: once for
//! static-issue repair and once for post-failure debugging. It is a
//! narrow seam — one prompt in, one completion out — expressed as a
//! trait so the orchestrator can be tested with deterministic fakes.
//!
//! Supports any endpoint following the OpenAI chat completions format
//! (OpenAI, Azure OpenAI, Ollama, vLLM, and compatible servers).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::OracleConfig;
use crate::error::OracleError;

/// A text-completion oracle: one prompt in, one completion out.
#[async_trait]
pub trait CompletionOracle: Send + Sync {
    /// Submit a prompt and return the completion text.
    ///
    /// Callers treat any error as an empty completion; the pipeline
    /// never aborts on oracle failure.
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}

/// HTTP oracle speaking the OpenAI-compatible chat completions API.
pub struct HttpOracle {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    timeout_secs: u64,
}

impl HttpOracle {
    /// Create an oracle from configuration.
    ///
    /// Reads the API key from the environment variable named in
    /// `config.api_key_env`. Local endpoints may leave it unset.
    pub fn new(config: &OracleConfig) -> Result<Self, OracleError> {
        let is_local =
            config.base_url.contains("localhost") || config.base_url.contains("127.0.0.1");
        let api_key = match std::env::var(&config.api_key_env) {
            Ok(key) => key,
            Err(_) if is_local => String::new(),
            Err(_) => {
                return Err(OracleError::MissingApiKey {
                    var: config.api_key_env.clone(),
                });
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OracleError::ApiRequest {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl CompletionOracle for HttpOracle {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
        });

        debug!(url = %url, model = %self.model, "sending oracle request");

        let mut request = self.client.post(&url).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                OracleError::ApiRequest {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OracleError::ApiRequest {
                message: format!("HTTP {status}: {text}"),
            });
        }

        let value: Value = response.json().await.map_err(|e| OracleError::ResponseParse {
            message: e.to_string(),
        })?;

        Ok(extract_completion(&value))
    }
}

/// Pull the completion text out of a chat-completions response body.
///
/// Any shape other than `choices[0].message.content` being a string is
/// treated as an empty completion rather than an error.
pub(crate) fn extract_completion(value: &Value) -> String {
    match value["choices"][0]["message"]["content"].as_str() {
        Some(text) => text.to_string(),
        None => {
            warn!("oracle response missing choices[0].message.content; treating as empty");
            String::new()
        }
    }
}

/// Deterministic oracle for tests: returns queued responses in order,
/// then empty completions.
#[derive(Default)]
pub struct MockOracle {
    responses: std::sync::Mutex<std::collections::VecDeque<String>>,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// An oracle that returns the given replies, in order.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let oracle = Self::new();
        for r in responses {
            oracle.queue_response(r.into());
        }
        oracle
    }

    pub fn queue_response(&self, response: impl Into<String>) {
        self.responses.lock().unwrap().push_back(response.into());
    }

    /// Prompts received so far, for assertions.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionOracle for MockOracle {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// An oracle whose every call fails, for degradation tests.
pub struct FailingOracle;

#[async_trait]
impl CompletionOracle for FailingOracle {
    async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
        Err(OracleError::ApiRequest {
            message: "simulated outage".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_completion_happy_path() {
        let value = json!({
            "choices": [{"message": {"role": "assistant", "content": "fixed"}}]
        });
        assert_eq!(extract_completion(&value), "fixed");
    }

    #[test]
    fn test_extract_completion_malformed_shapes() {
        for raw in [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{"message": {}}]}),
            json!({"choices": [{"message": {"content": 42}}]}),
            json!({"error": "rate limited"}),
        ] {
            assert_eq!(extract_completion(&raw), "");
        }
    }

    #[tokio::test]
    async fn test_mock_oracle_queue_order() {
        let oracle = MockOracle::with_responses(["first", "second"]);
        assert_eq!(oracle.complete("a").await.unwrap(), "first");
        assert_eq!(oracle.complete("b").await.unwrap(), "second");
        assert_eq!(oracle.complete("c").await.unwrap(), "");
        assert_eq!(oracle.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failing_oracle() {
        assert!(FailingOracle.complete("x").await.is_err());
    }
}
