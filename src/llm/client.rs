/// Clustering service HTTP client.
///
/// This module provides `LlmClient` for making synchronous requests to an
/// Ollama-compatible `/api/generate` endpoint, along with its error type and
/// builder. Each call is a single attempt: failures are reported to the
/// caller, which decides what to do instead of retrying.
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Model used when neither the builder nor `OLLAMA_MODEL` names one.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Base URL used when neither the builder nor `OLLAMA_HOST` provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Errors that can occur when calling the clustering service.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The configured timeout elapsed before a response arrived
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The service answered but not in the expected shape
    #[error("Clustering API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid timeout configuration error
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Trait for the remote text-clustering service.
///
/// This trait enables mocking in unit tests: the theme extractor only ever
/// sees a prompt going in and response text coming out.
pub trait ClusteringService: Send + Sync {
    /// Sends a prompt and returns the raw response text.
    fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Builder for constructing `LlmClient` instances.
///
/// # Examples
///
/// ```
/// use sift::llm::LlmClientBuilder;
///
/// let client = LlmClientBuilder::new()
///     .base_url("http://localhost:11434")
///     .model("llama3.2")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.model(), "llama3.2");
/// ```
#[derive(Debug, Default)]
pub struct LlmClientBuilder {
    base_url: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl LlmClientBuilder {
    /// Creates a new `LlmClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the service (e.g., "http://localhost:11434").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model name sent with every request.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets an overall request timeout. Without one, requests wait indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `LlmClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// Values not set on the builder are read from the environment:
    /// - `OLLAMA_HOST`, defaulting to `http://localhost:11434`
    /// - `OLLAMA_MODEL`, defaulting to `llama3.2`
    /// - `OLLAMA_TIMEOUT_SECS`, defaulting to no timeout
    ///
    /// # Errors
    ///
    /// Returns `LlmError::InvalidUrl` for an unparsable base URL and
    /// `LlmError::InvalidTimeout` for a non-numeric `OLLAMA_TIMEOUT_SECS`.
    pub fn build(self) -> Result<LlmClient, LlmError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };

        let model = match self.model {
            Some(m) => m,
            None => std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        };

        let timeout = match self.timeout {
            Some(t) => Some(t),
            None => timeout_from_env()?,
        };

        reqwest::Url::parse(&base_url)
            .map_err(|e| LlmError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut builder =
            reqwest::blocking::Client::builder().connect_timeout(Duration::from_secs(5));
        // The blocking client applies a 30s default; None disables it.
        builder = builder.timeout(timeout);
        let client = builder.build().map_err(LlmError::Network)?;

        Ok(LlmClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
        })
    }
}

fn timeout_from_env() -> Result<Option<Duration>, LlmError> {
    match std::env::var("OLLAMA_TIMEOUT_SECS") {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|e| LlmError::InvalidTimeout(format!("{}: {}", value, e))),
        Err(_) => Ok(None),
    }
}

/// Synchronous client for an Ollama-compatible generate endpoint.
///
/// It should be constructed using `LlmClientBuilder`.
pub struct LlmClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    timeout: Option<Duration>,
}

impl LlmClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

impl ClusteringService for LlmClient {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = self.generate_url();
        let request_body = build_request_body(&self.model, prompt);

        debug!(url = %url, model = %self.model, "sending clustering request");
        let response = self.client.post(&url).json(&request_body).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        parse_response_body(&body)
    }
}

fn build_request_body(model: &str, prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "prompt": prompt,
        "stream": false
    })
}

/// Pulls the generated text out of a generate response body.
fn parse_response_body(body: &str) -> Result<String, LlmError> {
    let json: serde_json::Value = serde_json::from_str(body).map_err(LlmError::Serialization)?;

    json.get("response")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| LlmError::Api {
            message: "Missing 'response' field in API response".to_string(),
        })
}
