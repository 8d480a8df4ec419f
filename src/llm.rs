/// Remote clustering service client.
///
/// This module provides a blocking HTTP client for an Ollama-compatible
/// generate endpoint, its error type, and the `ClusteringService` trait the
/// theme extractor depends on.
mod client;

pub use client::{
    ClusteringService, DEFAULT_BASE_URL, DEFAULT_MODEL, LlmClient, LlmClientBuilder, LlmError,
};
