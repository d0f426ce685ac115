//! # Embeddings Provider
//!
//! This module provides functionality for generating vector embeddings by
//! calling an external, OpenAI-compatible embeddings API. The embedding is the
//! first hop of the retrieval pipeline, so its failures are reported as plain
//! errors and the caller decides how gracefully to degrade.

use crate::errors::WriteupError;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize, Debug)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// A client for an OpenAI-compatible embeddings endpoint.
#[derive(Clone, Debug)]
pub struct EmbeddingClient {
    client: ReqwestClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl EmbeddingClient {
    /// Creates a new `EmbeddingClient` whose requests abort after `timeout`.
    pub fn new(
        api_url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, WriteupError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(WriteupError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            model,
            api_key,
        })
    }

    /// Generates a vector embedding for the given text input.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, WriteupError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input,
        };
        debug!(model = %self.model, "--> Sending request to the embeddings API");

        let mut request_builder = self.client.post(&self.api_url).json(&request_body);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .send()
            .await
            .map_err(WriteupError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WriteupError::AiApi(error_text));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(WriteupError::AiDeserialization)?;

        embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| WriteupError::AiApi("Embeddings API returned no embeddings".to_string()))
    }
}
