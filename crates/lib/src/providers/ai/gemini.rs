use crate::{
    errors::WriteupError,
    providers::ai::{AiProvider, GenerationOutcome},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The finish reason Gemini reports when a candidate was blocked by its
/// safety filters.
const FINISH_REASON_SAFETY: &str = "SAFETY";

// --- Gemini-specific request and response structures ---

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// A blocked candidate carries a `finishReason` but no `content`, so both
/// fields are optional here.
#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<ContentResponse>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    text: String,
}

// --- Gemini Provider implementation ---

/// A provider for interacting with the Google Gemini API.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` whose requests abort after `timeout`.
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> Result<Self, WriteupError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(WriteupError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    /// Generates a writeup using the Gemini API.
    async fn generate(&self, prompt: &str) -> Result<GenerationOutcome, WriteupError> {
        let request_body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(WriteupError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WriteupError::AiApi(error_text));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(WriteupError::AiDeserialization)?;

        let Some(candidate) = gemini_response.candidates.into_iter().next() else {
            return Ok(GenerationOutcome::Empty);
        };

        if candidate.finish_reason.as_deref() == Some(FINISH_REASON_SAFETY) {
            return Ok(GenerationOutcome::SafetyBlocked);
        }

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            Ok(GenerationOutcome::Empty)
        } else {
            Ok(GenerationOutcome::Text(text))
        }
    }
}
