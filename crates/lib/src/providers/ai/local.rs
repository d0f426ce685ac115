use crate::{
    errors::WriteupError,
    providers::ai::{AiProvider, GenerationOutcome},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The finish reason OpenAI-compatible APIs report for moderated output.
const FINISH_REASON_CONTENT_FILTER: &str = "content_filter";

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct LocalAiRequest<'a> {
    messages: Vec<LocalAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    temperature: f32,
    max_tokens: i32,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct LocalAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct LocalAiResponse {
    #[serde(default)]
    choices: Vec<LocalAiChoice>,
}

#[derive(Deserialize, Debug)]
struct LocalAiChoice {
    message: LocalAiMessage,
    finish_reason: Option<String>,
}

// --- Local Provider implementation ---

/// A provider for interacting with a local or OpenAI-compatible API.
#[derive(Clone, Debug)]
pub struct LocalAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl LocalAiProvider {
    /// Creates a new `LocalAiProvider` whose requests abort after `timeout`.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> Result<Self, WriteupError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(WriteupError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AiProvider for LocalAiProvider {
    /// Generates a writeup using a local or OpenAI-compatible API.
    ///
    /// The composed prompt already carries the analyst persona and the tag
    /// rules, so it goes out as a single user message.
    async fn generate(&self, prompt: &str) -> Result<GenerationOutcome, WriteupError> {
        let messages = vec![LocalAiMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];

        let request_body = LocalAiRequest {
            messages,
            model: self.model.as_deref(),
            temperature: 0.7,
            max_tokens: 4096,
            stream: false,
        };

        let mut request_builder = self.client.post(&self.api_url);

        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(WriteupError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WriteupError::AiApi(error_text));
        }

        let local_ai_response: LocalAiResponse = response
            .json()
            .await
            .map_err(WriteupError::AiDeserialization)?;

        let Some(choice) = local_ai_response.choices.into_iter().next() else {
            return Ok(GenerationOutcome::Empty);
        };

        if choice.finish_reason.as_deref() == Some(FINISH_REASON_CONTENT_FILTER) {
            return Ok(GenerationOutcome::SafetyBlocked);
        }

        if choice.message.content.trim().is_empty() {
            Ok(GenerationOutcome::Empty)
        } else {
            Ok(GenerationOutcome::Text(choice.message.content))
        }
    }
}
