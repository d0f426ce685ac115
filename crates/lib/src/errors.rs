use crate::validate::ValidationError;
use thiserror::Error;

/// Custom error types for the writeup pipeline.
#[derive(Error, Debug)]
pub enum WriteupError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the generation API: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize the generation API response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("Generation API returned an error: {0}")]
    AiApi(String),
    #[error("Failed to send request to the vector store: {0}")]
    VectorRequest(reqwest::Error),
    #[error("Failed to deserialize the vector store response: {0}")]
    VectorDeserialization(reqwest::Error),
    #[error("Vector store returned an error: {0}")]
    VectorApi(String),
    #[error("No generation provider is configured")]
    MissingAiProvider,
    #[error(transparent)]
    InvalidPrompt(#[from] ValidationError),
}
