pub mod embedding;
pub mod gemini;
pub mod local;

use crate::errors::WriteupError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use embedding::EmbeddingClient;
use std::fmt::Debug;

/// What one generation attempt produced, before any pipeline-level handling.
///
/// Providers report refusals and empty completions as data rather than as
/// errors, because the pipeline turns both into friendly sentinel messages
/// instead of failing the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The model produced usable text.
    Text(String),
    /// The model refused the prompt on safety grounds.
    SafetyBlocked,
    /// The call succeeded but no text came back.
    Empty,
}

/// A trait for interacting with an AI generation provider.
///
/// This trait defines a common interface for expanding a composed writeup
/// prompt using different Large Language Models (e.g., Gemini, local models).
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<GenerationOutcome, WriteupError>;
}

dyn_clone::clone_trait_object!(AiProvider);
