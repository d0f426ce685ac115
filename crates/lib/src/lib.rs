//! # Prompt to Writeup
//!
//! This crate turns a terse, step-by-step solution prompt into a full CTF
//! writeup using a configurable AI provider, optionally grounded in similar
//! past writeups fetched from a vector store. Placeholder `[[...]]` tags
//! survive generation untouched and are resolved into images and code blocks
//! afterwards, so binary content never passes through the model.

pub mod constants;
pub mod errors;
pub mod prompts;
pub mod providers;
pub mod resolve;
pub mod retrieval;
pub mod session;
pub mod types;
pub mod validate;

pub use errors::WriteupError;
pub use types::{GenerationRequest, RetrievalMatch, WriteupClient, WriteupClientBuilder};

use constants::{EMPTY_OUTPUT_MESSAGE, SAFETY_BLOCK_MESSAGE};
use providers::ai::GenerationOutcome;
use tracing::{debug, info, warn};

impl WriteupClient {
    /// Generates a writeup from a user's solution prompt.
    ///
    /// The pipeline runs validate, retrieve, compose, generate, in that
    /// order. Validation failures reject the request before any network
    /// call. Retrieval failures degrade to generating without examples. A
    /// safety refusal or an empty completion from the provider resolves to a
    /// fixed explanatory message rather than an error, so downstream
    /// resolution and packaging behave identically on every successful
    /// return.
    pub async fn generate_writeup(
        &self,
        prompt: &str,
        category: &str,
    ) -> Result<String, WriteupError> {
        self.rules.check(prompt)?;

        let examples =
            retrieval::find_reference_examples(self.retrieval.as_ref(), prompt, category).await;
        info!(
            examples = examples.len(),
            category, "Composing writeup prompt"
        );
        let final_prompt = prompts::compose_writeup_prompt(prompt, &examples);

        let provider = self
            .ai_provider
            .as_ref()
            .ok_or(WriteupError::MissingAiProvider)?;

        debug!(
            prompt_chars = final_prompt.chars().count(),
            "--> Sending composed prompt to the generation provider"
        );
        let text = match provider.generate(&final_prompt).await? {
            GenerationOutcome::Text(text) => text,
            GenerationOutcome::SafetyBlocked => {
                warn!("Generation was blocked by the provider's safety filters");
                return Ok(SAFETY_BLOCK_MESSAGE.to_string());
            }
            GenerationOutcome::Empty => {
                warn!("Generation provider returned no content");
                return Ok(EMPTY_OUTPUT_MESSAGE.to_string());
            }
        };

        let violations = resolve::preservation_violations(prompt, &text);
        if !violations.is_empty() {
            warn!(
                tags = ?violations,
                "Generated writeup does not preserve placeholder tag counts"
            );
        }

        Ok(text)
    }
}
