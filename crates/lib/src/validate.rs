//! # Prompt Validation
//!
//! This module guards the generation pipeline. Every incoming prompt is checked
//! here before any embedding, retrieval, or generation call is made, so junk
//! input is rejected without spending a single network round-trip.

use thiserror::Error;

/// The minimum number of characters a trimmed prompt must have.
pub const DEFAULT_MIN_PROMPT_CHARS: usize = 20;

/// Throwaway inputs that are rejected outright when they make up the whole
/// prompt, compared case-insensitively.
pub const DEFAULT_MEANINGLESS_INPUTS: &[&str] =
    &["test", "hi", "hello", "hey", "testing", "example", "sample"];

/// Keywords that mark a prompt as plausibly describing a CTF solution.
pub const DEFAULT_TOPIC_KEYWORDS: &[&str] = &[
    "challenge",
    "flag",
    "ctf",
    "exploit",
    "vulnerability",
    "pwn",
    "reverse",
    "web",
    "crypto",
    "forensic",
    "binary",
    "payload",
    "script",
    "command",
    "server",
    "file",
    "code",
    "analyze",
    "decode",
    "bypass",
    "leak",
    "scan",
];

/// The reasons a prompt can be rejected before generation.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Prompt is empty. Describe the steps of your solution first.")]
    Empty,
    #[error("Prompt '{0}' looks like placeholder input, not a solution outline.")]
    Meaningless(String),
    #[error("Prompt is too short to expand into a writeup. Provide at least {min} characters describing your steps.")]
    TooShort { min: usize },
    #[error("Prompt does not appear to describe a CTF solution. Mention the challenge, the tools, or the commands involved, or include [[...]] content tags.")]
    OffTopic,
}

/// The tunable part of prompt validation.
///
/// The word lists are plain data so deployments can swap them from
/// configuration without a rebuild. Entries are matched case-insensitively
/// and are stored lowercased.
#[derive(Clone, Debug)]
pub struct ValidationRules {
    pub min_prompt_chars: usize,
    pub meaningless_inputs: Vec<String>,
    pub topic_keywords: Vec<String>,
}

impl ValidationRules {
    /// Creates a rule set, lowercasing both word lists.
    pub fn new(
        min_prompt_chars: usize,
        meaningless_inputs: Vec<String>,
        topic_keywords: Vec<String>,
    ) -> Self {
        Self {
            min_prompt_chars,
            meaningless_inputs: meaningless_inputs
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
            topic_keywords: topic_keywords
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    /// Checks a prompt against the rules.
    ///
    /// The checks run cheapest-first: emptiness, the meaningless list, then
    /// the length and topic heuristics. A prompt that carries both `[[` and
    /// `]]` is templated input from the editor, which is a stronger signal of
    /// intent than any wording heuristic, so it skips the length and keyword
    /// checks entirely.
    pub fn check(&self, prompt: &str) -> Result<(), ValidationError> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }

        let lowered = trimmed.to_lowercase();
        if self.meaningless_inputs.iter().any(|w| *w == lowered) {
            return Err(ValidationError::Meaningless(trimmed.to_string()));
        }

        if trimmed.contains("[[") && trimmed.contains("]]") {
            return Ok(());
        }

        if trimmed.chars().count() < self.min_prompt_chars {
            return Err(ValidationError::TooShort {
                min: self.min_prompt_chars,
            });
        }

        if !self.topic_keywords.iter().any(|k| lowered.contains(k)) {
            return Err(ValidationError::OffTopic);
        }

        Ok(())
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_PROMPT_CHARS,
            DEFAULT_MEANINGLESS_INPUTS
                .iter()
                .map(|w| w.to_string())
                .collect(),
            DEFAULT_TOPIC_KEYWORDS.iter().map(|w| w.to_string()).collect(),
        )
    }
}
