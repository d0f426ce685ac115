//! # Writeup Generation Flow Tests
//!
//! This test suite validates `WriteupClient::generate_writeup` end to end
//! against mock providers: the validate-first ordering, the sentinel messages
//! for refused and empty completions, and the warn-only handling of tag
//! drift.

mod common;

use common::{setup_tracing, FailingAiProvider, MockAiProvider};
use ctfrag::constants::{EMPTY_OUTPUT_MESSAGE, SAFETY_BLOCK_MESSAGE};
use ctfrag::prompts::NO_EXAMPLES_MARKER;
use ctfrag::providers::ai::GenerationOutcome;
use ctfrag::{WriteupClientBuilder, WriteupError};

const VALID_PROMPT: &str = "Exploited the admin login with sqlmap [[img1]] then dumped the flag [[code1]]";

/// Verifies that an invalid prompt is rejected before the provider is ever
/// called.
#[tokio::test]
async fn test_validation_rejects_before_any_provider_call() {
    setup_tracing();
    let provider = MockAiProvider::new(vec![]);
    let history = provider.call_history.clone();
    let client = WriteupClientBuilder::new()
        .ai_provider(Box::new(provider))
        .build();

    let result = client.generate_writeup("hi", "Web Exploitation").await;

    assert!(matches!(result, Err(WriteupError::InvalidPrompt(_))));
    assert!(
        history.read().unwrap().is_empty(),
        "provider must not be called for an invalid prompt"
    );
}

/// Verifies that a valid prompt without a configured provider is a hard
/// configuration error, not a silent success.
#[tokio::test]
async fn test_missing_provider_is_an_error() {
    setup_tracing();
    let client = WriteupClientBuilder::new().build();

    let result = client.generate_writeup(VALID_PROMPT, "Web Exploitation").await;
    assert!(matches!(result, Err(WriteupError::MissingAiProvider)));
}

/// Verifies the happy path, and that the provider received the composed
/// prompt rather than the raw user prompt.
#[tokio::test]
async fn test_generates_with_composed_prompt() {
    setup_tracing();
    let provider = MockAiProvider::new(vec![GenerationOutcome::Text(
        "## Writeup\n[[img1]] steps [[code1]]".to_string(),
    )]);
    let history = provider.call_history.clone();
    let client = WriteupClientBuilder::new()
        .ai_provider(Box::new(provider))
        .build();

    let text = client
        .generate_writeup(VALID_PROMPT, "Web Exploitation")
        .await
        .expect("generation should succeed");

    assert_eq!(text, "## Writeup\n[[img1]] steps [[code1]]");

    let calls = history.read().unwrap();
    assert_eq!(calls.len(), 1);
    let sent = &calls[0];
    assert!(sent.contains(VALID_PROMPT), "composed prompt embeds the user prompt");
    assert!(sent.contains("Preserve Tags"), "composed prompt carries the rules");
    // No retrieval backend is configured, so the examples block holds the marker.
    assert!(sent.contains(NO_EXAMPLES_MARKER));
}

/// Verifies that a safety refusal becomes a successful response carrying the
/// fixed explanation, so the caller still gets a session and a document.
#[tokio::test]
async fn test_safety_block_resolves_to_sentinel_message() {
    setup_tracing();
    let provider = MockAiProvider::new(vec![GenerationOutcome::SafetyBlocked]);
    let client = WriteupClientBuilder::new()
        .ai_provider(Box::new(provider))
        .build();

    let text = client
        .generate_writeup(VALID_PROMPT, "Web Exploitation")
        .await
        .expect("a safety block is not an error");

    assert_eq!(text, SAFETY_BLOCK_MESSAGE);
}

/// Verifies that an empty completion becomes the "no content" message.
#[tokio::test]
async fn test_empty_completion_resolves_to_sentinel_message() {
    setup_tracing();
    let provider = MockAiProvider::new(vec![GenerationOutcome::Empty]);
    let client = WriteupClientBuilder::new()
        .ai_provider(Box::new(provider))
        .build();

    let text = client
        .generate_writeup(VALID_PROMPT, "Web Exploitation")
        .await
        .expect("an empty completion is not an error");

    assert_eq!(text, EMPTY_OUTPUT_MESSAGE);
}

/// Verifies that a provider transport failure propagates as an error.
#[tokio::test]
async fn test_provider_failure_propagates() {
    setup_tracing();
    let client = WriteupClientBuilder::new()
        .ai_provider(Box::new(FailingAiProvider))
        .build();

    let result = client.generate_writeup(VALID_PROMPT, "Web Exploitation").await;
    assert!(matches!(result, Err(WriteupError::AiApi(_))));
}

/// Verifies that tag drift in the model output is returned as-is: the
/// contract violation is logged, never patched up or failed.
#[tokio::test]
async fn test_tag_drift_is_returned_unchanged() {
    setup_tracing();
    let degraded = "A writeup that lost the image tag but kept [[code1]]";
    let provider = MockAiProvider::new(vec![GenerationOutcome::Text(degraded.to_string())]);
    let client = WriteupClientBuilder::new()
        .ai_provider(Box::new(provider))
        .build();

    let text = client
        .generate_writeup(VALID_PROMPT, "Web Exploitation")
        .await
        .expect("tag drift must not fail the request");

    assert_eq!(text, degraded);
}
