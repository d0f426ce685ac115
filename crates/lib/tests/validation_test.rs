//! # Prompt Validation Tests
//!
//! This test suite validates the gatekeeper rules in `ctfrag::validate`.
//! These checks run before any network call, so every rejection here is a
//! generation request (and an API bill) that never happened.

use ctfrag::validate::{ValidationError, ValidationRules};

/// Verifies that empty and all-whitespace prompts are rejected.
#[test]
fn test_rejects_empty_and_whitespace_prompts() {
    let rules = ValidationRules::default();

    assert!(matches!(rules.check(""), Err(ValidationError::Empty)));
    assert!(matches!(rules.check("   \t\n"), Err(ValidationError::Empty)));
}

/// Verifies that throwaway inputs are rejected case-insensitively, even when
/// they are also shorter than the length minimum.
#[test]
fn test_rejects_meaningless_inputs_case_insensitively() {
    let rules = ValidationRules::default();

    for prompt in ["test", "Test", "TESTING", "hi", "Hello", "sample"] {
        assert!(
            matches!(rules.check(prompt), Err(ValidationError::Meaningless(_))),
            "expected '{prompt}' to be rejected as meaningless"
        );
    }
}

/// Verifies that short non-placeholder prompts fail the length check.
#[test]
fn test_rejects_short_prompts() {
    let rules = ValidationRules::default();

    assert!(matches!(
        rules.check("solved it quickly"),
        Err(ValidationError::TooShort { min: 20 })
    ));
}

/// Verifies that a long prompt with no CTF vocabulary and no tags is
/// rejected as off-topic.
#[test]
fn test_rejects_off_topic_prompts() {
    let rules = ValidationRules::default();

    assert!(matches!(
        rules.check("my grandmother bakes wonderful apple pies every sunday morning"),
        Err(ValidationError::OffTopic)
    ));
}

/// Verifies that a prompt mentioning CTF vocabulary passes.
#[test]
fn test_accepts_prompt_with_topic_keyword() {
    let rules = ValidationRules::default();

    assert!(rules.check("Used sqlmap to exploit the login form").is_ok());
    // Keyword matching is case-insensitive too.
    assert!(rules.check("DECODED the hidden message from the image").is_ok());
}

/// Verifies that placeholder tags waive the length and keyword heuristics:
/// a templated prompt is deliberate input even when it is ten characters
/// long and names no tool.
#[test]
fn test_accepts_short_prompt_with_tags() {
    let rules = ValidationRules::default();
    let prompt = "[[img1]] a";
    assert_eq!(prompt.chars().count(), 10);

    assert!(rules.check(prompt).is_ok());
}

/// Verifies that an unmatched `[[` alone does not waive the heuristics.
#[test]
fn test_unpaired_bracket_is_no_waiver() {
    let rules = ValidationRules::default();

    assert!(matches!(
        rules.check("[[img1 oops"),
        Err(ValidationError::TooShort { .. })
    ));
}

/// Verifies that the word lists are swappable configuration, not baked-in
/// behavior.
#[test]
fn test_custom_rules_replace_the_defaults() {
    let rules = ValidationRules::new(5, vec!["lorem".to_string()], vec!["quiche".to_string()]);

    // The stock meaningless word is no longer special.
    assert!(rules.check("a note about a quiche recipe").is_ok());
    assert!(matches!(
        rules.check("Lorem"),
        Err(ValidationError::Meaningless(_))
    ));
    // The custom keyword is required now.
    assert!(matches!(
        rules.check("a long prompt with no matching vocabulary at all"),
        Err(ValidationError::OffTopic)
    ));
}
