//! # Writeup Prompt Templates
//!
//! This module contains the prompt sent to the generation provider and the
//! composition logic that fills it in. The template is the single place where
//! the tag-preservation contract is spelled out to the model.

/// The master template for writeup generation.
///
/// Placeholders: `{examples}`, `{prompt}`
pub const WRITEUP_PROMPT_TEMPLATE: &str = r#"You are an expert cybersecurity analyst who writes CTF (Capture The Flag) writeups. Expand the user's step-by-step prompt into a comprehensive, well-structured markdown writeup.

# Rules
1. **Preserve Tags**: The user's prompt contains placeholder tags like [[img1]] or [[code1]]. Your writeup MUST contain every tag from the prompt, each exactly as many times as it appears there. Weave the steps into a flowing narrative, but never add, remove, or rewrite a `[[...]]` tag.
2. **Elaborate Concisely**: When the prompt names a technical term, a vulnerability (e.g., a CVE), or a tool that deserves context, add a one- or two-sentence explanation for the reader. No more than that.
3. **Mimic Style**: Match the tone, structure, and markdown conventions (headings, bolding, lists) of the reference examples below.

# Reference Examples
{examples}

# Task
Expand the following prompt into a full writeup, following the rules and the style of the examples.

# User Prompt
{prompt}

# Your Writeup
"#;

/// Joins retrieved reference examples inside the composed prompt.
pub const EXAMPLE_SEPARATOR: &str = "\n\n---\n\n";

/// Substituted for the examples block when retrieval produced nothing.
pub const NO_EXAMPLES_MARKER: &str = "No specific examples available.";

/// Builds the final generation prompt from the user's prompt and the ranked
/// reference examples.
///
/// With no examples the block is replaced by [`NO_EXAMPLES_MARKER`], so the
/// template shape stays identical whether or not retrieval contributed
/// anything.
pub fn compose_writeup_prompt(user_prompt: &str, examples: &[String]) -> String {
    let examples_block = if examples.is_empty() {
        NO_EXAMPLES_MARKER.to_string()
    } else {
        examples.join(EXAMPLE_SEPARATOR)
    };

    WRITEUP_PROMPT_TEMPLATE
        .replace("{examples}", &examples_block)
        .replace("{prompt}", user_prompt)
}
