//! # Shared Constants
//!
//! This module provides a centralized location for constants that are shared across
//! multiple crates in the `ctfrag` workspace. Using these constants helps to avoid
//! "magic strings" and ensures consistency.

/// The challenge category assumed when a request does not name one.
pub const DEFAULT_CATEGORY: &str = "Web Exploitation";

/// How many candidates to pull from the vector store per query.
pub const DEFAULT_TOP_K: usize = 10;

/// How many ranked reference examples end up in the composed prompt.
pub const DEFAULT_WANT_N: usize = 2;

/// The root directory for per-session image and artifact storage.
pub const DEFAULT_SESSION_ROOT: &str = "sessions";

/// The external markdown-to-docx converter binary.
pub const DEFAULT_CONVERTER: &str = "pandoc";

/// Returned as a successful result when the model refuses a prompt on
/// safety grounds.
pub const SAFETY_BLOCK_MESSAGE: &str =
    "Generation was blocked due to safety concerns. Please try rephrasing your prompt.";

/// Returned as a successful result when the model produces no text at all.
pub const EMPTY_OUTPUT_MESSAGE: &str = "No content generated.";
