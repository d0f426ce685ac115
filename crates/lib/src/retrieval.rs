//! # Reference Example Retrieval
//!
//! This module finds prior writeups similar to the user's prompt: embed the
//! prompt, query the vector store within the challenge category, then rank and
//! truncate the matches. Retrieval only ever improves a writeup; every failure
//! along the way degrades to "no examples" so generation always proceeds.

use crate::{
    constants::{DEFAULT_TOP_K, DEFAULT_WANT_N},
    providers::{ai::EmbeddingClient, vector::VectorStore},
    types::RetrievalMatch,
};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// The embedding client and vector store that together answer "what did
/// similar solutions look like?".
#[derive(Debug)]
pub struct RetrievalBackend {
    pub embedder: EmbeddingClient,
    pub store: Box<dyn VectorStore>,
    /// How many candidates to pull from the store per query.
    pub top_k: usize,
    /// How many ranked examples to keep for the prompt.
    pub want_n: usize,
}

impl RetrievalBackend {
    pub fn new(embedder: EmbeddingClient, store: Box<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            top_k: DEFAULT_TOP_K,
            want_n: DEFAULT_WANT_N,
        }
    }

    /// Overrides the candidate and keep counts.
    pub fn with_limits(mut self, top_k: usize, want_n: usize) -> Self {
        self.top_k = top_k;
        self.want_n = want_n;
        self
    }
}

/// Retrieves the reference examples for a prompt, best effort.
///
/// Returns an empty list when the backend is disabled or when any stage
/// fails. Failures are logged and swallowed here: a missing example list
/// must never fail the writeup request it was meant to enrich.
pub async fn find_reference_examples(
    backend: Option<&RetrievalBackend>,
    prompt: &str,
    category: &str,
) -> Vec<String> {
    let Some(backend) = backend else {
        info!("Retrieval backend is disabled. Generating without reference examples.");
        return Vec::new();
    };

    let vector = match backend.embedder.embed(prompt).await {
        Ok(vector) => vector,
        Err(e) => {
            warn!(error = %e, "Embedding the prompt failed. Continuing without reference examples.");
            return Vec::new();
        }
    };

    let matches = match backend.store.query(vector, category, backend.top_k).await {
        Ok(matches) => matches,
        Err(e) => {
            warn!(error = %e, "Vector store query failed. Continuing without reference examples.");
            return Vec::new();
        }
    };

    debug!(
        store = backend.store.name(),
        candidates = matches.len(),
        category,
        "<-- Vector store returned candidates"
    );
    rank_completions(matches, backend.want_n)
}

/// Orders matches by score descending, breaking ties with the shorter
/// completion first, and keeps the best `want_n`.
///
/// The length tie-break prefers tighter examples so the composed prompt does
/// not balloon when the store holds several equally-similar writeups.
pub fn rank_completions(mut matches: Vec<RetrievalMatch>, want_n: usize) -> Vec<String> {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.length.cmp(&b.length))
    });
    matches.truncate(want_n);
    matches.into_iter().map(|m| m.completion).collect()
}
