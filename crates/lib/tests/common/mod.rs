#![allow(dead_code)]
//! # Common Test Utilities
//!
//! This module provides shared utilities for testing, such as mock providers
//! and canned payloads, to ensure tests are isolated and repeatable.

use async_trait::async_trait;
use ctfrag::providers::ai::{AiProvider, GenerationOutcome};
use ctfrag::providers::vector::VectorStore;
use ctfrag::types::RetrievalMatch;
use std::fmt::Debug;
use std::sync::{Arc, Once, RwLock};

#[cfg(test)]
static INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests.
#[cfg(test)]
pub fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt::init();
    });
}

/// A one-pixel transparent PNG, encoded as the data URI a browser editor
/// would submit for an image placeholder.
pub const TINY_PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

// --- Mock AI Provider for Logic Testing ---
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<String>>>,
    pub outcomes: Arc<RwLock<Vec<GenerationOutcome>>>,
}

impl MockAiProvider {
    pub fn new(outcomes: Vec<GenerationOutcome>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            outcomes: Arc::new(RwLock::new(outcomes.into_iter().rev().collect())),
        }
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, prompt: &str) -> Result<GenerationOutcome, ctfrag::WriteupError> {
        self.call_history.write().unwrap().push(prompt.to_string());

        if let Some(outcome) = self.outcomes.write().unwrap().pop() {
            Ok(outcome)
        } else {
            Ok(GenerationOutcome::Text("Default mock response".to_string()))
        }
    }
}

// --- Failing AI Provider for error-path testing ---
#[derive(Clone, Debug)]
pub struct FailingAiProvider;

#[async_trait]
impl AiProvider for FailingAiProvider {
    async fn generate(&self, _prompt: &str) -> Result<GenerationOutcome, ctfrag::WriteupError> {
        Err(ctfrag::WriteupError::AiApi(
            "mock provider exploded".to_string(),
        ))
    }
}

// --- Mock Vector Store for retrieval testing ---
#[derive(Clone, Debug)]
pub struct MockVectorStore {
    pub matches: Vec<RetrievalMatch>,
    pub queries: Arc<RwLock<Vec<(String, usize)>>>,
}

impl MockVectorStore {
    pub fn new(matches: Vec<RetrievalMatch>) -> Self {
        Self {
            matches,
            queries: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    fn name(&self) -> &str {
        "MockVectorStore"
    }

    async fn query(
        &self,
        _vector: Vec<f32>,
        category: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>, ctfrag::WriteupError> {
        self.queries
            .write()
            .unwrap()
            .push((category.to_string(), top_k));
        Ok(self.matches.clone())
    }
}

// --- Failing Vector Store for degradation testing ---
#[derive(Clone, Debug)]
pub struct FailingVectorStore;

#[async_trait]
impl VectorStore for FailingVectorStore {
    fn name(&self) -> &str {
        "FailingVectorStore"
    }

    async fn query(
        &self,
        _vector: Vec<f32>,
        _category: &str,
        _top_k: usize,
    ) -> Result<Vec<RetrievalMatch>, ctfrag::WriteupError> {
        Err(ctfrag::WriteupError::VectorApi(
            "mock store unavailable".to_string(),
        ))
    }
}
