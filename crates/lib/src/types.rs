use crate::{
    constants::DEFAULT_CATEGORY, providers::ai::AiProvider, retrieval::RetrievalBackend,
    validate::ValidationRules,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One writeup generation request.
///
/// `mappings` ties each placeholder tag in the prompt to its raw content:
/// data URIs for `[[img*]]` tags, source text for `[[code*]]` tags. Entries
/// are held in a `BTreeMap` so resolution always walks them in a stable
/// lexicographic order regardless of how the JSON object was keyed.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// One scored candidate from the vector store.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RetrievalMatch {
    /// The stored writeup text.
    pub completion: String,
    /// The completion's indexed length, used as the ranking tie-break.
    pub length: usize,
    /// Similarity to the query vector, higher is better.
    pub score: f64,
}

/// A client that validates prompts, retrieves reference examples, and
/// generates writeups.
///
/// Both backends are optional. Without a retrieval backend the client
/// generates from the prompt alone; without a generation provider it still
/// validates but fails generation with a configuration error.
#[derive(Debug)]
pub struct WriteupClient {
    pub(crate) ai_provider: Option<Box<dyn AiProvider>>,
    pub(crate) retrieval: Option<RetrievalBackend>,
    pub(crate) rules: ValidationRules,
}

/// A builder for creating `WriteupClient` instances.
#[derive(Default)]
pub struct WriteupClientBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    retrieval: Option<RetrievalBackend>,
    rules: Option<ValidationRules>,
}

impl WriteupClientBuilder {
    /// Creates a new `WriteupClientBuilder`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctfrag::WriteupClientBuilder;
    ///
    /// let client = WriteupClientBuilder::new().build();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the generation provider.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    /// Sets the retrieval backend.
    pub fn retrieval_backend(mut self, backend: RetrievalBackend) -> Self {
        self.retrieval = Some(backend);
        self
    }

    /// Replaces the default validation rules.
    pub fn validation_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Builds the `WriteupClient`.
    pub fn build(self) -> WriteupClient {
        WriteupClient {
            ai_provider: self.ai_provider,
            retrieval: self.retrieval,
            rules: self.rules.unwrap_or_default(),
        }
    }
}
