use crate::{errors::WriteupError, providers::vector::VectorStore, types::RetrievalMatch};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// --- Pinecone-specific request and response structures ---

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PineconeQueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    filter: CategoryFilter,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Serialize, Debug)]
struct CategoryFilter {
    category: EqualityMatch,
}

#[derive(Serialize, Debug)]
struct EqualityMatch {
    #[serde(rename = "$eq")]
    eq: String,
}

#[derive(Deserialize, Debug)]
struct PineconeQueryResponse {
    #[serde(default)]
    matches: Vec<PineconeMatch>,
}

#[derive(Deserialize, Debug)]
struct PineconeMatch {
    #[serde(default)]
    score: f64,
    metadata: Option<PineconeMetadata>,
}

/// Pinecone stores all metadata numbers as floats, so the indexed completion
/// length arrives as an `f64`.
#[derive(Deserialize, Debug)]
struct PineconeMetadata {
    #[serde(default)]
    completion: String,
    completion_length: Option<f64>,
}

// --- Pinecone Provider implementation ---

/// A vector store backed by a Pinecone index.
#[derive(Clone, Debug)]
pub struct PineconeProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
}

impl PineconeProvider {
    /// Creates a new `PineconeProvider` for the index at `api_url`.
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> Result<Self, WriteupError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(WriteupError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl VectorStore for PineconeProvider {
    fn name(&self) -> &str {
        "Pinecone"
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        category: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>, WriteupError> {
        let request_body = PineconeQueryRequest {
            vector: &vector,
            top_k,
            filter: CategoryFilter {
                category: EqualityMatch {
                    eq: category.to_string(),
                },
            },
            include_metadata: true,
            include_values: false,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Api-Key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(WriteupError::VectorRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WriteupError::VectorApi(error_text));
        }

        let query_response: PineconeQueryResponse = response
            .json()
            .await
            .map_err(WriteupError::VectorDeserialization)?;

        let matches = query_response
            .matches
            .into_iter()
            .filter_map(|m| {
                let metadata = m.metadata?;
                let length = metadata
                    .completion_length
                    .map(|l| l as usize)
                    .unwrap_or_else(|| metadata.completion.chars().count());
                Some(RetrievalMatch {
                    completion: metadata.completion,
                    length,
                    score: m.score,
                })
            })
            .collect();

        Ok(matches)
    }
}
