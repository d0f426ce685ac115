pub mod pinecone;

use crate::{errors::WriteupError, types::RetrievalMatch};
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use pinecone::PineconeProvider;
use std::fmt::Debug;

/// A trait for querying a vector store for similar writeup examples.
///
/// Implementations own their connection details; callers hand over an
/// embedding vector and a category filter and get scored matches back. The
/// returned order is unspecified, ranking happens in the retrieval layer.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug + DynClone {
    /// The store's name, for logs.
    fn name(&self) -> &str;

    /// Finds the `top_k` nearest matches for `vector` within `category`.
    async fn query(
        &self,
        vector: Vec<f32>,
        category: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>, WriteupError>;
}

dyn_clone::clone_trait_object!(VectorStore);
