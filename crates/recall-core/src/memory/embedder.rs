//! Embedder trait for text-to-vector conversion.
//!
//! Defines the interface for embedding text into vectors for semantic
//! search. Uses RPITIT (native async fn in traits, Rust 2024 edition).
//! Implementations (e.g., fastembed local models) live in recall-infra.

use recall_types::error::StoreError;

/// Trait for converting text into embedding vectors.
pub trait Embedder: Send + Sync {
    /// Embed one or more texts into vectors.
    ///
    /// Returns one vector per input text, in order.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, StoreError>> + Send;

    /// The model name used for embeddings (e.g., "BAAI/bge-small-en-v1.5").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
