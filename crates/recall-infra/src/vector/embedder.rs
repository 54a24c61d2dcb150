//! FastEmbed-based local embedding generator.
//!
//! Implements the `Embedder` trait from `recall-core` using fastembed's
//! BGESmallENV15 model (384 dimensions) with ONNX runtime inference.
//!
//! Inference is blocking CPU work, so the model lives behind an `Arc` and
//! calls go through `tokio::task::spawn_blocking`.

use std::path::Path;
use std::sync::Arc;

use recall_core::memory::embedder::Embedder;
use recall_types::error::StoreError;

use super::schema::EMBEDDING_DIMENSION;

/// Canonical name of the embedding model.
pub const EMBEDDING_MODEL_NAME: &str = "BAAI/bge-small-en-v1.5";

/// Local embedding generator backed by fastembed.
///
/// Model files are downloaded on first use into the given cache directory
/// and reused afterwards.
pub struct FastEmbedder {
    model: Arc<fastembed::TextEmbedding>,
}

impl FastEmbedder {
    /// Initialize the embedding model, caching model files in `cache_dir`.
    ///
    /// Downloads the model on first run; subsequent runs load from cache.
    pub fn new(cache_dir: &Path) -> Result<Self, StoreError> {
        let options = fastembed::InitOptions::new(fastembed::EmbeddingModel::BGESmallENV15)
            .with_cache_dir(cache_dir.to_path_buf())
            .with_show_download_progress(false);

        let model = fastembed::TextEmbedding::try_new(options)
            .map_err(|e| StoreError::Embedding(format!("Failed to load embedding model: {e}")))?;

        Ok(Self {
            model: Arc::new(model),
        })
    }
}

impl Embedder for FastEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, StoreError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model.clone();
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            model
                .embed(texts, None)
                .map_err(|e| StoreError::Embedding(format!("Embedding failed: {e}")))
        })
        .await
        .map_err(|e| StoreError::Embedding(format!("Embedding task failed: {e}")))?
    }

    fn model_name(&self) -> &str {
        EMBEDDING_MODEL_NAME
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION as usize
    }
}
