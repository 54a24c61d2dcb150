//! BoxVectorIndex -- object-safe dynamic dispatch wrapper for VectorIndex.
//!
//! Follows the same blanket-impl pattern as BoxLlmProvider and BoxEmbedder:
//! 1. Define an object-safe `VectorIndexDyn` trait with boxed futures
//! 2. Blanket-impl `VectorIndexDyn` for all `T: VectorIndex`
//! 3. `BoxVectorIndex` wraps `Box<dyn VectorIndexDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use recall_types::error::StoreError;
use recall_types::memory::{MemoryRecord, RankedRecord};

use super::index::VectorIndex;

/// Object-safe version of [`VectorIndex`] with boxed futures.
pub trait VectorIndexDyn: Send + Sync {
    fn add_boxed<'a>(
        &'a self,
        record: &'a MemoryRecord,
        embedding: &'a [f32],
    ) -> Pin<Box<dyn Future<Output = Result<String, StoreError>> + Send + 'a>>;

    fn search_boxed<'a>(
        &'a self,
        query_embedding: &'a [f32],
        limit: usize,
        tag_filter: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RankedRecord>, StoreError>> + Send + 'a>>;

    fn find_duplicate_boxed<'a>(
        &'a self,
        embedding: &'a [f32],
        threshold: f32,
    ) -> Pin<Box<dyn Future<Output = Result<Option<MemoryRecord>, StoreError>> + Send + 'a>>;

    fn list_recent_boxed<'a>(
        &'a self,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MemoryRecord>, StoreError>> + Send + 'a>>;

    fn delete_boxed<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>>;

    fn delete_all_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<u64, StoreError>> + Send + 'a>>;

    fn count_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<u64, StoreError>> + Send + 'a>>;
}

/// Blanket implementation: any `VectorIndex` automatically implements `VectorIndexDyn`.
impl<T: VectorIndex> VectorIndexDyn for T {
    fn add_boxed<'a>(
        &'a self,
        record: &'a MemoryRecord,
        embedding: &'a [f32],
    ) -> Pin<Box<dyn Future<Output = Result<String, StoreError>> + Send + 'a>> {
        Box::pin(self.add(record, embedding))
    }

    fn search_boxed<'a>(
        &'a self,
        query_embedding: &'a [f32],
        limit: usize,
        tag_filter: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RankedRecord>, StoreError>> + Send + 'a>> {
        Box::pin(self.search(query_embedding, limit, tag_filter))
    }

    fn find_duplicate_boxed<'a>(
        &'a self,
        embedding: &'a [f32],
        threshold: f32,
    ) -> Pin<Box<dyn Future<Output = Result<Option<MemoryRecord>, StoreError>> + Send + 'a>> {
        Box::pin(self.find_duplicate(embedding, threshold))
    }

    fn list_recent_boxed<'a>(
        &'a self,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MemoryRecord>, StoreError>> + Send + 'a>> {
        Box::pin(self.list_recent(limit))
    }

    fn delete_boxed<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + 'a>> {
        Box::pin(self.delete(id))
    }

    fn delete_all_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<u64, StoreError>> + Send + 'a>> {
        Box::pin(self.delete_all())
    }

    fn count_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<u64, StoreError>> + Send + 'a>> {
        Box::pin(self.count())
    }
}

/// Type-erased vector index for runtime backend selection.
///
/// Since `VectorIndex` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxVectorIndex` provides equivalent methods that delegate to
/// the inner `VectorIndexDyn` trait object.
pub struct BoxVectorIndex {
    inner: Box<dyn VectorIndexDyn + Send + Sync>,
}

impl BoxVectorIndex {
    /// Wrap a concrete `VectorIndex` in a type-erased box.
    pub fn new<T: VectorIndex + 'static>(index: T) -> Self {
        Self {
            inner: Box::new(index),
        }
    }

    /// Append a record with its embedding vector. Returns the assigned id.
    pub async fn add(
        &self,
        record: &MemoryRecord,
        embedding: &[f32],
    ) -> Result<String, StoreError> {
        self.inner.add_boxed(record, embedding).await
    }

    /// Search for records similar to the query embedding.
    pub async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        tag_filter: Option<&str>,
    ) -> Result<Vec<RankedRecord>, StoreError> {
        self.inner
            .search_boxed(query_embedding, limit, tag_filter)
            .await
    }

    /// Check whether a near-duplicate record exists within the threshold.
    pub async fn find_duplicate(
        &self,
        embedding: &[f32],
        threshold: f32,
    ) -> Result<Option<MemoryRecord>, StoreError> {
        self.inner.find_duplicate_boxed(embedding, threshold).await
    }

    /// List the most recently stored records, newest first.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<MemoryRecord>, StoreError> {
        self.inner.list_recent_boxed(limit).await
    }

    /// Delete a record by its assigned id.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.delete_boxed(id).await
    }

    /// Delete all records. Returns the count of deleted entries.
    pub async fn delete_all(&self) -> Result<u64, StoreError> {
        self.inner.delete_all_boxed().await
    }

    /// Count stored records.
    pub async fn count(&self) -> Result<u64, StoreError> {
        self.inner.count_boxed().await
    }
}
