//! Vector index trait.
//!
//! Defines the interface for the similarity-search store holding memory
//! records. Uses RPITIT (native async fn in traits, Rust 2024 edition).
//! Implementations (e.g., LanceDB) live in recall-infra.

use recall_types::error::StoreError;
use recall_types::memory::{MemoryRecord, RankedRecord};

/// Trait for vector-indexed record storage with semantic search.
pub trait VectorIndex: Send + Sync {
    /// Append a record with its embedding vector.
    ///
    /// The index assigns and returns a fresh unique id; the caller's
    /// record is not mutated.
    fn add(
        &self,
        record: &MemoryRecord,
        embedding: &[f32],
    ) -> impl std::future::Future<Output = Result<String, StoreError>> + Send;

    /// Search for records similar to the query embedding.
    ///
    /// Results are ranked by cosine distance ascending (closest first).
    /// `tag_filter` restricts results to rows whose storage tag matches
    /// exactly.
    fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        tag_filter: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<RankedRecord>, StoreError>> + Send;

    /// Check whether a near-duplicate record exists within the given
    /// cosine-distance threshold.
    fn find_duplicate(
        &self,
        embedding: &[f32],
        threshold: f32,
    ) -> impl std::future::Future<Output = Result<Option<MemoryRecord>, StoreError>> + Send;

    /// List the most recently stored records, newest first.
    fn list_recent(
        &self,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryRecord>, StoreError>> + Send;

    /// Delete a record by its assigned id.
    fn delete(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Delete all records. Returns the count of deleted entries.
    fn delete_all(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// Count stored records.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
