//! Memory store orchestration.
//!
//! `MemoryStore` sits between the chat loop and the vector index: it embeds
//! record content before appending, translates category filters to storage
//! tags before searching, and maps hits back to typed records.
//!
//! Store failures propagate to the caller; query failures degrade to an
//! empty result so the conversation continues without memory context.

use tracing::{debug, warn};

use recall_types::config::MemoryConfig;
use recall_types::error::StoreError;
use recall_types::memory::{MemoryQuery, MemoryRecord};

use super::box_embedder::BoxEmbedder;
use super::box_index::BoxVectorIndex;

/// Embeds, stores, and retrieves memory records.
pub struct MemoryStore {
    index: BoxVectorIndex,
    embedder: BoxEmbedder,
    /// Cosine-distance threshold for skipping near-duplicate stores.
    /// `None` disables the check and every store appends a new row.
    dedup_threshold: Option<f32>,
}

impl MemoryStore {
    /// Create a store over the given index and embedder.
    pub fn new(index: BoxVectorIndex, embedder: BoxEmbedder, config: &MemoryConfig) -> Self {
        Self {
            index,
            embedder,
            dedup_threshold: config.dedup_threshold,
        }
    }

    /// Persist a record into the vector index.
    ///
    /// Returns a copy of the input record. The id assigned by the index is
    /// logged but NOT threaded into the returned value; callers needing
    /// stable ids must list or query the index.
    ///
    /// # Errors
    /// Embedding and index-write failures propagate unchanged; there is no
    /// retry. Empty content is rejected before touching the index.
    #[tracing::instrument(name = "memory_store", skip(self, record), fields(category = %record.storage_tag()))]
    pub async fn store(&self, record: &MemoryRecord) -> Result<MemoryRecord, StoreError> {
        if record.content.trim().is_empty() {
            return Err(StoreError::Index("record content is empty".to_string()));
        }

        let embedding = self.embedder.embed_one(&record.content).await?;

        if let Some(threshold) = self.dedup_threshold {
            if let Some(existing) = self.index.find_duplicate(&embedding, threshold).await? {
                debug!(
                    existing_id = existing.id.as_deref().unwrap_or(""),
                    "Near-duplicate within threshold; skipping store"
                );
                return Ok(record.clone());
            }
        }

        let id = self.index.add(record, &embedding).await?;
        debug!(assigned_id = %id, "Memory record stored");

        Ok(record.clone())
    }

    /// Search for records relevant to the query text.
    ///
    /// Results come back ranked by similarity descending, at most
    /// `query.limit` of them. A category filter restricts hits to that
    /// category's storage tag.
    ///
    /// # Graceful degradation
    /// Any embedding or index failure is logged at warn level and produces
    /// an empty Vec -- retrieval problems never interrupt the conversation.
    #[tracing::instrument(name = "memory_query", skip(self, query), fields(limit = query.limit))]
    pub async fn query(&self, query: &MemoryQuery) -> Vec<MemoryRecord> {
        let embedding = match self.embedder.embed_one(&query.query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "Query embedding failed; returning no memories");
                return Vec::new();
            }
        };

        let tag = query.category.map(|c| c.storage_tag());

        match self.index.search(&embedding, query.limit, tag).await {
            Ok(hits) => {
                debug!(count = hits.len(), "Memory records retrieved");
                hits.into_iter().map(|hit| hit.record).collect()
            }
            Err(e) => {
                warn!(error = %e, "Memory query failed; returning no memories");
                Vec::new()
            }
        }
    }

    /// List the most recently stored records, newest first.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<MemoryRecord>, StoreError> {
        self.index.list_recent(limit).await
    }

    /// Delete a record by its assigned id.
    pub async fn forget(&self, id: &str) -> Result<(), StoreError> {
        self.index.delete(id).await
    }

    /// Delete all records. Returns the count of deleted entries.
    pub async fn forget_all(&self) -> Result<u64, StoreError> {
        self.index.delete_all().await
    }

    /// Count stored records.
    pub async fn count(&self) -> Result<u64, StoreError> {
        self.index.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::embedder::Embedder;
    use crate::memory::index::VectorIndex;
    use recall_types::memory::{MemoryCategory, RankedRecord};
    use std::sync::Mutex;

    /// Embedder returning a fixed unit vector for any text.
    struct StubEmbedder;

    impl Embedder for StubEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, StoreError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0]).collect())
        }

        fn model_name(&self) -> &str {
            "stub"
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    /// Embedder that always fails.
    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, StoreError> {
            Err(StoreError::Embedding("model unavailable".to_string()))
        }

        fn model_name(&self) -> &str {
            "failing"
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    /// In-memory index capturing added records.
    #[derive(Default)]
    struct RecordingIndex {
        rows: Mutex<Vec<MemoryRecord>>,
        duplicate: Option<MemoryRecord>,
    }

    impl VectorIndex for RecordingIndex {
        async fn add(
            &self,
            record: &MemoryRecord,
            _embedding: &[f32],
        ) -> Result<String, StoreError> {
            let id = format!("rec-{}", self.rows.lock().unwrap().len());
            let mut stored = record.clone();
            stored.id = Some(id.clone());
            self.rows.lock().unwrap().push(stored);
            Ok(id)
        }

        async fn search(
            &self,
            _query_embedding: &[f32],
            limit: usize,
            tag_filter: Option<&str>,
        ) -> Result<Vec<RankedRecord>, StoreError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|r| tag_filter.is_none_or(|tag| r.storage_tag() == tag))
                .take(limit)
                .map(|r| RankedRecord {
                    record: r.clone(),
                    distance: 0.1,
                })
                .collect())
        }

        async fn find_duplicate(
            &self,
            _embedding: &[f32],
            _threshold: f32,
        ) -> Result<Option<MemoryRecord>, StoreError> {
            Ok(self.duplicate.clone())
        }

        async fn list_recent(&self, limit: usize) -> Result<Vec<MemoryRecord>, StoreError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().rev().take(limit).cloned().collect())
        }

        async fn delete(&self, id: &str) -> Result<(), StoreError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.id.as_deref() != Some(id));
            if rows.len() == before {
                return Err(StoreError::NotFound);
            }
            Ok(())
        }

        async fn delete_all(&self) -> Result<u64, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            let count = rows.len() as u64;
            rows.clear();
            Ok(count)
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Ok(self.rows.lock().unwrap().len() as u64)
        }
    }

    /// Index whose every operation fails.
    struct BrokenIndex;

    impl VectorIndex for BrokenIndex {
        async fn add(
            &self,
            _record: &MemoryRecord,
            _embedding: &[f32],
        ) -> Result<String, StoreError> {
            Err(StoreError::Index("disk full".to_string()))
        }

        async fn search(
            &self,
            _query_embedding: &[f32],
            _limit: usize,
            _tag_filter: Option<&str>,
        ) -> Result<Vec<RankedRecord>, StoreError> {
            Err(StoreError::Connection)
        }

        async fn find_duplicate(
            &self,
            _embedding: &[f32],
            _threshold: f32,
        ) -> Result<Option<MemoryRecord>, StoreError> {
            Err(StoreError::Connection)
        }

        async fn list_recent(&self, _limit: usize) -> Result<Vec<MemoryRecord>, StoreError> {
            Err(StoreError::Connection)
        }

        async fn delete(&self, _id: &str) -> Result<(), StoreError> {
            Err(StoreError::Connection)
        }

        async fn delete_all(&self) -> Result<u64, StoreError> {
            Err(StoreError::Connection)
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Err(StoreError::Connection)
        }
    }

    fn store_with(index: RecordingIndex) -> MemoryStore {
        MemoryStore::new(
            BoxVectorIndex::new(index),
            BoxEmbedder::new(StubEmbedder),
            &MemoryConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_store_returns_copy_without_assigned_id() {
        let store = store_with(RecordingIndex::default());
        let record = MemoryRecord::new("User has a PhD in quantum computing", Some(MemoryCategory::CoreBio));

        let stored = store.store(&record).await.unwrap();

        // The returned copy is identical to the input: id stays unassigned.
        assert_eq!(stored, record);
        assert!(stored.id.is_none());
    }

    #[tokio::test]
    async fn test_store_twice_creates_two_entries() {
        let store = store_with(RecordingIndex::default());
        let record = MemoryRecord::new("User lives in Boston", Some(MemoryCategory::CoreBio));

        store.store(&record).await.unwrap();
        store.store(&record).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_store_rejects_empty_content() {
        let store = store_with(RecordingIndex::default());
        let record = MemoryRecord::new("   ", None);

        assert!(store.store(&record).await.is_err());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = MemoryStore::new(
            BoxVectorIndex::new(BrokenIndex),
            BoxEmbedder::new(StubEmbedder),
            &MemoryConfig::default(),
        );
        let record = MemoryRecord::new("User got engaged last month", Some(MemoryCategory::Event));

        let result = store.store(&record).await;
        assert!(matches!(result, Err(StoreError::Index(_))));
    }

    #[tokio::test]
    async fn test_dedup_skips_insert_when_threshold_set() {
        let index = RecordingIndex {
            rows: Mutex::new(Vec::new()),
            duplicate: Some(MemoryRecord::new("User lives in Boston", Some(MemoryCategory::CoreBio))),
        };
        let config = MemoryConfig {
            dedup_threshold: Some(0.15),
            ..MemoryConfig::default()
        };
        let store = MemoryStore::new(
            BoxVectorIndex::new(index),
            BoxEmbedder::new(StubEmbedder),
            &config,
        );

        let record = MemoryRecord::new("User lives in Boston, MA", Some(MemoryCategory::CoreBio));
        let stored = store.store(&record).await.unwrap();

        assert_eq!(stored, record);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_query_roundtrip_preserves_content_and_timestamp() {
        let store = store_with(RecordingIndex::default());

        for category in [
            Some(MemoryCategory::CoreBio),
            Some(MemoryCategory::Event),
            Some(MemoryCategory::WorkProject),
        ] {
            let record = MemoryRecord::new(format!("Fact about {category:?}"), category);
            store.store(&record).await.unwrap();

            let results = store
                .query(&MemoryQuery::new(record.content.clone(), 10))
                .await;
            let found = results
                .iter()
                .find(|r| r.content == record.content)
                .expect("stored record should be retrievable");

            assert_eq!(found.content, record.content);
            assert_eq!(found.timestamp, record.timestamp);
            assert_eq!(found.category, record.category);
        }
    }

    #[tokio::test]
    async fn test_query_category_filter_excludes_others() {
        let store = store_with(RecordingIndex::default());
        store
            .store(&MemoryRecord::new("Allergic to shellfish", Some(MemoryCategory::CoreBio)))
            .await
            .unwrap();
        store
            .store(&MemoryRecord::new("Leads Project Aurora", Some(MemoryCategory::WorkProject)))
            .await
            .unwrap();

        let query = MemoryQuery::new("anything", 10).with_category(MemoryCategory::WorkProject);
        let results = store.query(&query).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, Some(MemoryCategory::WorkProject));
    }

    #[tokio::test]
    async fn test_query_failure_degrades_to_empty() {
        let store = MemoryStore::new(
            BoxVectorIndex::new(BrokenIndex),
            BoxEmbedder::new(StubEmbedder),
            &MemoryConfig::default(),
        );

        let results = store.query(&MemoryQuery::new("anything", 10)).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_query_embedding_failure_degrades_to_empty() {
        let store = MemoryStore::new(
            BoxVectorIndex::new(RecordingIndex::default()),
            BoxEmbedder::new(FailingEmbedder),
            &MemoryConfig::default(),
        );

        let results = store.query(&MemoryQuery::new("anything", 10)).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_query_respects_limit() {
        let store = store_with(RecordingIndex::default());
        for i in 0..5 {
            store
                .store(&MemoryRecord::new(format!("Fact number {i}"), Some(MemoryCategory::Event)))
                .await
                .unwrap();
        }

        let results = store.query(&MemoryQuery::new("facts", 3)).await;
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_forget_and_forget_all() {
        let store = store_with(RecordingIndex::default());
        store
            .store(&MemoryRecord::new("First", Some(MemoryCategory::Event)))
            .await
            .unwrap();
        store
            .store(&MemoryRecord::new("Second", Some(MemoryCategory::Event)))
            .await
            .unwrap();

        store.forget("rec-0").await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);

        let wiped = store.forget_all().await.unwrap();
        assert_eq!(wiped, 1);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
