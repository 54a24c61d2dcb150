//! LanceDB-backed vector index for memory records.
//!
//! Implements `VectorIndex` from `recall-core` using LanceDB for vector
//! storage and cosine similarity search. All records live in a single
//! table named after the configured collection, with 384-dimensional
//! BGESmallENV15 embeddings.

use std::sync::Arc;

use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field};
use futures_util::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use uuid::Uuid;

use recall_core::memory::index::VectorIndex;
use recall_types::error::StoreError;
use recall_types::memory::{MemoryRecord, RankedRecord, category_from_tag};

use super::lance::LanceStore;
use super::schema::{EMBEDDING_DIMENSION, memory_schema};

/// LanceDB-backed vector index for memory records.
///
/// Wraps a `LanceStore` and implements `VectorIndex` with cosine distance
/// search and exact-match tag filtering. Ids are assigned at insert time
/// (UUIDv7, time-sortable).
pub struct LanceVectorIndex {
    store: LanceStore,
    table_name: String,
}

impl LanceVectorIndex {
    /// Create a new index over the given store and collection name.
    pub fn new(store: LanceStore, collection: impl Into<String>) -> Self {
        Self {
            store,
            table_name: collection.into(),
        }
    }

    /// Ensure the memory table exists, creating it if needed.
    async fn ensure_table(&self) -> Result<lancedb::Table, StoreError> {
        let schema = Arc::new(memory_schema());
        self.store
            .ensure_table(&self.table_name, schema)
            .await
            .map_err(|e| StoreError::Index(format!("Failed to ensure memory table: {e}")))
    }

    /// Build an Arrow RecordBatch for one record, its assigned id, and its
    /// embedding.
    fn build_record_batch(
        id: &str,
        record: &MemoryRecord,
        embedding: &[f32],
    ) -> Result<RecordBatch, StoreError> {
        let schema = Arc::new(memory_schema());

        let id_array = StringArray::from(vec![id.to_string()]);
        let content_array = StringArray::from(vec![record.content.clone()]);
        let timestamp_array = StringArray::from(vec![record.timestamp.clone()]);
        let memory_type_array = StringArray::from(vec![record.storage_tag().to_string()]);

        let values = Float32Array::from(embedding.to_vec());
        let field = Arc::new(Field::new("item", DataType::Float32, true));
        let vector_array = FixedSizeListArray::new(field, EMBEDDING_DIMENSION, Arc::new(values), None);

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(id_array),
                Arc::new(content_array),
                Arc::new(timestamp_array),
                Arc::new(memory_type_array),
                Arc::new(vector_array),
            ],
        )
        .map_err(|e| StoreError::Index(format!("Failed to build record batch: {e}")))
    }

    /// Parse Arrow RecordBatch rows back into MemoryRecord values.
    ///
    /// Extracts columns by index and reconstructs domain objects. The
    /// vector column is skipped (used only for search). Unknown storage
    /// tags reconstruct as untyped records.
    fn record_batch_to_records(batch: &RecordBatch) -> Vec<MemoryRecord> {
        let num_rows = batch.num_rows();
        if num_rows == 0 {
            return vec![];
        }

        let id_col = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("id column should be StringArray");
        let content_col = batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("content column should be StringArray");
        let timestamp_col = batch
            .column(2)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("timestamp column should be StringArray");
        let memory_type_col = batch
            .column(3)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("memory_type column should be StringArray");

        let mut records = Vec::with_capacity(num_rows);

        for i in 0..num_rows {
            records.push(MemoryRecord {
                id: Some(id_col.value(i).to_string()),
                content: content_col.value(i).to_string(),
                timestamp: timestamp_col.value(i).to_string(),
                category: category_from_tag(memory_type_col.value(i)),
            });
        }

        records
    }
}

impl VectorIndex for LanceVectorIndex {
    async fn add(&self, record: &MemoryRecord, embedding: &[f32]) -> Result<String, StoreError> {
        let table = self.ensure_table().await?;

        let id = Uuid::now_v7().to_string();
        let batch = Self::build_record_batch(&id, record, embedding)?;
        let schema = batch.schema();

        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);

        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| StoreError::Index(format!("Failed to add record: {e}")))?;

        Ok(id)
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        tag_filter: Option<&str>,
    ) -> Result<Vec<RankedRecord>, StoreError> {
        let table = self.ensure_table().await?;

        let mut query = table
            .vector_search(query_embedding)
            .map_err(|e| StoreError::Index(format!("Vector search setup failed: {e}")))?
            .distance_type(lancedb::DistanceType::Cosine)
            .limit(limit);

        if let Some(tag) = tag_filter {
            query = query.only_if(format!("memory_type = '{tag}'"));
        }

        let results = query
            .execute()
            .await
            .map_err(|e| StoreError::Index(format!("Vector search failed: {e}")))?;

        let batches: Vec<RecordBatch> = results
            .try_collect()
            .await
            .map_err(|e| StoreError::Index(format!("Failed to collect results: {e}")))?;

        let mut ranked: Vec<RankedRecord> = Vec::new();

        for batch in &batches {
            if batch.num_rows() == 0 {
                continue;
            }

            // The _distance column is added by LanceDB vector search
            let distance_col = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>());

            let records = Self::record_batch_to_records(batch);

            for (i, record) in records.into_iter().enumerate() {
                let distance = distance_col.map_or(0.0, |d| d.value(i));
                ranked.push(RankedRecord { record, distance });
            }
        }

        // Closest first = highest similarity first
        ranked.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(limit);

        Ok(ranked)
    }

    async fn find_duplicate(
        &self,
        embedding: &[f32],
        threshold: f32,
    ) -> Result<Option<MemoryRecord>, StoreError> {
        if !self.store.table_exists(&self.table_name).await {
            return Ok(None);
        }

        let table = self.ensure_table().await?;

        let results = table
            .vector_search(embedding)
            .map_err(|e| StoreError::Index(format!("Dedup search setup failed: {e}")))?
            .distance_type(lancedb::DistanceType::Cosine)
            .limit(1)
            .execute()
            .await
            .map_err(|e| StoreError::Index(format!("Dedup search failed: {e}")))?;

        let batches: Vec<RecordBatch> = results
            .try_collect()
            .await
            .map_err(|e| StoreError::Index(format!("Failed to collect dedup results: {e}")))?;

        for batch in &batches {
            if batch.num_rows() == 0 {
                continue;
            }

            let distance_col = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>());

            if let Some(distances) = distance_col {
                let distance = distances.value(0);
                if distance < threshold {
                    let records = Self::record_batch_to_records(batch);
                    if let Some(record) = records.into_iter().next() {
                        return Ok(Some(record));
                    }
                }
            }
        }

        Ok(None)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<MemoryRecord>, StoreError> {
        if !self.store.table_exists(&self.table_name).await {
            return Ok(vec![]);
        }

        let table = self.ensure_table().await?;

        let results = table
            .query()
            .execute()
            .await
            .map_err(|e| StoreError::Index(format!("Failed to scan records: {e}")))?;

        let batches: Vec<RecordBatch> = results
            .try_collect()
            .await
            .map_err(|e| StoreError::Index(format!("Failed to collect records: {e}")))?;

        let mut records: Vec<MemoryRecord> = batches
            .iter()
            .flat_map(Self::record_batch_to_records)
            .collect();

        // UUIDv7 ids are time-sortable; descending id order = newest first
        records.sort_by(|a, b| b.id.cmp(&a.id));
        records.truncate(limit);

        Ok(records)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let table = self.ensure_table().await?;

        table
            .delete(&format!("id = '{id}'"))
            .await
            .map_err(|e| StoreError::Index(format!("Failed to delete record: {e}")))?;

        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        // Count rows before dropping the table (idempotent drop)
        let count = if self.store.table_exists(&self.table_name).await {
            let table = self.ensure_table().await?;
            table
                .count_rows(None)
                .await
                .map_err(|e| StoreError::Index(format!("Failed to count rows before delete: {e}")))?
                as u64
        } else {
            0
        };

        self.store
            .drop_table(&self.table_name)
            .await
            .map_err(|e| StoreError::Index(format!("Failed to drop memory table: {e}")))?;

        Ok(count)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        if !self.store.table_exists(&self.table_name).await {
            return Ok(0);
        }

        let table = self.ensure_table().await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| StoreError::Index(format!("Failed to count rows: {e}")))?;

        Ok(count as u64)
    }
}
