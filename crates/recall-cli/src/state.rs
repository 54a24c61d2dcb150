//! Application state wiring the memory stack together.
//!
//! `AppState` pins the generic core types to their concrete infra
//! implementations: the LanceDB index and the fastembed embedder behind
//! the `MemoryStore`.

use std::path::PathBuf;

use anyhow::Context;

use recall_core::memory::box_embedder::BoxEmbedder;
use recall_core::memory::box_index::BoxVectorIndex;
use recall_core::memory::store::MemoryStore;
use recall_infra::config::load_config;
use recall_infra::vector::embedder::FastEmbedder;
use recall_infra::vector::index::LanceVectorIndex;
use recall_infra::vector::lance::LanceStore;
use recall_types::config::AppConfig;

/// Application state holding the configuration and the memory store.
pub struct AppState {
    pub config: AppConfig,
    pub store: MemoryStore,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, open the index,
    /// load the embedding model.
    ///
    /// `data_dir_override` (the `--data-dir` flag) takes precedence over
    /// the config file's `data_dir` key. The config file is read from the
    /// chosen directory.
    pub async fn init(data_dir_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir_override
            .unwrap_or_else(|| AppConfig::default().memory.data_dir);

        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let mut config = load_config(&data_dir).await;
        config.memory.data_dir = data_dir.clone();

        // Model files download on first run; keep them inside the data dir
        // so the whole state lives in one place.
        let embedder = FastEmbedder::new(&data_dir.join("models"))
            .context("Failed to initialize the embedding model")?;

        let lance = LanceStore::new(data_dir.join("index"))
            .await
            .context("Failed to open the vector index")?;
        let index = LanceVectorIndex::new(lance, config.memory.collection.clone());

        let store = MemoryStore::new(
            BoxVectorIndex::new(index),
            BoxEmbedder::new(embedder),
            &config.memory,
        );

        Ok(Self {
            config,
            store,
            data_dir,
        })
    }
}
