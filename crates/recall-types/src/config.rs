//! Configuration types for Recall.
//!
//! `AppConfig` represents the top-level `config.toml` that controls where
//! memory is persisted, which model handles chat, and how much retrieved
//! context may be injected into a prompt.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for Recall.
///
/// Loaded from `{data_dir}/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

/// Memory persistence and retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Directory the vector index persists to.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name of the index table holding memory records.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// How many records to retrieve per turn.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Cap on the number of retrieved records injected into the prompt.
    #[serde(default = "default_max_context_records")]
    pub max_context_records: usize,

    /// Cap on the total character length of injected record content.
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,

    /// Cosine-distance threshold for skipping near-duplicate stores.
    /// `None` disables deterministic dedup; significance judgment is then
    /// entirely the formation model's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedup_threshold: Option<f32>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./recall_db")
}

fn default_collection() -> String {
    "chat_memories".to_string()
}

fn default_top_k() -> usize {
    10
}

fn default_max_context_records() -> usize {
    10
}

fn default_max_context_chars() -> usize {
    4_000
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            collection: default_collection(),
            top_k: default_top_k(),
            max_context_records: default_max_context_records(),
            max_context_chars: default_max_context_chars(),
            dedup_threshold: None,
        }
    }
}

/// Chat model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model identifier for chat and memory formation calls.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for chat replies.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}
