//! Per-turn prompt context.
//!
//! `TurnContext` carries the memories retrieved for the current turn plus
//! the current date. It is built fresh each turn and passed explicitly into
//! prompt construction -- there is no ambient mutable context shared across
//! calls.

use chrono::{DateTime, Utc};

use recall_types::config::MemoryConfig;
use recall_types::memory::MemoryRecord;

/// The retrieved-memory context for one chat turn.
#[derive(Debug, Clone)]
pub struct TurnContext {
    /// Records injected this turn, in relevance order.
    records: Vec<MemoryRecord>,
    /// Current date line rendered into the prompt.
    current_date: String,
}

impl TurnContext {
    /// Build the context for a turn from a query result.
    ///
    /// Injection is capped by `max_context_records` and
    /// `max_context_chars`: records past either cap are dropped from the
    /// tail, so the most relevant survive. Insertion order is preserved.
    pub fn new(records: Vec<MemoryRecord>, config: &MemoryConfig, now: DateTime<Utc>) -> Self {
        let mut kept = Vec::new();
        let mut total_chars = 0usize;

        for record in records.into_iter().take(config.max_context_records) {
            total_chars += record.content.len();
            if total_chars > config.max_context_chars && !kept.is_empty() {
                break;
            }
            kept.push(record);
        }

        Self {
            records: kept,
            current_date: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// A context with no retrieved memories.
    pub fn empty(config: &MemoryConfig, now: DateTime<Utc>) -> Self {
        Self::new(Vec::new(), config, now)
    }

    /// The records injected this turn.
    pub fn records(&self) -> &[MemoryRecord] {
        &self.records
    }

    /// The current date line.
    pub fn current_date(&self) -> &str {
        &self.current_date
    }

    /// Render the memory table injected into the system prompt.
    ///
    /// One row per record in insertion order (= relevance order from the
    /// query). Returns an empty string when no records were retrieved.
    pub fn render_memory_table(&self) -> String {
        if self.records.is_empty() {
            return String::new();
        }

        let mut output = String::from("Timestamp | Memory Type | Content\n");
        output.push_str("-----------------------------------\n");
        for record in &self.records {
            output.push_str(&format!(
                "{} | {} | {}\n",
                record.timestamp,
                record.storage_tag(),
                record.content
            ));
        }

        output
    }
}
