//! Memory types for Recall.
//!
//! These types model the assistant's long-term memory: facts about the
//! user judged significant enough to persist across conversations.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Category of a memory record.
///
/// Classifies what kind of fact a record captures. Records without a
/// recognized category deserialize as bare (untyped) records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCategory {
    /// Core biographical information: name, background, health, traits.
    CoreBio,
    /// A significant life event the user experienced.
    Event,
    /// A work or project fact.
    WorkProject,
}

impl MemoryCategory {
    /// The storage tag written to the vector index for this category.
    ///
    /// A pure lookup; the reverse direction is [`category_from_tag`].
    pub fn storage_tag(&self) -> &'static str {
        match self {
            MemoryCategory::CoreBio => "core_memory",
            MemoryCategory::Event => "event_memory",
            MemoryCategory::WorkProject => "work_project_memory",
        }
    }
}

impl fmt::Display for MemoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryCategory::CoreBio => write!(f, "core_bio"),
            MemoryCategory::Event => write!(f, "event"),
            MemoryCategory::WorkProject => write!(f, "work_project"),
        }
    }
}

impl FromStr for MemoryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "core_bio" => Ok(MemoryCategory::CoreBio),
            "event" => Ok(MemoryCategory::Event),
            "work_project" => Ok(MemoryCategory::WorkProject),
            other => Err(format!("invalid memory category: '{other}'")),
        }
    }
}

/// Storage tag written for records with no recognized category.
pub const UNTYPED_STORAGE_TAG: &str = "base_memory";

/// Resolve a storage tag back to a category.
///
/// Unknown tags (including `base_memory`) resolve to `None` -- the record
/// is reconstructed untyped rather than rejected.
pub fn category_from_tag(tag: &str) -> Option<MemoryCategory> {
    match tag {
        "core_memory" => Some(MemoryCategory::CoreBio),
        "event_memory" => Some(MemoryCategory::Event),
        "work_project_memory" => Some(MemoryCategory::WorkProject),
        _ => None,
    }
}

/// The storage tag for an optional category.
pub fn tag_for_category(category: Option<MemoryCategory>) -> &'static str {
    category.map_or(UNTYPED_STORAGE_TAG, |c| c.storage_tag())
}

/// A single fact persisted to long-term memory.
///
/// The id is assigned by the vector index on store; records created by
/// memory formation carry `id: None` until then. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Index-assigned identifier. `None` before the record is stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The fact itself, phrased to stay relevant over time.
    pub content: String,
    /// RFC 3339 timestamp of when the record was created.
    pub timestamp: String,
    /// `None` means the untyped fallback category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<MemoryCategory>,
}

impl MemoryRecord {
    /// Create a new unstored record stamped with the current UTC time.
    pub fn new(content: impl Into<String>, category: Option<MemoryCategory>) -> Self {
        Self {
            id: None,
            content: content.into(),
            timestamp: Utc::now().to_rfc3339(),
            category,
        }
    }

    /// The storage tag for this record's category.
    pub fn storage_tag(&self) -> &'static str {
        tag_for_category(self.category)
    }
}

/// A semantic similarity query against the memory index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryQuery {
    /// Free text to embed and match against stored content.
    pub query: String,
    /// Maximum number of records to return.
    pub limit: usize,
    /// Restrict results to one category's storage tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<MemoryCategory>,
}

impl MemoryQuery {
    /// Query with no category filter.
    pub fn new(query: impl Into<String>, limit: usize) -> Self {
        Self {
            query: query.into(),
            limit,
            category: None,
        }
    }

    /// Restrict the query to a single category.
    pub fn with_category(mut self, category: MemoryCategory) -> Self {
        self.category = Some(category);
        self
    }
}

/// A record returned from a similarity search with ranking information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRecord {
    /// The reconstructed record, id populated from the index.
    pub record: MemoryRecord,
    /// Raw cosine distance from the query embedding (lower is closer).
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_category_roundtrip() {
        for cat in [
            MemoryCategory::CoreBio,
            MemoryCategory::Event,
            MemoryCategory::WorkProject,
        ] {
            let s = cat.to_string();
            let parsed: MemoryCategory = s.parse().unwrap();
            assert_eq!(cat, parsed);
        }
    }

    #[test]
    fn test_memory_category_serde() {
        let cat = MemoryCategory::CoreBio;
        let json = serde_json::to_string(&cat).unwrap();
        assert_eq!(json, "\"core_bio\"");
        let parsed: MemoryCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MemoryCategory::CoreBio);
    }

    #[test]
    fn test_storage_tag_roundtrip() {
        for cat in [
            MemoryCategory::CoreBio,
            MemoryCategory::Event,
            MemoryCategory::WorkProject,
        ] {
            assert_eq!(category_from_tag(cat.storage_tag()), Some(cat));
        }
    }

    #[test]
    fn test_unknown_tag_resolves_untyped() {
        assert_eq!(category_from_tag("base_memory"), None);
        assert_eq!(category_from_tag("something_else"), None);
        assert_eq!(category_from_tag(""), None);
    }

    #[test]
    fn test_tag_for_untyped_category() {
        assert_eq!(tag_for_category(None), "base_memory");
        assert_eq!(
            tag_for_category(Some(MemoryCategory::Event)),
            "event_memory"
        );
    }

    #[test]
    fn test_new_record_stamps_rfc3339_timestamp() {
        let record = MemoryRecord::new("User is allergic to shellfish", Some(MemoryCategory::CoreBio));
        assert!(record.id.is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
    }

    #[test]
    fn test_record_serialize_skips_missing_id() {
        let record = MemoryRecord::new("User works on Project Aurora", Some(MemoryCategory::WorkProject));
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(json.contains("\"category\":\"work_project\""));
    }

    #[test]
    fn test_untyped_record_serde() {
        let json = r#"{"content":"Some fact","timestamp":"2026-01-01T00:00:00+00:00"}"#;
        let record: MemoryRecord = serde_json::from_str(json).unwrap();
        assert!(record.category.is_none());
        assert!(record.id.is_none());
        assert_eq!(record.content, "Some fact");
    }

    #[test]
    fn test_query_builder() {
        let query = MemoryQuery::new("allergies", 10).with_category(MemoryCategory::CoreBio);
        assert_eq!(query.limit, 10);
        assert_eq!(query.category, Some(MemoryCategory::CoreBio));
    }
}
