use thiserror::Error;

/// Errors from memory store and vector index operations.
///
/// Used by the trait definitions in recall-core; implementations in
/// recall-infra map backend errors into these variants.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("index connection error")]
    Connection,

    #[error("index error: {0}")]
    Index(String),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("record not found")]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Index("table missing".to_string());
        assert_eq!(err.to_string(), "index error: table missing");
    }

    #[test]
    fn test_embedding_error_display() {
        let err = StoreError::Embedding("model load failed".to_string());
        assert!(err.to_string().contains("model load failed"));
    }
}
