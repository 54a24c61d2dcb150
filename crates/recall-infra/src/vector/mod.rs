//! Vector database infrastructure for memory embeddings.
//!
//! Provides LanceDB store management, the `VectorIndex` implementation,
//! fastembed-based local embedding generation, and the Arrow schema for
//! the memory table.

pub mod embedder;
pub mod index;
pub mod lance;
pub mod schema;
