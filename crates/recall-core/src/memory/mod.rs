//! Memory formation, storage, and retrieval for Recall.
//!
//! This module defines the `Embedder` and `VectorIndex` ports that the
//! infrastructure layer implements, the `MemoryStore` that orchestrates
//! embed-then-store and embed-then-search, and the `MemoryFormation`
//! judgment that uses an LLM to decide what is worth remembering.

pub mod box_embedder;
pub mod box_index;
pub mod embedder;
pub mod formation;
pub mod index;
pub mod store;
