//! Infrastructure layer for Recall.
//!
//! Contains implementations of the port traits defined in `recall-core`:
//! the LanceDB vector index, fastembed local embedding generation, the
//! Anthropic LLM provider, configuration loading, and the environment
//! credential lookup.

pub mod config;
pub mod llm;
pub mod secret;
pub mod vector;
