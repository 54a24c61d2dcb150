//! Shared domain types for Recall.
//!
//! This crate contains the core domain types used across the Recall
//! workspace: memory records and queries, LLM request/response shapes,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
