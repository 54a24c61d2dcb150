//! Business logic and port trait definitions for Recall.
//!
//! This crate defines the "ports" (provider, embedder, and vector index
//! traits) that the infrastructure layer implements, plus the memory and
//! chat orchestration built on them. It depends only on `recall-types` --
//! never on `recall-infra` or any database/HTTP crate.

pub mod chat;
pub mod llm;
pub mod memory;
