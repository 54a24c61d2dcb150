//! LLM provider abstraction for Recall.
//!
//! `LlmProvider` is the port that concrete backends implement;
//! `BoxLlmProvider` provides type-erased dynamic dispatch over it.

pub mod box_provider;
pub mod provider;
