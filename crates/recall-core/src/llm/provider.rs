//! LlmProvider trait definition.
//!
//! This is the core abstraction that LLM backends implement. Uses RPITIT
//! (native async fn in traits, Rust 2024 edition); implementations live in
//! recall-infra (e.g., `AnthropicProvider`).

use recall_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
