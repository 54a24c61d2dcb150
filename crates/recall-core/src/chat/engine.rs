//! Chat execution engine.
//!
//! `ChatEngine` coordinates the LLM call: assembles the `CompletionRequest`
//! from the conversation history, system prompt, and chat configuration,
//! then sends it through `BoxLlmProvider`. Every call runs inside a
//! `gen_ai.*` tracing span.

use tracing::{Instrument, info_span};

use recall_types::config::ChatConfig;
use recall_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message, MessageRole};

use crate::llm::box_provider::BoxLlmProvider;

use super::conversation::Conversation;

/// Executes chat LLM calls.
pub struct ChatEngine {
    provider: BoxLlmProvider,
    config: ChatConfig,
}

impl ChatEngine {
    /// Create a new engine with the given provider and chat settings.
    pub fn new(provider: BoxLlmProvider, config: ChatConfig) -> Self {
        Self { provider, config }
    }

    /// The provider behind this engine, for utility calls such as memory
    /// formation that share the same backend.
    pub fn provider(&self) -> &BoxLlmProvider {
        &self.provider
    }

    /// The model identifier this engine sends requests to.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Generate a reply to the user's message.
    ///
    /// The caller is responsible for adding the user message and the reply
    /// to the conversation afterwards; this method does not mutate history.
    pub async fn reply(
        &self,
        conversation: &Conversation,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<CompletionResponse, LlmError> {
        let mut messages = conversation.build_messages();
        messages.push(Message {
            role: MessageRole::User,
            content: user_message.to_string(),
        });

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages,
            system: Some(system_prompt.to_string()),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            stop_sequences: None,
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
        );

        self.provider.complete(&request).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::LlmProvider;
    use recall_types::llm::{StopReason, Usage};

    /// Provider echoing the shape of the request it received.
    ///
    /// Encodes message count, system prompt, and last message into the
    /// response content so tests can assert on the assembled request.
    struct EchoProvider;

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let last = request
                .messages
                .last()
                .map(|m| m.content.as_str())
                .unwrap_or("");
            Ok(CompletionResponse {
                id: "msg_test".to_string(),
                content: format!(
                    "messages={} system={} last={last}",
                    request.messages.len(),
                    request.system.as_deref().unwrap_or("")
                ),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            })
        }
    }

    #[tokio::test]
    async fn test_reply_builds_request_from_history_and_config() {
        let engine = ChatEngine::new(BoxLlmProvider::new(EchoProvider), ChatConfig::default());

        let mut conversation = Conversation::new();
        conversation.add_assistant_message("Hello, how are you?".to_string());

        let response = engine
            .reply(&conversation, "<persona>test</persona>", "Doing well!")
            .await
            .unwrap();

        // History (1) + the current user message (1)
        assert!(response.content.contains("messages=2"));
        assert!(response.content.contains("system=<persona>test</persona>"));
        assert!(response.content.contains("last=Doing well!"));
        assert_eq!(response.model, engine.model());
    }

    #[tokio::test]
    async fn test_reply_does_not_mutate_history() {
        let engine = ChatEngine::new(BoxLlmProvider::new(EchoProvider), ChatConfig::default());

        let conversation = Conversation::new();
        engine
            .reply(&conversation, "system", "first message")
            .await
            .unwrap();

        assert!(conversation.build_messages().is_empty());
    }
}
