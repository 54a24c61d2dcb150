//! Memory formation via LLM judgment.
//!
//! `MemoryFormation` asks the chat model whether the latest exchange
//! contains anything worth remembering long-term. It is a stateless
//! single-shot decision per turn: the model sees the last user and
//! assistant messages plus the memories already injected this turn, and
//! returns a reasoning trace with zero or more typed records.
//!
//! This is a probabilistic judgment, not a deterministic filter; a
//! malformed response surfaces as a deserialization error to the caller.

use serde::Deserialize;
use tracing::warn;

use recall_types::llm::{CompletionRequest, LlmError, Message, MessageRole};
use recall_types::memory::MemoryRecord;

use crate::llm::box_provider::BoxLlmProvider;

/// System prompt for the memory formation LLM call.
///
/// Instructs the model to keep only information with lasting significance
/// and to answer with the JSON contract parsed below.
const FORMATION_SYSTEM_PROMPT: &str = r#"You identify and preserve truly significant, long-term relevant information about the user from a conversation. You extract only what will remain useful over extended periods and filter out temporary states, trivial events, and time-bound details.

Work through these steps:
1. Analyze both the user's message and the assistant's message for context
2. Look for information with lasting significance:
   - Permanent or long-lasting traits, background, and significant relationships
   - Important biographical details (health conditions, cultural background)
   - Major life events that shape the user's context
   - Work and project facts that would be valuable months from now
3. Filter out information that is:
   - Temporary, time-bound, or a current activity or state
   - A trivial daily event or routine administrative matter
   - Already present in the existing memories shown to you
4. Phrase each kept fact clearly and timelessly, and pick its type

Return a single JSON object with exactly these fields:
- "reasoning": array of 3 to 5 strings walking through your judgment
- "memories": array (possibly empty) of objects with:
  - "content": string (the fact, one self-contained sentence)
  - "memory_type": string (one of: "core_bio", "event", "work_project")

If nothing has lasting significance, return {"reasoning": [...], "memories": []}

Example output:
{
  "reasoning": [
    "The user states a lifelong shellfish allergy, which is permanent health information",
    "The mention of a cold is a temporary state and is excluded",
    "No events or project facts appear in this exchange"
  ],
  "memories": [
    {"content": "User has a severe shellfish allergy and carries an EpiPen", "memory_type": "core_bio"}
  ]
}"#;

/// Raw formation payload as returned by the LLM.
#[derive(Debug, Deserialize)]
struct RawFormation {
    reasoning: Vec<String>,
    #[serde(default)]
    memories: Vec<RawFormedMemory>,
}

/// One formed memory as returned by the LLM before conversion.
#[derive(Debug, Deserialize)]
struct RawFormedMemory {
    content: String,
    memory_type: String,
}

/// The outcome of one formation pass.
#[derive(Debug)]
pub struct FormationOutcome {
    /// The model's reasoning trace, 3-5 steps.
    pub reasoning: Vec<String>,
    /// Records judged worth persisting; may be empty.
    pub records: Vec<MemoryRecord>,
}

/// Stateless utility for judging what an exchange is worth remembering.
pub struct MemoryFormation;

impl MemoryFormation {
    /// Run one formation pass over the latest exchange.
    ///
    /// `existing_context` is the rendered memory table already injected
    /// this turn -- the model's only signal for "already known".
    ///
    /// # Errors
    /// Provider failures and malformed payloads both propagate; the chat
    /// loop treats them as session-fatal.
    #[tracing::instrument(
        name = "memory_formation",
        skip_all,
        fields(model = %model)
    )]
    pub async fn assess(
        provider: &BoxLlmProvider,
        model: &str,
        last_user_msg: &str,
        last_assistant_msg: &str,
        existing_context: &str,
    ) -> Result<FormationOutcome, LlmError> {
        let mut system = FORMATION_SYSTEM_PROMPT.to_string();
        if !existing_context.trim().is_empty() {
            system.push_str("\n\n<existing_memories>\n");
            system.push_str(existing_context.trim());
            system.push_str("\n</existing_memories>");
        }

        let exchange = format!(
            "assistant: {last_assistant_msg}\nuser: {last_user_msg}"
        );

        let request = CompletionRequest {
            model: model.to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: exchange,
            }],
            system: Some(system),
            max_tokens: 2048,
            temperature: Some(0.0),
            stop_sequences: None,
        };

        let response = provider.complete(&request).await?;

        Self::parse(&response.content)
    }

    /// Parse the raw LLM payload into a `FormationOutcome`.
    ///
    /// Entries with an unrecognized `memory_type` become untyped records
    /// rather than being dropped.
    fn parse(raw_content: &str) -> Result<FormationOutcome, LlmError> {
        let trimmed = raw_content.trim();

        let raw: RawFormation = serde_json::from_str(trimmed).map_err(|e| {
            LlmError::Deserialization(format!("memory formation payload did not parse: {e}"))
        })?;

        let records = raw
            .memories
            .into_iter()
            .filter(|m| !m.content.trim().is_empty())
            .map(|m| {
                let category = match m.memory_type.parse() {
                    Ok(category) => Some(category),
                    Err(_) => {
                        warn!(
                            memory_type = %m.memory_type,
                            content = %m.content,
                            "Unknown memory type from LLM; storing untyped"
                        );
                        None
                    }
                };
                MemoryRecord::new(m.content, category)
            })
            .collect();

        Ok(FormationOutcome {
            reasoning: raw.reasoning,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::LlmProvider;
    use recall_types::llm::{CompletionResponse, StopReason, Usage};
    use recall_types::memory::MemoryCategory;

    /// Provider returning a canned response body.
    struct CannedProvider {
        body: String,
    }

    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                id: "msg_test".to_string(),
                content: self.body.clone(),
                model: "test-model".to_string(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }
    }

    #[test]
    fn test_parse_trivial_exchange_yields_no_records() {
        let payload = r#"{
            "reasoning": [
                "The exchange is a routine thanks and acknowledgment",
                "No biographical, event, or project information appears",
                "Nothing here will matter in future conversations"
            ],
            "memories": []
        }"#;

        let outcome = MemoryFormation::parse(payload).unwrap();
        assert_eq!(outcome.reasoning.len(), 3);
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn test_parse_biographical_fact_yields_core_bio_record() {
        let payload = r#"{
            "reasoning": [
                "The user states a lifelong allergy",
                "This is permanent health information",
                "It belongs in core biography"
            ],
            "memories": [
                {"content": "User has a severe shellfish allergy", "memory_type": "core_bio"}
            ]
        }"#;

        let outcome = MemoryFormation::parse(payload).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].category, Some(MemoryCategory::CoreBio));
        assert!(outcome.records[0].content.contains("shellfish allergy"));
        assert!(chrono::DateTime::parse_from_rfc3339(&outcome.records[0].timestamp).is_ok());
    }

    #[test]
    fn test_parse_all_three_categories() {
        let payload = r#"{
            "reasoning": ["a", "b", "c"],
            "memories": [
                {"content": "User grew up trilingual", "memory_type": "core_bio"},
                {"content": "User got engaged to Alex last month", "memory_type": "event"},
                {"content": "User leads Project Aurora at work", "memory_type": "work_project"}
            ]
        }"#;

        let outcome = MemoryFormation::parse(payload).unwrap();
        let categories: Vec<_> = outcome.records.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![
                Some(MemoryCategory::CoreBio),
                Some(MemoryCategory::Event),
                Some(MemoryCategory::WorkProject),
            ]
        );
    }

    #[test]
    fn test_parse_unknown_memory_type_becomes_untyped() {
        let payload = r#"{
            "reasoning": ["a", "b", "c"],
            "memories": [
                {"content": "Some fact", "memory_type": "mystery_kind"}
            ]
        }"#;

        let outcome = MemoryFormation::parse(payload).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.records[0].category.is_none());
    }

    #[test]
    fn test_parse_skips_empty_content() {
        let payload = r#"{
            "reasoning": ["a", "b", "c"],
            "memories": [
                {"content": "   ", "memory_type": "event"},
                {"content": "User ran a marathon", "memory_type": "event"}
            ]
        }"#;

        let outcome = MemoryFormation::parse(payload).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].content, "User ran a marathon");
    }

    #[test]
    fn test_parse_malformed_payload_is_an_error() {
        let result = MemoryFormation::parse("I could not decide what to remember.");
        assert!(matches!(result, Err(LlmError::Deserialization(_))));
    }

    #[test]
    fn test_formation_prompt_contains_contract() {
        assert!(FORMATION_SYSTEM_PROMPT.contains("\"reasoning\""));
        assert!(FORMATION_SYSTEM_PROMPT.contains("\"memories\""));
        assert!(FORMATION_SYSTEM_PROMPT.contains("\"memory_type\""));
        assert!(FORMATION_SYSTEM_PROMPT.contains("core_bio"));
        assert!(FORMATION_SYSTEM_PROMPT.contains("Already present in the existing memories"));
    }

    #[tokio::test]
    async fn test_assess_roundtrip_with_canned_provider() {
        let provider = BoxLlmProvider::new(CannedProvider {
            body: r#"{
                "reasoning": ["The user shared where they work", "That is a lasting project fact", "It is not in existing memories"],
                "memories": [{"content": "User works on quantum cryptography", "memory_type": "work_project"}]
            }"#
            .to_string(),
        });

        let outcome = MemoryFormation::assess(
            &provider,
            "test-model",
            "I work on quantum cryptography these days.",
            "Tell me about your work.",
            "",
        )
        .await
        .unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(
            outcome.records[0].category,
            Some(MemoryCategory::WorkProject)
        );
    }

    #[tokio::test]
    async fn test_assess_propagates_malformed_payload() {
        let provider = BoxLlmProvider::new(CannedProvider {
            body: "no json here".to_string(),
        });

        let result = MemoryFormation::assess(&provider, "test-model", "hi", "hello", "").await;
        assert!(matches!(result, Err(LlmError::Deserialization(_))));
    }
}
