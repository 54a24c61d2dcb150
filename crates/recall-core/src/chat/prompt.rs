//! System prompt builder for the chat agent.
//!
//! Assembles the system prompt from the assistant persona, behavioral
//! instructions, and the per-turn context blocks (existing memories,
//! current date) using XML tag boundaries for clear section delineation.

use super::context::TurnContext;

/// Builds the chat agent's system prompt.
///
/// Layout:
/// ```text
/// <persona>...</persona>
/// <instructions>...</instructions>
/// <existing_memories>Timestamp | Memory Type | Content ...</existing_memories>
/// <current_date>...</current_date>
/// ```
/// The memory section is omitted when nothing was retrieved.
pub struct SystemPromptBuilder;

impl SystemPromptBuilder {
    /// Build the complete system prompt for one turn.
    pub fn build(context: &TurnContext) -> String {
        let mut sections = Vec::with_capacity(4);

        sections.push(
            "<persona>\n\
            You are a friendly and helpful AI assistant focused on engaging in natural conversation.\n\
            You maintain a helpful and positive tone while providing accurate and relevant information.\n\
            You can discuss various topics but always stay within ethical boundaries.\n\
            </persona>"
                .to_string(),
        );

        sections.push(
            "<instructions>\n\
            Respond in a natural, conversational tone and keep replies clear and concise.\n\
            Weave in relevant facts from your existing memories naturally, without announcing that you remember them.\n\
            Suggest topics directly related to the conversation when it helps the user.\n\
            When uncertain, acknowledge it honestly.\n\
            </instructions>"
                .to_string(),
        );

        let memory_table = context.render_memory_table();
        if !memory_table.is_empty() {
            sections.push(format!(
                "<existing_memories>\n{}</existing_memories>",
                memory_table
            ));
        }

        sections.push(format!(
            "<current_date>\nThe current datetime in the format YYYY-MM-DD HH:MM:SS is {}\n</current_date>",
            context.current_date()
        ));

        sections.join("\n\n")
    }
}
