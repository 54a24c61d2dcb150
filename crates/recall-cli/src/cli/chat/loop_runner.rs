//! Main chat loop orchestration.
//!
//! Coordinates the complete conversation lifecycle: provider setup,
//! welcome banner, greeting, and the per-turn sequence of memory
//! retrieval, context construction, memory formation, storage, and reply
//! generation.
//!
//! Error discipline follows the memory design: retrieval failures degrade
//! silently inside the store, while store and LLM failures propagate out
//! of this function and end the session.

use std::time::Instant;

use chrono::Utc;
use console::style;
use tracing::{debug, info};

use recall_core::chat::context::TurnContext;
use recall_core::chat::conversation::Conversation;
use recall_core::chat::engine::ChatEngine;
use recall_core::chat::prompt::SystemPromptBuilder;
use recall_core::llm::box_provider::BoxLlmProvider;
use recall_core::memory::formation::MemoryFormation;
use recall_infra::llm::anthropic::AnthropicProvider;
use recall_infra::secret::{API_KEY_VAR, anthropic_api_key};
use recall_types::memory::{MemoryCategory, MemoryQuery, MemoryRecord};

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Opening line printed and seeded into the conversation history.
const GREETING: &str = "Hello, how are you?";

/// Create the LLM provider from the environment credential.
fn create_provider() -> anyhow::Result<BoxLlmProvider> {
    let api_key = anthropic_api_key().ok_or_else(|| {
        anyhow::anyhow!("{API_KEY_VAR} not set. Export it before starting a chat session.")
    })?;
    Ok(BoxLlmProvider::new(AnthropicProvider::new(api_key)))
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState, verbose: bool) -> anyhow::Result<()> {
    let provider = create_provider()?;
    let engine = ChatEngine::new(provider, state.config.chat.clone());
    let renderer = ChatRenderer::new();

    let memory_count = state.store.count().await.unwrap_or(0);
    print_welcome_banner(engine.model(), &state.config.memory.collection, memory_count);

    let mut conversation = Conversation::new();
    conversation.add_assistant_message(GREETING.to_string());
    println!("  {} {}", style("Assistant:").green().bold(), GREETING);
    println!();

    let prompt = format!("  {} ", style("You >").blue().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let event = chat_input.read_line().await;
        let text = match event {
            InputEvent::Eof | InputEvent::Interrupted => {
                println!();
                println!("  {}", style("Conversation ended. Goodbye!").yellow().bold());
                break;
            }
            InputEvent::Message(text) => text,
        };

        if text.is_empty() {
            continue;
        }

        // Slash commands
        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => {
                    commands::print_help();
                    continue;
                }
                ChatCommand::Clear => {
                    chat_input.clear();
                    continue;
                }
                ChatCommand::Exit => {
                    println!();
                    println!("  {}", style("Conversation ended. Goodbye!").yellow().bold());
                    break;
                }
                ChatCommand::Remember(fact) => {
                    let record = MemoryRecord::new(fact, Some(MemoryCategory::CoreBio));
                    let stored = state.store.store(&record).await?;
                    println!();
                    renderer.print_memory_notice(&stored);
                    println!();
                    continue;
                }
                ChatCommand::Unknown(cmd_name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(cmd_name).dim()
                    );
                    continue;
                }
            }
        }

        // Retrieve relevant memories for this turn. Failures inside the
        // store degrade to an empty context.
        let query = MemoryQuery::new(text.clone(), state.config.memory.top_k);
        let records = state.store.query(&query).await;
        debug!(count = records.len(), "Memories retrieved for turn");

        let context = TurnContext::new(records, &state.config.memory, Utc::now());
        if verbose && !context.records().is_empty() {
            println!();
            for record in context.records() {
                println!(
                    "  {} {}",
                    style("recall:").dim(),
                    style(&record.content).dim()
                );
            }
        }

        // Judge the latest exchange for anything worth keeping.
        let last_assistant_msg = conversation
            .last_assistant_message()
            .unwrap_or(GREETING)
            .to_string();
        let spinner = make_spinner("remembering...");
        let assessment = MemoryFormation::assess(
            engine.provider(),
            engine.model(),
            &text,
            &last_assistant_msg,
            &context.render_memory_table(),
        )
        .await;
        spinner.finish_and_clear();
        let assessment = assessment?;

        if verbose {
            for step in &assessment.reasoning {
                println!("  {} {}", style("reason:").dim(), style(step).dim());
            }
        }

        if !assessment.records.is_empty() {
            println!();
            println!("  {}", style("Forming new memories...").dim());
            for record in &assessment.records {
                // A store failure aborts the remaining stores and the turn.
                let stored = state.store.store(record).await?;
                renderer.print_memory_notice(&stored);
            }
            println!();
            info!(count = assessment.records.len(), "Memories stored this turn");
        }

        // Generate the reply with the retrieved context injected.
        let system_prompt = SystemPromptBuilder::build(&context);

        let spinner = make_spinner("thinking...");
        let start_time = Instant::now();
        let response = engine.reply(&conversation, &system_prompt, &text).await;
        spinner.finish_and_clear();
        let response = response?;
        let response_ms = start_time.elapsed().as_millis() as u64;

        conversation.add_user_message(text);
        conversation.add_assistant_message(response.content.clone());

        println!();
        print!("  {} ", style("Assistant:").green().bold());
        let rendered = renderer.render_final(&response.content);
        println!("{}", rendered.trim_end());
        renderer.print_stats_footer(response.usage.output_tokens, response_ms, engine.model());
        println!();
    }

    Ok(())
}

/// A steady-tick spinner with the given message.
fn make_spinner(message: &'static str) -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}
