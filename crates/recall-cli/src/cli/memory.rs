//! Memory management CLI commands: list, remember, forget.
//!
//! Provides memory browsing, manual injection, individual deletion, and
//! full wipe with confirmation.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use recall_types::memory::{MemoryCategory, MemoryRecord};

use crate::state::AppState;

/// List stored memories, newest first.
///
/// # Examples
///
/// ```bash
/// recall memories
/// recall memories --limit 10 --json
/// ```
pub async fn list_memories(state: &AppState, limit: usize, json: bool) -> Result<()> {
    let records = state.store.list_recent(limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!(
            "  {} No memories yet. They are formed from conversations, or add one with `recall remember`.",
            style("i").blue().bold(),
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Content").fg(Color::White),
        Cell::new("Category").fg(Color::White),
        Cell::new("Date").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for record in &records {
        let content_display = if record.content.len() > 60 {
            format!("{}...", &record.content[..57])
        } else {
            record.content.clone()
        };

        let category_cell = match record.category {
            Some(MemoryCategory::CoreBio) => Cell::new("core_bio").fg(Color::Cyan),
            Some(MemoryCategory::Event) => Cell::new("event").fg(Color::Yellow),
            Some(MemoryCategory::WorkProject) => Cell::new("work_project").fg(Color::Magenta),
            None => Cell::new("untyped").fg(Color::DarkGrey),
        };

        let date = record
            .timestamp
            .split('T')
            .next()
            .unwrap_or(&record.timestamp)
            .to_string();

        let id = record
            .id
            .as_deref()
            .map(|id| id[..8.min(id.len())].to_string())
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(content_display).fg(Color::White),
            category_cell,
            Cell::new(date).fg(Color::DarkGrey),
            Cell::new(id).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} memor{}",
        style(records.len()).bold(),
        if records.len() == 1 { "y" } else { "ies" }
    );
    println!();

    Ok(())
}

/// Manually store a fact in memory.
pub async fn remember(state: &AppState, fact: &str, json: bool) -> Result<()> {
    let record = MemoryRecord::new(fact, Some(MemoryCategory::CoreBio));
    let stored = state.store.store(&record).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stored)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Remembered: {}",
        style("*").cyan().bold(),
        style(&stored.content).dim()
    );
    println!();

    Ok(())
}

/// Delete a memory by ID, or wipe all memories.
pub async fn forget(state: &AppState, id: Option<&str>, all: bool, force: bool) -> Result<()> {
    if all {
        let count = state.store.count().await?;
        if count == 0 {
            println!();
            println!("  {} Nothing to forget.", style("i").blue().bold());
            println!();
            return Ok(());
        }

        if !force {
            let confirmed = Confirm::new()
                .with_prompt(format!("Delete all {count} memories? This cannot be undone"))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("  Cancelled.");
                return Ok(());
            }
        }

        let deleted = state.store.forget_all().await?;
        println!();
        println!(
            "  {} Forgot {} memor{}.",
            style("*").cyan().bold(),
            deleted,
            if deleted == 1 { "y" } else { "ies" }
        );
        println!();
        return Ok(());
    }

    let Some(id) = id else {
        anyhow::bail!("Provide a memory ID, or --all to wipe everything");
    };

    // Short IDs from the listing are resolved against the full set.
    let full_id = if id.len() < 36 {
        state
            .store
            .list_recent(usize::MAX)
            .await?
            .into_iter()
            .filter_map(|r| r.id)
            .find(|full| full.starts_with(id))
            .ok_or_else(|| anyhow::anyhow!("No memory with ID prefix '{id}'"))?
    } else {
        id.to_string()
    };

    state.store.forget(&full_id).await?;
    println!();
    println!("  {} Memory forgotten.", style("*").cyan().bold());
    println!();

    Ok(())
}
