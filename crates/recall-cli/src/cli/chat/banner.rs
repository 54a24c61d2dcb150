//! Welcome banner display for chat sessions.
//!
//! Prints a styled banner when a chat session starts, showing the model,
//! memory collection, and how many memories are stored.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(model: &str, collection: &str, memory_count: u64) {
    println!();
    println!("  {}", style("Recall").cyan().bold());
    println!(
        "  {}",
        style("A conversation that remembers you.").dim()
    );
    println!();
    println!("  {}  {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {} ({} stored)",
        style("Memory:").bold(),
        style(collection).dim(),
        memory_count
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
