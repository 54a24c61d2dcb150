//! Recall CLI entry point.
//!
//! Binary name: `recall`
//!
//! Parses CLI arguments, initializes the memory stack, then dispatches to
//! the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use console::style;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,recall_cli=debug,recall_core=debug,recall_infra=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "recall", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (config, index, embedding model)
    let state = AppState::init(cli.data_dir.clone()).await?;

    match cli.command {
        Commands::Chat { verbose } => {
            if let Err(e) = cli::chat::run_chat_loop(&state, verbose).await {
                eprintln!();
                eprintln!(
                    "  {} An error occurred: {e}",
                    style("!").red().bold()
                );
                std::process::exit(1);
            }
        }

        Commands::Memories { limit } => {
            cli::memory::list_memories(&state, limit, cli.json).await?;
        }

        Commands::Remember { fact } => {
            cli::memory::remember(&state, &fact, cli.json).await?;
        }

        Commands::Forget { id, all, force } => {
            cli::memory::forget(&state, id.as_deref(), all, force).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
