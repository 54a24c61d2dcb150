//! CLI command definitions and dispatch for the `recall` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod memory;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with an assistant that remembers you.
#[derive(Parser)]
#[command(name = "recall", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the memory index, embedding model cache, and
    /// config.toml. Overrides the config file's data_dir.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Show memory recall and formation detail inline.
        #[arg(long, short = 'V')]
        verbose: bool,
    },

    /// Browse stored memories.
    #[command(alias = "ls")]
    Memories {
        /// Maximum number of memories to show.
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Manually store a fact in memory.
    Remember {
        /// The fact to remember.
        fact: String,
    },

    /// Delete a memory by ID, or all memories.
    Forget {
        /// Memory ID to delete.
        id: Option<String>,

        /// Wipe all memories.
        #[arg(long)]
        all: bool,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
