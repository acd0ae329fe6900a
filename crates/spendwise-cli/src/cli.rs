//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SpendWise - Track spending and let a local model file it for you
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(about = "Personal finance tracker with AI category suggestions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Suggest a budget category for a transaction description
    Suggest {
        /// Transaction description (multiple words are joined)
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,

        /// Override the model for this request
        #[arg(short, long)]
        model: Option<String>,

        /// Give up after this many seconds
        #[arg(short, long, default_value = "10")]
        timeout: u64,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the budget categories
    Categories,

    /// Show the sample dashboard (balance, spending, goals, transactions)
    Dashboard,

    /// Test the AI backend connection
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },

    /// Manage AI prompts (list, show, customize)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory of static files to serve (e.g. built frontend)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allow cross-origin requests from this origin (repeatable)
        #[arg(long = "allowed-origin")]
        allowed_origins: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum AiAction {
    /// Check backend health and run sample suggestions
    Test {
        /// Test with a specific transaction description
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., suggest_category)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
