//! SpendWise CLI - Personal finance tracker
//!
//! Usage:
//!   spendwise suggest "Coffee with a friend"   Suggest a budget category
//!   spendwise dashboard                        Show the sample dashboard
//!   spendwise ai test                          Test the AI backend
//!   spendwise serve --port 3000                Start web server

mod cli;
mod commands;


use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Suggest {
            description,
            model,
            timeout,
            json,
        } => {
            commands::cmd_suggest(
                &description.join(" "),
                model.as_deref(),
                Duration::from_secs(timeout),
                json,
            )
            .await
        }
        Commands::Categories => commands::cmd_categories(),
        Commands::Dashboard => commands::cmd_dashboard(),
        Commands::Ai { action } => match action {
            AiAction::Test { description } => commands::cmd_ai_test(description.as_deref()).await,
        },
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
        } => commands::cmd_serve(&host, port, static_dir.as_deref(), allowed_origins).await,
    }
}
