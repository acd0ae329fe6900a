//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `suggest` - Category suggestion and taxonomy listing
//! - `dashboard` - Ledger summary over the sample data
//! - `ai` - AI backend connection test
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command

pub mod ai;
pub mod dashboard;
pub mod prompts;
pub mod serve;
pub mod suggest;

// Re-export command functions for main.rs
pub use ai::*;
pub use dashboard::*;
pub use prompts::*;
pub use serve::*;
pub use suggest::*;

use anyhow::{anyhow, Result};
use spendwise_core::AIClient;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// AI client from the environment, or an error explaining how to configure one
pub fn require_ai() -> Result<AIClient> {
    AIClient::from_env().ok_or_else(|| {
        anyhow!(
            "AI backend not configured. Set OLLAMA_HOST (or AI_BACKEND=openai_compatible with OPENAI_COMPATIBLE_HOST)"
        )
    })
}
