//! AI backend command implementations

use std::time::Duration;

use anyhow::Result;
use spendwise_core::{AIBackend, DEFAULT_SUGGEST_TIMEOUT};

use super::{require_ai, suggest_with};

/// Descriptions used when none is given
pub const SAMPLE_DESCRIPTIONS: &[&str] = &[
    "Coffee with a friend",
    "Weekly grocery shopping",
    "Apartment Rent",
    "Electricity Bill",
    "Gas for car",
    "Bought a spaceship",
];

/// Test the configured AI backend and run sample suggestions
pub async fn cmd_ai_test(description: Option<&str>) -> Result<()> {
    println!("🔍 Testing AI backend...\n");

    let client = require_ai()?;
    println!("  Backend: {}", client.kind());
    println!("  Host:    {}", client.host());
    println!("  Model:   {}\n", client.model());

    run_ai_test(&client, description, DEFAULT_SUGGEST_TIMEOUT).await?;
    Ok(())
}

/// Health check plus one suggestion per description
///
/// Returns the number of descriptions that were categorized.
pub async fn run_ai_test<B>(
    backend: &B,
    description: Option<&str>,
    timeout: Duration,
) -> Result<usize>
where
    B: AIBackend + ?Sized,
{
    print!("Checking availability... ");
    if backend.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach the AI backend at {}", backend.host());
        println!("\nTo set up Ollama:");
        println!("  1. Install Ollama: https://ollama.ai/download");
        println!("  2. Start the server: ollama serve");
        println!("  3. Pull the model: ollama pull {}", backend.model());
        println!("  4. Set environment variable: export OLLAMA_HOST=http://localhost:11434");
        return Ok(0);
    }

    let descriptions: Vec<&str> = match description {
        Some(d) => vec![d],
        None => SAMPLE_DESCRIPTIONS.to_vec(),
    };

    println!("\n📋 Testing category suggestions...\n");

    let mut succeeded = 0;
    for d in descriptions {
        print!("  \"{}\" → ", d);
        match suggest_with(backend, d, timeout).await {
            Ok(outcome) => {
                succeeded += 1;
                if outcome.was_adjusted() {
                    println!(
                        "{} (model said \"{}\", {:.0}%)",
                        outcome.category(),
                        outcome.suggested_label(),
                        outcome.confidence() * 100.0
                    );
                } else {
                    println!(
                        "{} ({:.0}%)",
                        outcome.category(),
                        outcome.confidence() * 100.0
                    );
                }
            }
            Err(e) => {
                tracing::warn!("Failed to suggest a category for '{}': {:#}", d, e);
                println!("❌ Error: {:#}", e);
            }
        }
    }

    Ok(succeeded)
}
