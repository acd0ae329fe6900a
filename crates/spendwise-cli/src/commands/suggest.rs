//! Category suggestion command implementations

use std::time::Duration;

use anyhow::{bail, Context, Result};
use spendwise_core::{
    suggest_with_timeout, AIBackend, Category, CategorySuggester, Notice, SuggestionError,
    SuggestionOutcome,
};
use tracing::debug;

use super::require_ai;

/// Suggest a category using the backend configured in the environment
pub async fn cmd_suggest(
    description: &str,
    model: Option<&str>,
    timeout: Duration,
    json: bool,
) -> Result<()> {
    let client = require_ai()?;
    let client = match model {
        Some(m) => client.with_model(m),
        None => client,
    };

    debug!(
        backend = %client.kind(),
        model = client.model(),
        timeout_secs = timeout.as_secs(),
        "Requesting category suggestion"
    );
    let suggester = CategorySuggester::new(client);
    let outcome = into_report(suggester.suggest_with_timeout(description, timeout).await)?;

    if json {
        let value = serde_json::json!({
            "category": outcome.category(),
            "wasAdjusted": outcome.was_adjusted(),
            "suggestedCategory": outcome.suggested_label(),
            "confidence": outcome.confidence(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

/// Run the suggestion policy under a caller timeout
///
/// Failures come back as errors carrying the user-facing notice text.
pub async fn suggest_with<B>(
    backend: &B,
    description: &str,
    timeout: Duration,
) -> Result<SuggestionOutcome>
where
    B: AIBackend + ?Sized,
{
    into_report(suggest_with_timeout(backend, description, timeout).await)
}

/// Turn a policy result into a CLI error carrying the user-facing notice text
fn into_report(
    result: std::result::Result<SuggestionOutcome, SuggestionError>,
) -> Result<SuggestionOutcome> {
    let notice = Notice::for_result(&result);
    match result {
        Ok(outcome) => Ok(outcome),
        Err(SuggestionError::EmptyDescription) => bail!("{}", notice.message),
        Err(SuggestionError::Unavailable(source)) => Err(anyhow::Error::new(source))
            .with_context(|| format!("{}: {}", notice.title, notice.message)),
    }
}

fn print_outcome(outcome: &SuggestionOutcome) {
    let notice = Notice::for_outcome(outcome);
    println!("{}", notice.title);
    println!("  {}", notice.message);
    println!();
    println!("  Category:   {}", outcome.category());
    if outcome.was_adjusted() {
        println!("  Suggested:  {} (not a known category)", outcome.suggested_label());
    }
    println!("  Confidence: {:.0}%", outcome.confidence() * 100.0);
}

/// List the budget categories
pub fn cmd_categories() -> Result<()> {
    println!("Categories:\n");
    for category in Category::all() {
        println!("  {}", category);
    }
    Ok(())
}
