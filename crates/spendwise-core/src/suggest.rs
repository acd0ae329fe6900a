//! Category suggestion policy
//!
//! Wraps an [`AIBackend`] with input validation and a whitelist-and-fallback
//! step. The backend's label is untrusted: anything outside the taxonomy is
//! replaced by `Other` and reported as adjusted.
//!
//! The policy is pure decision logic. Busy flags, request tokens and user
//! notices live in [`crate::form`].

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::ai::AIBackend;
use crate::categories::Category;
use crate::error::Error;

/// Failure modes of a suggestion request
#[derive(Error, Debug)]
pub enum SuggestionError {
    /// Description was empty or whitespace; the backend was not called
    #[error("Description is required to suggest a category.")]
    EmptyDescription,

    /// The backend failed (transport, timeout, or malformed response)
    #[error("Failed to get category suggestion from AI.")]
    Unavailable(#[source] Error),
}

/// Validated outcome of a suggestion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SuggestionOutcome {
    /// Backend label is a taxonomy member
    Matched { category: Category, confidence: f64 },
    /// Backend label was outside the taxonomy and replaced by `Other`
    Fallback {
        raw_suggestion: String,
        confidence: f64,
    },
}

impl SuggestionOutcome {
    /// Category to write into the form
    pub fn category(&self) -> Category {
        match self {
            Self::Matched { category, .. } => *category,
            Self::Fallback { .. } => Category::Other,
        }
    }

    /// Whether the backend's label was replaced
    pub fn was_adjusted(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// The label exactly as the backend produced it
    pub fn suggested_label(&self) -> &str {
        match self {
            Self::Matched { category, .. } => category.as_str(),
            Self::Fallback { raw_suggestion, .. } => raw_suggestion,
        }
    }

    /// Backend confidence in [0, 1]
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Matched { confidence, .. } | Self::Fallback { confidence, .. } => *confidence,
        }
    }
}

/// Suggest a category for a pending transaction form
///
/// Fails with [`SuggestionError::EmptyDescription`] without calling the backend
/// when `description` is blank. Otherwise calls the backend exactly once with
/// the trimmed description.
///
/// Results are not idempotent: the backend is non-deterministic, so two calls
/// with the same description may return different categories.
pub async fn suggest_category_for_form<B>(
    backend: &B,
    description: &str,
) -> Result<SuggestionOutcome, SuggestionError>
where
    B: AIBackend + ?Sized,
{
    let description = description.trim();
    if description.is_empty() {
        return Err(SuggestionError::EmptyDescription);
    }

    let suggestion = match backend.suggest_category(description).await {
        Ok(s) => s,
        Err(e) => {
            warn!(
                error = %e,
                host = backend.host(),
                model = backend.model(),
                "Category suggestion failed"
            );
            return Err(SuggestionError::Unavailable(e));
        }
    };

    let outcome = match Category::from_label(&suggestion.suggested_category) {
        Some(category) => SuggestionOutcome::Matched {
            category,
            confidence: suggestion.confidence,
        },
        None => SuggestionOutcome::Fallback {
            raw_suggestion: suggestion.suggested_category,
            confidence: suggestion.confidence,
        },
    };

    if outcome.was_adjusted() {
        warn!(
            suggested = outcome.suggested_label(),
            confidence = outcome.confidence(),
            "Suggested category outside taxonomy, using Other"
        );
    } else {
        info!(
            category = %outcome.category(),
            confidence = outcome.confidence(),
            "Category suggested"
        );
    }

    Ok(outcome)
}

/// [`suggest_category_for_form`] bounded by a caller-side timeout
///
/// An elapsed timeout is reported as `Unavailable(Error::Timeout)`, the same
/// as a backend that timed out on its own.
pub async fn suggest_with_timeout<B>(
    backend: &B,
    description: &str,
    timeout: Duration,
) -> Result<SuggestionOutcome, SuggestionError>
where
    B: AIBackend + ?Sized,
{
    match tokio::time::timeout(timeout, suggest_category_for_form(backend, description)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "Category suggestion timed out");
            Err(SuggestionError::Unavailable(Error::Timeout(timeout)))
        }
    }
}

/// Owned wrapper binding the policy to one backend
#[derive(Clone)]
pub struct CategorySuggester<B> {
    backend: B,
}

impl<B: AIBackend> CategorySuggester<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// See [`suggest_category_for_form`]
    pub async fn suggest(&self, description: &str) -> Result<SuggestionOutcome, SuggestionError> {
        suggest_category_for_form(&self.backend, description).await
    }

    /// See [`suggest_with_timeout`]
    pub async fn suggest_with_timeout(
        &self,
        description: &str,
        timeout: Duration,
    ) -> Result<SuggestionOutcome, SuggestionError> {
        suggest_with_timeout(&self.backend, description, timeout).await
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;

    #[tokio::test]
    async fn test_member_category_unchanged() {
        let backend = MockBackend::replying("Dining Out", 0.82);
        let outcome = suggest_category_for_form(&backend, "Coffee with a friend")
            .await
            .unwrap();

        assert_eq!(outcome.category(), Category::DiningOut);
        assert!(!outcome.was_adjusted());
        assert_eq!(outcome.confidence(), 0.82);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_out_of_taxonomy_falls_back_to_other() {
        let backend = MockBackend::replying("Spacecraft", 0.4);
        let outcome = suggest_category_for_form(&backend, "Bought a spaceship")
            .await
            .unwrap();

        assert_eq!(outcome.category(), Category::Other);
        assert!(outcome.was_adjusted());
        assert_eq!(outcome.suggested_label(), "Spacecraft");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_case_mismatch_is_adjusted() {
        let backend = MockBackend::replying("groceries", 0.7);
        let outcome = suggest_category_for_form(&backend, "Milk and eggs")
            .await
            .unwrap();
        assert_eq!(outcome.category(), Category::Other);
        assert!(outcome.was_adjusted());
    }

    #[tokio::test]
    async fn test_backend_returning_other_is_not_adjusted() {
        let backend = MockBackend::replying("Other", 0.3);
        let outcome = suggest_category_for_form(&backend, "Misc").await.unwrap();
        assert_eq!(outcome.category(), Category::Other);
        assert!(!outcome.was_adjusted());
    }

    #[tokio::test]
    async fn test_empty_description_never_calls_backend() {
        let backend = MockBackend::new();
        for description in ["", "   ", "\t\n"] {
            let err = suggest_category_for_form(&backend, description)
                .await
                .unwrap_err();
            assert!(matches!(err, SuggestionError::EmptyDescription));
        }
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_is_unavailable() {
        let backend = MockBackend::failing("timed out");
        let err = suggest_category_for_form(&backend, "Coffee")
            .await
            .unwrap_err();

        match err {
            SuggestionError::Unavailable(Error::Backend(msg)) => assert_eq!(msg, "timed out"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_suggester_wrapper() {
        let suggester = CategorySuggester::new(MockBackend::new());
        let outcome = suggester.suggest("  Weekly grocery shopping  ").await.unwrap();
        assert_eq!(outcome.category(), Category::Groceries);
        assert_eq!(suggester.backend().calls(), 1);
    }

    #[tokio::test]
    async fn test_suggest_with_timeout_elapsed() {
        let backend = MockBackend::new().with_delay(Duration::from_millis(500));
        let err = suggest_with_timeout(&backend, "Coffee", Duration::from_millis(20))
            .await
            .unwrap_err();

        match err {
            SuggestionError::Unavailable(Error::Timeout(d)) => {
                assert_eq!(d, Duration::from_millis(20))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_suggester_with_timeout_in_time() {
        let suggester = CategorySuggester::new(MockBackend::replying("Rent", 0.95));
        let outcome = suggester
            .suggest_with_timeout("Apartment Rent", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(outcome.category(), Category::Rent);

        let err = suggester
            .suggest_with_timeout(" ", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, SuggestionError::EmptyDescription));
        assert_eq!(suggester.backend().calls(), 1);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = SuggestionOutcome::Fallback {
            raw_suggestion: "Spacecraft".into(),
            confidence: 0.4,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "fallback");
        assert_eq!(json["raw_suggestion"], "Spacecraft");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SuggestionError::EmptyDescription.to_string(),
            "Description is required to suggest a category."
        );
        let err = SuggestionError::Unavailable(Error::Backend("x".into()));
        assert_eq!(err.to_string(), "Failed to get category suggestion from AI.");
        assert!(std::error::Error::source(&err).is_some());
    }
}
