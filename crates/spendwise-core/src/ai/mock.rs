//! Mock backend for testing
//!
//! Provides keyword-based suggestions plus scripted replies and failures.
//! Useful for unit tests and development without a running LLM server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::CategorySuggestion;
use super::AIBackend;

/// Scripted behavior for `suggest_category`
#[derive(Clone, Debug)]
enum MockReply {
    /// Keyword heuristics over the description
    Heuristic,
    /// Always return this suggestion
    Fixed(CategorySuggestion),
    /// Always fail with this message
    Fail(String),
}

/// Mock AI backend for testing
///
/// Returns predictable responses. Clones share one call counter so tests can
/// assert how many times the service was invoked.
#[derive(Clone, Debug)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: MockReply,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: MockReply::Heuristic,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Always answer with the given label and confidence
    pub fn replying(category: &str, confidence: f64) -> Self {
        Self {
            reply: MockReply::Fixed(CategorySuggestion {
                suggested_category: category.to_string(),
                confidence,
            }),
            ..Self::new()
        }
    }

    /// Always fail as if the backend call errored
    pub fn failing(message: &str) -> Self {
        Self {
            reply: MockReply::Fail(message.to_string()),
            ..Self::new()
        }
    }

    /// Wait before answering (for timeout tests)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    /// Number of `suggest_category` calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Simple keyword mapping used by the heuristic reply
pub(crate) fn heuristic_suggestion(description: &str) -> CategorySuggestion {
    let d = description.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| d.contains(w));

    let (category, confidence) = if has(&["grocery", "groceries", "supermarket", "whole foods"]) {
        ("Groceries", 0.93)
    } else if has(&["rent", "landlord", "apartment"]) {
        ("Rent", 0.95)
    } else if has(&["electric", "water bill", "internet", "utility", "gas bill"]) {
        ("Utilities", 0.9)
    } else if has(&["uber", "lyft", "bus", "train", "gas for car", "fuel", "parking"]) {
        ("Transportation", 0.88)
    } else if has(&["coffee", "dinner", "lunch", "restaurant", "takeout"]) {
        ("Dining Out", 0.82)
    } else if has(&["movie", "concert", "netflix", "game"]) {
        ("Entertainment", 0.85)
    } else if has(&["clothes", "shoes", "amazon", "mall"]) {
        ("Shopping", 0.8)
    } else if has(&["flight", "hotel", "airbnb", "vacation"]) {
        ("Travel", 0.87)
    } else if has(&["doctor", "pharmacy", "dentist", "gym"]) {
        ("Health", 0.86)
    } else if has(&["tuition", "course", "textbook"]) {
        ("Education", 0.9)
    } else if has(&["haircut", "salon", "massage"]) {
        ("Personal Care", 0.84)
    } else if has(&["gift", "birthday present"]) {
        ("Gifts", 0.8)
    } else if has(&["stock", "brokerage", "etf"]) {
        ("Investments", 0.83)
    } else if has(&["savings", "emergency fund"]) {
        ("Savings", 0.9)
    } else if has(&["salary", "paycheck", "payroll"]) {
        ("Salary", 0.97)
    } else {
        ("Other", 0.3)
    };

    CategorySuggestion {
        suggested_category: category.to_string(),
        confidence,
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn suggest_category(&self, description: &str) -> Result<CategorySuggestion> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            MockReply::Heuristic => Ok(heuristic_suggestion(description)),
            MockReply::Fixed(suggestion) => Ok(suggestion.clone()),
            MockReply::Fail(message) => Err(Error::Backend(message.clone())),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_heuristic_replies() {
        let mock = MockBackend::new();
        let cases = [
            ("Weekly grocery shopping", "Groceries"),
            ("Apartment Rent", "Rent"),
            ("Electricity Bill", "Utilities"),
            ("Gas for car", "Transportation"),
            ("Coffee with a friend", "Dining Out"),
            ("Monthly Salary", "Salary"),
            ("Something unclassifiable", "Other"),
        ];
        for (description, expected) in cases {
            let result = mock.suggest_category(description).await.unwrap();
            assert_eq!(result.suggested_category, expected, "for {}", description);
        }
        assert_eq!(mock.calls(), cases.len());
    }

    #[tokio::test]
    async fn test_fixed_reply() {
        let mock = MockBackend::replying("Spacecraft", 0.4);
        let result = mock.suggest_category("Bought a spaceship").await.unwrap();
        assert_eq!(result.suggested_category, "Spacecraft");
        assert_eq!(result.confidence, 0.4);
    }

    #[tokio::test]
    async fn test_failing_reply() {
        let mock = MockBackend::failing("connection refused");
        let err = mock.suggest_category("Coffee").await.unwrap_err();
        assert!(matches!(err, Error::Backend(ref m) if m == "connection refused"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_call_counter() {
        let mock = MockBackend::new();
        let clone = mock.with_model("anything");
        clone.suggest_category("Coffee").await.unwrap();
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_unhealthy() {
        assert!(!MockBackend::unhealthy().health_check().await);
        assert!(MockBackend::new().health_check().await);
    }
}
