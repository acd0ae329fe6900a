//! Integration tests for spendwise-core
//!
//! These tests exercise the full describe → suggest → apply-to-form workflow
//! through the public API.

use std::time::Duration;

use spendwise_core::{
    suggest_category_for_form, suggest_into_field, AIClient, Category, CategorySuggester, Error,
    Ledger, MockBackend, NewTransaction, Notice, NoticeVariant, PendingCategoryField,
    SuggestionError, TransactionKind, DEFAULT_SUGGEST_TIMEOUT,
};

// =============================================================================
// Suggestion Scenarios
// =============================================================================

#[tokio::test]
async fn test_coffee_with_a_friend_is_dining_out() {
    let backend = MockBackend::replying("Dining Out", 0.82);
    let outcome = suggest_category_for_form(&backend, "Coffee with a friend")
        .await
        .expect("suggestion should succeed");

    assert_eq!(outcome.category(), Category::DiningOut);
    assert!(!outcome.was_adjusted());
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_spaceship_falls_back_to_other() {
    let backend = MockBackend::replying("Spacecraft", 0.4);
    let outcome = suggest_category_for_form(&backend, "Bought a spaceship")
        .await
        .expect("suggestion should succeed");

    assert_eq!(outcome.category(), Category::Other);
    assert!(outcome.was_adjusted());
}

#[tokio::test]
async fn test_whitespace_description_is_rejected_before_backend() {
    let backend = MockBackend::new();
    let err = suggest_category_for_form(&backend, "   ")
        .await
        .expect_err("blank description must fail");

    assert!(matches!(err, SuggestionError::EmptyDescription));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_backend_timeout_is_unavailable() {
    let backend = MockBackend::failing("request timed out");
    let err = suggest_category_for_form(&backend, "Groceries at the market")
        .await
        .expect_err("backend failure must surface");

    assert!(matches!(err, SuggestionError::Unavailable(_)));
}

#[tokio::test]
async fn test_every_category_round_trips_unadjusted() {
    for category in Category::all() {
        let backend = MockBackend::replying(category.as_str(), 0.9);
        let outcome = suggest_category_for_form(&backend, "anything")
            .await
            .expect("suggestion should succeed");
        assert_eq!(outcome.category(), *category);
        assert!(!outcome.was_adjusted());
    }
}

#[tokio::test]
async fn test_ai_client_mock_through_suggester() {
    let suggester = CategorySuggester::new(AIClient::mock());
    let outcome = suggester
        .suggest("Monthly Salary")
        .await
        .expect("suggestion should succeed");
    assert_eq!(outcome.category(), Category::Salary);
}

// =============================================================================
// Form Workflow
// =============================================================================

#[tokio::test]
async fn test_form_failure_keeps_manual_choice() {
    let mut field = PendingCategoryField::new();
    field.set("Travel");

    let backend = MockBackend::failing("connection refused");
    let notice = suggest_into_field(&mut field, &backend, "Hotel in Rome", DEFAULT_SUGGEST_TIMEOUT)
        .await
        .expect("field was idle");

    assert_eq!(notice, Notice::failed());
    assert_eq!(notice.variant, NoticeVariant::Destructive);
    assert_eq!(field.value(), "Travel");
    assert!(!field.is_busy());
}

#[tokio::test]
async fn test_form_caller_timeout() {
    let mut field = PendingCategoryField::new();
    let backend = MockBackend::new().with_delay(Duration::from_secs(5));

    let notice = suggest_into_field(&mut field, &backend, "Coffee", Duration::from_millis(50))
        .await
        .expect("field was idle");

    assert_eq!(notice, Notice::failed());
    assert_eq!(field.value(), "");
}

#[tokio::test]
async fn test_suggested_category_feeds_ledger() {
    let mut field = PendingCategoryField::new();
    let backend = MockBackend::new();
    suggest_into_field(
        &mut field,
        &backend,
        "Weekly grocery shopping",
        DEFAULT_SUGGEST_TIMEOUT,
    )
    .await
    .expect("field was idle");

    let mut ledger = Ledger::with_sample_data();
    let before = ledger.summary().total_expenses;
    ledger
        .add_transaction(NewTransaction {
            kind: TransactionKind::Expense,
            amount: 64.25,
            category: field.value().to_string(),
            description: "Weekly grocery shopping".into(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 7, 17).expect("valid date"),
        })
        .expect("valid transaction");

    let groceries = ledger
        .spending_by_category()
        .into_iter()
        .find(|s| s.category == "Groceries")
        .expect("groceries present");
    assert!((groceries.amount - 139.75).abs() < 1e-9);
    assert!((ledger.summary().total_expenses - before - 64.25).abs() < 1e-9);
}

#[test]
fn test_ledger_delete_missing_is_not_found() {
    let mut ledger = Ledger::new();
    assert!(matches!(ledger.delete_transaction(42), Err(Error::NotFound(_))));
}

// =============================================================================
// Mock HTTP Server (requires --features test-utils)
// =============================================================================

#[cfg(feature = "test-utils")]
mod http {
    use spendwise_core::test_utils::{MockMode, MockOllamaServer};
    use spendwise_core::{
        suggest_category_for_form, AIBackend, Category, OllamaBackend, PromptLibrary,
        SuggestConfig,
    };

    fn backend(server: &MockOllamaServer) -> OllamaBackend {
        OllamaBackend::with_config(&server.url(), "llama3.2", SuggestConfig::default())
            .with_prompts(PromptLibrary::embedded_only())
    }

    #[tokio::test]
    async fn test_end_to_end_over_ollama_wire() {
        let server = MockOllamaServer::start().await;
        let backend = backend(&server);
        assert!(backend.health_check().await);

        let outcome = suggest_category_for_form(&backend, "Electricity Bill")
            .await
            .expect("suggestion should succeed");
        assert_eq!(outcome.category(), Category::Utilities);
    }

    #[tokio::test]
    async fn test_fallback_over_ollama_wire() {
        let server = MockOllamaServer::start_with(MockMode::Raw(
            r#"{"suggestedCategory": "Pets", "confidence": 0.6}"#.into(),
        ))
        .await;
        let outcome = suggest_category_for_form(&backend(&server), "Dog food")
            .await
            .expect("suggestion should succeed");
        assert_eq!(outcome.category(), Category::Other);
        assert_eq!(outcome.suggested_label(), "Pets");
    }
}
