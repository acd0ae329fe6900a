//! SpendWise Core Library
//!
//! Shared functionality for the SpendWise personal finance tracker:
//! - Budget category taxonomy
//! - Pluggable local AI backends (Ollama, OpenAI-compatible servers)
//! - Category suggestion policy with taxonomy fallback
//! - Pending form glue (busy flag, request tokens, user notices)
//! - In-memory ledger with balance summary and savings goals
//! - Prompt library for customizable AI prompts

pub mod ai;
pub mod categories;
pub mod config;
pub mod error;
pub mod form;
pub mod ledger;
pub mod models;
pub mod prompts;
pub mod suggest;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIBackend, AIClient, CategorySuggestion, MockBackend, OllamaBackend,
    OpenAICompatibleBackend, SuggestionRequest,
};
pub use categories::Category;
pub use config::SuggestConfig;
pub use error::{Error, Result};
pub use form::{
    suggest_into_field, Notice, NoticeVariant, PendingCategoryField, SuggestionTicket,
    DEFAULT_SUGGEST_TIMEOUT,
};
pub use ledger::Ledger;
pub use models::{
    format_currency, BalanceSummary, CategorySpending, Goal, NewTransaction, Transaction,
    TransactionKind,
};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use suggest::{
    suggest_category_for_form, suggest_with_timeout, CategorySuggester, SuggestionError,
    SuggestionOutcome,
};
