//! Pluggable AI backend abstraction
//!
//! This module provides a backend-agnostic interface for the category
//! suggestion service.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OllamaBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let ai = AIClient::from_env();
//!
//! if let Some(ref client) = ai {
//!     let result = client.suggest_category("Coffee with a friend").await?;
//!     println!("Category: {}", result.suggested_category);
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (ollama, openai_compatible, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Default model name (default: llama3.2)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod mock;
mod ollama;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

#[cfg(any(test, feature = "test-utils"))]
pub(crate) use mock::heuristic_suggestion;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::categories::Category;
use crate::error::{Error, Result};
use crate::prompts::{Prompt, PromptId, PromptLibrary};

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Suggest a budget category for a transaction description
    ///
    /// Makes exactly one outbound call. Does not validate the description and
    /// does not retry. The returned category is free text and may fall outside
    /// the taxonomy.
    async fn suggest_category(&self, description: &str) -> Result<CategorySuggestion>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// OpenAI-compatible backend (vLLM, LocalAI, llama-server, hosted APIs, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `ollama` (default): Uses OLLAMA_HOST and OLLAMA_MODEL
    /// - `openai_compatible`: Uses OPENAI_COMPATIBLE_HOST and OPENAI_COMPATIBLE_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        match backend.to_lowercase().as_str() {
            "ollama" => OllamaBackend::from_env().map(AIClient::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to ollama");
                OllamaBackend::from_env().map(AIClient::Ollama)
            }
        }
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AIClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::Ollama(b) => AIClient::Ollama(b.with_model(model)),
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }

    /// Short backend kind name for display
    pub fn kind(&self) -> &'static str {
        match self {
            AIClient::Ollama(_) => "ollama",
            AIClient::OpenAICompatible(_) => "openai_compatible",
            AIClient::Mock(_) => "mock",
        }
    }
}

#[async_trait]
impl AIBackend for AIClient {
    async fn suggest_category(&self, description: &str) -> Result<CategorySuggestion> {
        match self {
            AIClient::Ollama(b) => b.suggest_category(description).await,
            AIClient::OpenAICompatible(b) => b.suggest_category(description).await,
            AIClient::Mock(b) => b.suggest_category(description).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

/// Load the suggestion prompt and run `f` over it with the template variables set
fn with_suggest_prompt<T>(
    prompts: &RwLock<PromptLibrary>,
    description: &str,
    f: impl FnOnce(&Prompt, &HashMap<&str, &str>) -> T,
) -> Result<T> {
    let categories = Category::prompt_list();
    let mut library = prompts
        .write()
        .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
    let template = library.get(PromptId::SuggestCategory)?;
    let mut vars = HashMap::new();
    vars.insert("description", description);
    vars.insert("categories", categories.as_str());
    Ok(f(template, &vars))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
        assert_eq!(client.kind(), "mock");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_suggest_category() {
        let client = AIClient::mock();
        let result = client.suggest_category("Weekly grocery shopping").await.unwrap();
        assert_eq!(result.suggested_category, "Groceries");
        assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn test_with_model_ollama() {
        let client = AIClient::ollama("http://localhost:11434", "llama3.2");
        let other = client.with_model("gemma3");
        assert_eq!(client.model(), "llama3.2");
        assert_eq!(other.model(), "gemma3");
        assert_eq!(other.host(), "http://localhost:11434");
    }

    #[test]
    fn test_suggest_prompt_embeds_description_and_taxonomy() {
        let prompts = RwLock::new(PromptLibrary::embedded_only());
        let rendered = with_suggest_prompt(&prompts, "Bought a spaceship", |p, vars| {
            p.render_user(vars)
        })
        .unwrap();
        assert!(rendered.contains("Bought a spaceship"));
        for category in Category::all() {
            assert!(rendered.contains(category.as_str()));
        }
    }
}
