//! Ollama backend implementation
//!
//! HTTP client for the Ollama `/api/generate` endpoint. Prompts come from the
//! prompt library and request tuning from [`SuggestConfig`].

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SuggestConfig;
use crate::error::{Error, Result};
use crate::prompts::PromptLibrary;

use super::parsing::parse_category_suggestion;
use super::types::CategorySuggestion;
use super::{with_suggest_prompt, AIBackend};

/// Ollama backend
///
/// # Example
///
/// ```rust,ignore
/// export OLLAMA_HOST="http://localhost:11434"
/// export OLLAMA_MODEL="llama3.2"
/// ```
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    default_model: String,
    config: SuggestConfig,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: &str, default_model: &str) -> Self {
        let config = SuggestConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load suggest config, using defaults");
            SuggestConfig::default()
        });
        Self::with_config(base_url, default_model, config)
    }

    /// Create with explicit tuning
    pub fn with_config(base_url: &str, default_model: &str, config: SuggestConfig) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model: default_model.to_string(),
            config,
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Use a specific prompt library (e.g. embedded-only in tests)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create a new instance with a different model
    ///
    /// Used for runtime model override (e.g., user selects a different model for testing)
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            default_model: model.to_string(),
            ..self.clone()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        Some(Self::new(&host, &model))
    }

    /// Request timeout applied to each call
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: &'static str,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl AIBackend for OllamaBackend {
    async fn suggest_category(&self, description: &str) -> Result<CategorySuggestion> {
        let prompt = with_suggest_prompt(&self.prompts, description, |p, vars| {
            p.render_full(vars)
        })?;

        let request = OllamaRequest {
            model: self.default_model.clone(),
            prompt,
            stream: false,
            format: "json",
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        let timeout = self.config.timeout;
        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_request(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!("Ollama error {}: {}", status, body)));
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| Error::from_request(e, timeout))?;
        debug!("Ollama category response: {}", ollama_response.response);

        parse_category_suggestion(&ollama_response.response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.default_model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
