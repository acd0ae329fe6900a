//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - vLLM (http://localhost:8000)
//! - LocalAI (http://localhost:8080)
//! - llama-server / llama.cpp (http://localhost:8080)
//! - Docker Model Runner (http://localhost:12434)
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

use std::sync::{Arc, RwLock};

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

/// OpenAI-compatible backend
///
/// Works with any server implementing the OpenAI `/v1/chat/completions` API.
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    config: SuggestConfig,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        let config = SuggestConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load suggest config, using defaults");
            SuggestConfig::default()
        });
        Self::with_config(base_url, model, config)
    }

    /// Create with explicit tuning
    pub fn with_config(base_url: &str, model: &str, config: SuggestConfig) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            config,
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Send `Authorization: Bearer <api_key>` with every request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Use a specific prompt library (e.g. embedded-only in tests)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Create from environment variables
    ///
    /// Required: `OPENAI_COMPATIBLE_HOST`
    /// Optional: `OPENAI_COMPATIBLE_MODEL` (default: gpt-3.5-turbo)
    /// Optional: `OPENAI_COMPATIBLE_API_KEY`
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OPENAI_COMPATIBLE_HOST").ok()?;
        let model = std::env::var("OPENAI_COMPATIBLE_MODEL")
            .unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let backend = Self::new(&host, &model);
        match std::env::var("OPENAI_COMPATIBLE_API_KEY") {
            Ok(key) if !key.is_empty() => Some(backend.with_api_key(key)),
            _ => Some(backend),
        }
    }

    /// Make a chat completion request
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(self.config.temperature),
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
            stream: false,
        };

        let timeout = self.config.timeout;
        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .timeout(timeout)
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| Error::from_request(e, timeout))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::from_request(e, timeout))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Backend("No response from OpenAI API".into()))
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

/// Structured output hint
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn suggest_category(&self, description: &str) -> Result<CategorySuggestion> {
        let messages = with_suggest_prompt(&self.prompts, description, |p, vars| {
            let mut messages = Vec::with_capacity(2);
            if let Some(system) = p.system_section() {
                messages.push(ChatMessage {
                    role: "system",
                    content: system.to_string(),
                });
            }
            messages.push(ChatMessage {
                role: "user",
                content: p.render_user(vars),
            });
            messages
        })?;

        let response = self.chat_completion(messages).await?;
        debug!("OpenAI-compatible category response: {}", response);

        parse_category_suggestion(&response)
    }

    async fn health_check(&self) -> bool {
        let mut req_builder = self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .timeout(self.config.timeout);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        match req_builder.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_and_host() {
        let client = OpenAICompatibleBackend::with_config(
            "http://localhost:8000/",
            "meta-llama/Llama-3.2-3B-Instruct",
            SuggestConfig::default(),
        );
        assert_eq!(client.model(), "meta-llama/Llama-3.2-3B-Instruct");
        assert_eq!(client.host(), "http://localhost:8000");
        assert_eq!(client.with_model("other").model(), "other");
    }

    #[test]
    fn test_api_key_kept_across_model_switch() {
        let client = OpenAICompatibleBackend::with_config(
            "http://localhost:8000",
            "gpt-3.5-turbo",
            SuggestConfig::default(),
        );
        assert!(client.api_key.is_none());

        let client = client.with_api_key("sk-test").with_model("gpt-4o-mini");
        assert_eq!(client.api_key.as_deref(), Some("sk-test"));
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "m".into(),
            messages: vec![ChatMessage {
                role: "user",
                content: "hi".into(),
            }],
            temperature: None,
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_with_null_content() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
