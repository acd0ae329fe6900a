//! Test utilities for spendwise-core
//!
//! This module provides a mock LLM server speaking both the Ollama and the
//! OpenAI-compatible wire formats, for development and integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::ai::heuristic_suggestion;

/// How the mock server answers suggestion requests
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Keyword heuristics over the description found in the prompt
    Heuristic,
    /// Return this text verbatim as the model output
    Raw(String),
    /// Fail every generation request with this HTTP status
    Status(u16),
    /// Answer heuristically after sleeping
    Slow(Duration),
}

/// Mock LLM server for testing and development
pub struct MockOllamaServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOllamaServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::start_with(MockMode::Heuristic).await
    }

    /// Start the mock server with scripted behavior
    pub async fn start_with(mode: MockMode) -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(Arc::new(mode));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .ok();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOllamaServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Produce the model output for a prompt, or an HTTP failure
async fn model_output(mode: &MockMode, prompt: &str) -> Result<String, StatusCode> {
    match mode {
        MockMode::Heuristic => Ok(heuristic_output(prompt)),
        MockMode::Raw(text) => Ok(text.clone()),
        MockMode::Status(code) => {
            Err(StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
        }
        MockMode::Slow(delay) => {
            tokio::time::sleep(*delay).await;
            Ok(heuristic_output(prompt))
        }
    }
}

fn heuristic_output(prompt: &str) -> String {
    let description = extract_description_from_prompt(prompt);
    serde_json::to_string(&heuristic_suggestion(&description)).unwrap_or_default()
}

/// Extract the transaction description from the rendered prompt
///
/// Matches the `Transaction Description: "{{description}}"` line of
/// prompts/suggest_category.md.
fn extract_description_from_prompt(prompt: &str) -> String {
    const MARKER: &str = "Transaction Description: \"";
    if let Some(start) = prompt.find(MARKER) {
        let after_start = &prompt[start + MARKER.len()..];
        if let Some(end) = after_start.find('"') {
            return after_start[..end].to_string();
        }
    }
    String::new()
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
            modified_at: "2024-01-01T00:00:00Z".to_string(),
            size: 2_000_000_000,
        }],
    })
}

/// Ollama generate endpoint
async fn handle_generate(
    State(mode): State<Arc<MockMode>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    match model_output(&mode, &request.prompt).await {
        Ok(response) => Json(GenerateResponse {
            model: request.model,
            response,
            done: true,
        })
        .into_response(),
        Err(status) => (status, "mock generation failure").into_response(),
    }
}

/// OpenAI models endpoint (health check)
async fn handle_models() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "object": "list",
        "data": [{"id": "mock-model", "object": "model"}]
    }))
}

/// OpenAI chat completions endpoint
async fn handle_chat(
    State(mode): State<Arc<MockMode>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let prompt = request
        .messages
        .iter()
        .filter(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    match model_output(&mode, &prompt).await {
        Ok(content) => Json(serde_json::json!({
            "model": request.model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        Err(status) => (status, "mock completion failure").into_response(),
    }
}

// Request/Response types for the mock server

#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
    modified_at: String,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[allow(dead_code)]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AIBackend, OllamaBackend, OpenAICompatibleBackend};
    use crate::categories::Category;
    use crate::config::SuggestConfig;
    use crate::error::Error;
    use crate::form::{suggest_into_field, Notice, PendingCategoryField, DEFAULT_SUGGEST_TIMEOUT};
    use crate::prompts::PromptLibrary;
    use crate::suggest::{suggest_category_for_form, SuggestionError};

    fn ollama(server: &MockOllamaServer) -> OllamaBackend {
        OllamaBackend::with_config(&server.url(), "test-model", SuggestConfig::default())
            .with_prompts(PromptLibrary::embedded_only())
    }

    fn openai(server: &MockOllamaServer) -> OpenAICompatibleBackend {
        OpenAICompatibleBackend::with_config(&server.url(), "test-model", SuggestConfig::default())
            .with_prompts(PromptLibrary::embedded_only())
    }

    #[test]
    fn test_extract_description() {
        let prompt = "Intro\nTransaction Description: \"Coffee with a friend\"\nMore";
        assert_eq!(extract_description_from_prompt(prompt), "Coffee with a friend");
        assert_eq!(extract_description_from_prompt("nothing here"), "");
    }

    #[tokio::test]
    async fn test_mock_server_health_check() {
        let server = MockOllamaServer::start().await;
        assert!(ollama(&server).health_check().await);
        assert!(openai(&server).health_check().await);
    }

    #[tokio::test]
    async fn test_ollama_suggests_dining_out() {
        let server = MockOllamaServer::start().await;
        let result = ollama(&server)
            .suggest_category("Coffee with a friend")
            .await
            .unwrap();
        assert_eq!(result.suggested_category, "Dining Out");
        assert_eq!(result.confidence, 0.82);
    }

    #[tokio::test]
    async fn test_openai_compatible_suggests_groceries() {
        let server = MockOllamaServer::start().await;
        let result = openai(&server)
            .suggest_category("Weekly grocery shopping")
            .await
            .unwrap();
        assert_eq!(result.suggested_category, "Groceries");
    }

    #[tokio::test]
    async fn test_out_of_taxonomy_falls_back_over_http() {
        let server = MockOllamaServer::start_with(MockMode::Raw(
            r#"{"suggestedCategory": "Spacecraft", "confidence": 0.4}"#.into(),
        ))
        .await;
        let outcome = suggest_category_for_form(&ollama(&server), "Bought a spaceship")
            .await
            .unwrap();
        assert_eq!(outcome.category(), Category::Other);
        assert!(outcome.was_adjusted());
        assert_eq!(outcome.suggested_label(), "Spacecraft");
    }

    #[tokio::test]
    async fn test_prose_around_json_is_accepted() {
        let server = MockOllamaServer::start_with(MockMode::Raw(
            "Sure! {\"suggestedCategory\": \"Rent\", \"confidence\": 0.95} Hope that helps.".into(),
        ))
        .await;
        let result = ollama(&server).suggest_category("Apartment Rent").await.unwrap();
        assert_eq!(result.suggested_category, "Rent");
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_is_unavailable() {
        let server = MockOllamaServer::start_with(MockMode::Raw(
            r#"{"suggestedCategory": "Rent", "confidence": 1.7}"#.into(),
        ))
        .await;
        let err = suggest_category_for_form(&ollama(&server), "Apartment Rent")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SuggestionError::Unavailable(Error::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_output_is_invalid_data() {
        let server = MockOllamaServer::start_with(MockMode::Raw("I cannot help with that".into())).await;
        let err = openai(&server).suggest_category("Coffee").await.unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_backend_error() {
        let server = MockOllamaServer::start_with(MockMode::Status(500)).await;
        let err = ollama(&server).suggest_category("Coffee").await.unwrap_err();
        match err {
            Error::Backend(msg) => assert!(msg.contains("500")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_backend_timeout() {
        let server = MockOllamaServer::start_with(MockMode::Slow(Duration::from_secs(2))).await;
        let config = SuggestConfig {
            timeout: Duration::from_millis(100),
            temperature: 0.1,
        };
        let backend = OllamaBackend::with_config(&server.url(), "test-model", config)
            .with_prompts(PromptLibrary::embedded_only());
        let err = backend.suggest_category("Coffee").await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }

    #[tokio::test]
    async fn test_form_round_trip_over_http() {
        let server = MockOllamaServer::start().await;
        let mut field = PendingCategoryField::new();
        let notice = suggest_into_field(
            &mut field,
            &ollama(&server),
            "Coffee with a friend",
            DEFAULT_SUGGEST_TIMEOUT,
        )
        .await
        .unwrap();

        assert_eq!(field.value(), "Dining Out");
        assert_ne!(notice, Notice::failed());
    }
}
