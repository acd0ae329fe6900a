//! AI suggestion handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};
use spendwise_core::{Category, SuggestionError, SuggestionOutcome, SuggestionRequest};

/// Category suggestion response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySuggestionResponse {
    /// Category to put in the form (a taxonomy member)
    pub category: Category,
    /// True when the model's label was replaced by "Other"
    pub was_adjusted: bool,
    /// Label as the model produced it
    pub suggested_category: String,
    pub confidence: f64,
}

impl From<SuggestionOutcome> for CategorySuggestionResponse {
    fn from(outcome: SuggestionOutcome) -> Self {
        Self {
            category: outcome.category(),
            was_adjusted: outcome.was_adjusted(),
            suggested_category: outcome.suggested_label().to_string(),
            confidence: outcome.confidence(),
        }
    }
}

/// POST /api/suggest-category - Suggest a category for a transaction description
pub async fn suggest_category(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SuggestionRequest>,
) -> Result<Json<CategorySuggestionResponse>, AppError> {
    // Blank input is a client error whether or not a backend is configured
    if request.transaction_description.trim().is_empty() {
        return Err(AppError::bad_request(
            &SuggestionError::EmptyDescription.to_string(),
        ));
    }

    let Some(ref suggester) = state.suggester else {
        return Err(AppError::not_configured("AI backend not configured"));
    };

    match suggester.suggest(&request.transaction_description).await {
        Ok(outcome) => Ok(Json(outcome.into())),
        Err(e @ SuggestionError::EmptyDescription) => Err(AppError::bad_request(&e.to_string())),
        Err(SuggestionError::Unavailable(source)) => Err(AppError::unavailable(
            "Failed to get category suggestion from AI.",
            source,
        )),
    }
}
