//! AI backend request/response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

/// Request for a category suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    /// Free-text transaction description (missing is treated as empty)
    #[serde(alias = "description", default)]
    pub transaction_description: String,
}

/// Raw category suggestion from a backend
///
/// `suggested_category` is free text chosen by the model and is not guaranteed
/// to be a member of [`crate::Category`]. `confidence` is always within [0, 1]
/// once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySuggestion {
    pub suggested_category: String,
    pub confidence: f64,
}
