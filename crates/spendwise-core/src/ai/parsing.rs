//! JSON parsing helpers for AI backend responses
//!
//! Models often wrap the JSON payload in extra text, so these helpers locate the
//! first balanced JSON object before deserializing.

use crate::error::{Error, Result};

use super::types::CategorySuggestion;

/// Maximum characters of raw model output echoed in error messages
const RAW_PREVIEW_LEN: usize = 200;

/// Parse a category suggestion from AI response text
///
/// Fails with `Error::InvalidData` when no JSON object is present, when the
/// object doesn't match the suggestion shape, or when `confidence` falls
/// outside [0, 1]. Out-of-range confidence is rejected, never clamped.
pub fn parse_category_suggestion(response: &str) -> Result<CategorySuggestion> {
    let json_str = extract_json_object(response).ok_or_else(|| {
        Error::InvalidData(format!(
            "No JSON found in AI category response | Raw: {}",
            preview(response.trim())
        ))
    })?;

    let mut suggestion: CategorySuggestion = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid category suggestion JSON from AI: {} | Raw: {}",
            e,
            preview(json_str)
        ))
    })?;

    if !(0.0..=1.0).contains(&suggestion.confidence) {
        return Err(Error::InvalidData(format!(
            "Confidence out of range [0, 1]: {}",
            suggestion.confidence
        )));
    }

    suggestion.suggested_category = suggestion
        .suggested_category
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string();

    if suggestion.suggested_category.is_empty() {
        return Err(Error::InvalidData(
            "AI returned an empty suggested category".into(),
        ));
    }

    Ok(suggestion)
}

/// Find the first balanced JSON object in the text
fn extract_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in response[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&response[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Truncate long responses for error messages
fn preview(text: &str) -> String {
    match text.char_indices().nth(RAW_PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
