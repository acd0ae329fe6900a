//! Pending transaction form glue
//!
//! Owns the category field of a transaction being entered, guards it against
//! overlapping suggestion requests, and turns suggestion results into notices
//! for the user.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::ai::AIBackend;
use crate::suggest::{suggest_with_timeout, SuggestionError, SuggestionOutcome};

/// Caller-side limit on a single suggestion request
pub const DEFAULT_SUGGEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How a notice should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Info,
    Destructive,
}

/// User-facing message produced by a suggestion attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub variant: NoticeVariant,
}

impl Notice {
    fn info(title: &str, message: String) -> Self {
        Self {
            title: title.to_string(),
            message,
            variant: NoticeVariant::Info,
        }
    }

    fn destructive(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn empty_description() -> Self {
        Self::destructive(
            "No description provided",
            "Please enter a description to suggest a category.",
        )
    }

    pub fn failed() -> Self {
        Self::destructive("Suggestion Failed", "Could not suggest a category at this time.")
    }

    pub fn for_outcome(outcome: &SuggestionOutcome) -> Self {
        match outcome {
            SuggestionOutcome::Matched { category, .. } => Self::info(
                "Category Suggested!",
                format!("We've suggested '{}' based on your description.", category),
            ),
            SuggestionOutcome::Fallback { raw_suggestion, .. } => Self::info(
                "Category Suggestion",
                format!(
                    "We suggested '{}', which has been set to 'Other'. You can change it if needed.",
                    raw_suggestion
                ),
            ),
        }
    }

    pub fn for_result(result: &Result<SuggestionOutcome, SuggestionError>) -> Self {
        match result {
            Ok(outcome) => Self::for_outcome(outcome),
            Err(SuggestionError::EmptyDescription) => Self::empty_description(),
            Err(SuggestionError::Unavailable(_)) => Self::failed(),
        }
    }
}

/// Proof that a request was started; carries its token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionTicket {
    token: u64,
}

impl SuggestionTicket {
    pub fn token(&self) -> u64 {
        self.token
    }
}

/// Category field of a transaction form awaiting submission
#[derive(Debug, Clone, Default)]
pub struct PendingCategoryField {
    value: String,
    busy: bool,
    latest_token: u64,
}

impl PendingCategoryField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current field value (empty until set)
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Manual edit by the user
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Start a request. Returns `None` while another one is outstanding.
    pub fn begin(&mut self) -> Option<SuggestionTicket> {
        if self.busy {
            return None;
        }
        self.busy = true;
        self.latest_token += 1;
        Some(SuggestionTicket {
            token: self.latest_token,
        })
    }

    /// Finish a request and produce the notice to show.
    ///
    /// A ticket older than the latest one is discarded: the field is left
    /// alone and no notice is produced. Failures leave the field at its
    /// previous value.
    pub fn apply(
        &mut self,
        ticket: SuggestionTicket,
        result: Result<SuggestionOutcome, SuggestionError>,
    ) -> Option<Notice> {
        if ticket.token != self.latest_token {
            debug!(
                token = ticket.token,
                latest = self.latest_token,
                "Discarding stale suggestion"
            );
            return None;
        }

        let notice = Notice::for_result(&result);
        self.busy = false;
        if let Ok(outcome) = result {
            self.value = outcome.category().as_str().to_string();
        }
        Some(notice)
    }

    /// Give up on the outstanding request so a later response is treated as stale
    pub fn cancel(&mut self) {
        if self.busy {
            self.busy = false;
            self.latest_token += 1;
        }
    }
}

/// Run one suggestion for `field` end to end.
///
/// Returns `None` when a request is already in flight for this field, or
/// when the response arrived for a ticket that is no longer current.
pub async fn suggest_into_field<B>(
    field: &mut PendingCategoryField,
    backend: &B,
    description: &str,
    timeout: Duration,
) -> Option<Notice>
where
    B: AIBackend + ?Sized,
{
    if description.trim().is_empty() {
        return Some(Notice::empty_description());
    }

    let ticket = field.begin()?;
    let result = suggest_with_timeout(backend, description, timeout).await;
    field.apply(ticket, result)
}
