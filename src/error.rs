//! Error types and handling for the note filter engine

use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// Filter error types
///
/// Content-lookup failures are swallowed at the per-card boundary and degrade
/// to "no match via content" for that card; they never abort a filter pass.
#[derive(Debug, Serialize)]
pub enum FilterError {
    Transport(String),
    MissingContent(String),
    Timeout(String),
    Internal(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Transport(msg) => write!(f, "Content fetch failed: {}", msg),
            FilterError::MissingContent(msg) => write!(f, "Content missing: {}", msg),
            FilterError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            FilterError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for FilterError {}

impl FilterError {
    /// Get the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            FilterError::Transport(_) => "transport_failed",
            FilterError::MissingContent(_) => "missing_content",
            FilterError::Timeout(_) => "timeout",
            FilterError::Internal(_) => "internal_error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Convert reqwest::Error to FilterError
impl From<reqwest::Error> for FilterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FilterError::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() {
            FilterError::Transport(err.to_string())
        } else {
            FilterError::Internal(err.to_string())
        }
    }
}

/// Convert serde_json::Error to FilterError
impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::MissingContent(err.to_string())
    }
}

/// Validate a note identifier before scheduling a content lookup
pub fn validate_note_id(id: &str) -> Result<(), FilterError> {
    if id.trim().is_empty() {
        return Err(FilterError::Internal(
            "Note identifier cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Normalize a query using Unicode NFKC, trimmed and case-folded
///
/// The query is treated as opaque literal text; it is never rejected, only
/// normalized. Regex metacharacters are neutralized later, at pattern-build
/// time.
pub fn normalize_query(query: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    query.nfkc().collect::<String>().trim().to_lowercase()
}

/// Normalize fetched note content using Unicode NFKC and case-folding
///
/// Interior whitespace is preserved so snippet offsets stay meaningful.
pub fn normalize_content(content: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    content.nfkc().collect::<String>().to_lowercase()
}
