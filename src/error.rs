//! Error types for sla-audit.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The holiday feed produced fewer distinct dates than the configured
    /// floor. Every due date would be wrong, so this aborts the run before
    /// any deadline is computed.
    #[error("Holiday calendar unavailable: found {found} dates, need at least {required}")]
    CalendarUnavailable { found: usize, required: usize },

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error: {0}")]
    Api(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for sla-audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
