//! Runtime configuration, loaded once and passed explicitly into the run.

use crate::error::{AuditError, Result};

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Minimum distinct holiday dates the feed must yield before any deadline is
/// computed.
pub const DEFAULT_MIN_HOLIDAYS: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub org: String,
    /// When set, only repositories the given team administers are audited.
    pub team_slug: Option<String>,
    /// When set, only repositories carrying this topic are audited.
    pub topic: Option<String>,
    /// Required by the vulnerability audit; the deploy key audit runs
    /// without it.
    pub holiday_calendar_url: Option<String>,
    pub min_holidays: usize,
    pub graphql_url: String,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AuditError::Config(format!("{key} is not set")))
        };
        // Empty strings count as absent for the optional filters.
        let optional = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Ok(Self {
            github_token: required("GITHUB_TOKEN")?,
            org: required("GITHUB_ORG")?,
            team_slug: optional("GITHUB_TEAM_SLUG"),
            topic: optional("GITHUB_TOPIC"),
            holiday_calendar_url: optional("HOLIDAY_CALENDAR_URL"),
            min_holidays: DEFAULT_MIN_HOLIDAYS,
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
        })
    }

    /// The holiday feed URL, or a config error when the audit needs one and
    /// the environment did not provide it.
    pub fn holiday_calendar_url(&self) -> Result<&str> {
        self.holiday_calendar_url
            .as_deref()
            .ok_or_else(|| AuditError::Config("HOLIDAY_CALENDAR_URL is not set".to_string()))
    }
}
