//! Deploy key audit: every key attached to the audited repositories, with
//! keys predating the rotation cutoff flagged for replacement.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Keys created before this date predate the org-wide key rotation and must
/// be replaced.
pub const DEFAULT_CUTOFF: NaiveDate = match NaiveDate::from_ymd_opt(2023, 1, 5) {
    Some(date) => date,
    None => unreachable!(),
};

/// One deploy key on one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployKey {
    pub repository: String,
    pub created_at: DateTime<Utc>,
    pub read_only: bool,
    pub title: String,
}

impl DeployKey {
    /// True when the key was created before the rotation cutoff.
    pub fn stale(&self, cutoff: NaiveDate) -> bool {
        self.created_at.date_naive() < cutoff
    }

    pub fn created_at_text(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
