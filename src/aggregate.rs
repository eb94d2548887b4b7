//! Grouping of raw alerts into deduplicated vulnerability records.

use crate::calendar::WorkingCalendar;
use crate::deadline::{self, Deadline};
use crate::severity::Severity;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// One (repository, advisory) pairing as reported upstream. Immutable once
/// built by the fetch layer.
#[derive(Debug, Clone)]
pub struct Alert {
    pub repository: String,
    pub package_name: String,
    pub ecosystem: String,
    pub severity: Severity,
    /// `None` when upstream has no patched version yet; rendered and grouped
    /// as the literal string "None".
    pub first_patched_version: Option<String>,
    pub published_at: NaiveDate,
    pub dismissed_at: Option<DateTime<Utc>>,
    pub fixed_at: Option<DateTime<Utc>>,
    pub withdrawn_at: Option<DateTime<Utc>>,
    pub repo_topics: Vec<String>,
}

pub const NO_PATCHED_VERSION: &str = "None";

/// Aggregation key: alerts agreeing on all five fields merge into one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    package_name: String,
    ecosystem: String,
    first_patched_version: String,
    severity: Severity,
    due_date: Option<NaiveDate>,
}

/// A repository that contributed an alert to a group. Ordered with open
/// alerts before dismissed ones, then by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RepoRef {
    pub dismissed: bool,
    pub name: String,
}

/// One distinct finding across potentially many repositories.
#[derive(Debug, Clone)]
pub struct VulnerabilityGroup {
    pub package_name: String,
    pub ecosystem: String,
    pub first_patched_version: String,
    pub original_severity: Severity,
    pub deadline: Deadline,
    repos: BTreeSet<RepoRef>,
    topics: BTreeSet<String>,
}

impl VulnerabilityGroup {
    pub fn effective_severity(&self) -> Severity {
        self.deadline.effective_severity
    }

    pub fn days_until_due(&self) -> i64 {
        self.deadline.days_until_due
    }

    pub fn in_breach(&self) -> bool {
        self.deadline.in_breach
    }

    pub fn deadline_text(&self) -> String {
        self.deadline.text()
    }

    /// Whether the report should visually emphasize this row.
    pub fn emphasized(&self) -> bool {
        matches!(
            self.deadline.effective_severity,
            Severity::Critical | Severity::CriticalBreach
        )
    }

    /// Contributing repositories, deduplicated per (repository, dismissed)
    /// pair, open alerts first.
    pub fn repos(&self) -> impl Iterator<Item = &RepoRef> {
        self.repos.iter()
    }

    /// Repositories with at least one non-dismissed alert in this group.
    pub fn open_repos(&self) -> impl Iterator<Item = &str> {
        self.repos
            .iter()
            .filter(|r| !r.dismissed)
            .map(|r| r.name.as_str())
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(String::as_str)
    }
}

/// Folds raw alerts into deduplicated groups.
///
/// Fixed and withdrawn alerts never enter a group. The deadline is computed
/// once per key since all of its inputs are part of the key.
pub fn aggregate(
    alerts: &[Alert],
    today: NaiveDate,
    calendar: &WorkingCalendar,
) -> Vec<VulnerabilityGroup> {
    let mut groups: HashMap<GroupKey, VulnerabilityGroup> = HashMap::new();

    for alert in alerts {
        if alert.fixed_at.is_some() || alert.withdrawn_at.is_some() {
            continue;
        }

        let package_name = alert.package_name.to_lowercase();
        let ecosystem = alert.ecosystem.to_lowercase();
        let first_patched_version = alert
            .first_patched_version
            .clone()
            .unwrap_or_else(|| NO_PATCHED_VERSION.to_string());
        let deadline = deadline::compute(alert.severity, alert.published_at, today, calendar);

        let key = GroupKey {
            package_name: package_name.clone(),
            ecosystem: ecosystem.clone(),
            first_patched_version: first_patched_version.clone(),
            severity: alert.severity,
            due_date: deadline.due_date,
        };

        let group = groups.entry(key).or_insert_with(|| VulnerabilityGroup {
            package_name,
            ecosystem,
            first_patched_version,
            original_severity: alert.severity,
            deadline,
            repos: BTreeSet::new(),
            topics: BTreeSet::new(),
        });
        group.repos.insert(RepoRef {
            dismissed: alert.dismissed_at.is_some(),
            name: alert.repository.clone(),
        });
        group.topics.extend(alert.repo_topics.iter().cloned());
    }

    debug!(groups = groups.len(), alerts = alerts.len(), "aggregated alerts");
    groups.into_values().collect()
}
