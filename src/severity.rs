//! Severity tiers and the SLA escalation ladder.

use crate::error::AuditError;

/// Vulnerability severity, ordered by urgency.
///
/// The first four tiers come from the upstream API as plain strings and are
/// parsed through `FromStr`. `CriticalBreach` is a terminal escalation
/// state: critical and already past its own grace period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
    CriticalBreach,
}

impl Severity {
    /// Grace period in working days between publication and the due date.
    /// `Low` has no deadline at all. `CriticalBreach` is entered the moment
    /// the critical deadline passes, so its grace period is zero.
    pub fn grace_period(&self) -> Option<u32> {
        match self {
            Severity::Low => None,
            Severity::Moderate => Some(10),
            Severity::High => Some(5),
            Severity::Critical => Some(1),
            Severity::CriticalBreach => Some(0),
        }
    }

    /// Next tier on the ladder once this tier's due date has passed.
    pub fn escalates_to(&self) -> Option<Severity> {
        match self {
            Severity::Low => None,
            Severity::Moderate => Some(Severity::High),
            Severity::High => Some(Severity::Critical),
            Severity::Critical => Some(Severity::CriticalBreach),
            Severity::CriticalBreach => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Moderate => "MODERATE",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
            Severity::CriticalBreach => "CRITICAL BREACH",
        }
    }

    /// Display label for report rows.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::CriticalBreach => "⚠️  CRITICAL BREACH ⚠️ ",
            _ => self.as_str(),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = AuditError;

    /// Accepts only the four severities the API reports. Anything else means
    /// the ladder has no row for it, so fail loudly instead of defaulting.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Severity::Low),
            "MODERATE" => Ok(Severity::Moderate),
            "HIGH" => Ok(Severity::High),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(AuditError::UnknownSeverity(s.to_string())),
        }
    }
}
