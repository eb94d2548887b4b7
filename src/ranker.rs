//! Display ordering for vulnerability groups.
//!
//! The order is not a single multi-key sort: breached and non-breached
//! groups use entirely different tie-break priorities, so this is written as
//! an explicit comparator with one branch per breach state.

use crate::aggregate::VulnerabilityGroup;
use crate::severity::Severity;
use std::cmp::Ordering;

/// Total order over groups for the table report.
pub fn compare(a: &VulnerabilityGroup, b: &VulnerabilityGroup) -> Ordering {
    // Breached groups always come first.
    match (a.in_breach(), b.in_breach()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (true, true) => {
            // Breach branch: effective severity descending, then original
            // severity descending, then most overdue first.
            let ord = b
                .effective_severity()
                .cmp(&a.effective_severity())
                .then_with(|| b.original_severity.cmp(&a.original_severity))
                .then_with(|| a.days_until_due().cmp(&b.days_until_due()));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        (false, false) => {
            // Non-breach branch: LOW always last, then nearest deadline
            // first, then original severity descending.
            let a_low = a.original_severity == Severity::Low;
            let b_low = b.original_severity == Severity::Low;
            let ord = match (a_low, b_low) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => Ordering::Equal,
            }
            .then_with(|| a.days_until_due().cmp(&b.days_until_due()))
            .then_with(|| b.original_severity.cmp(&a.original_severity));
            if ord != Ordering::Equal {
                return ord;
            }
        }
    }

    // Deterministic final tie-break shared by both branches. The "None"
    // patched-version sentinel compares as a plain string.
    a.package_name
        .cmp(&b.package_name)
        .then_with(|| a.first_patched_version.cmp(&b.first_patched_version))
}

/// Sorts groups into table display order.
pub fn rank(mut groups: Vec<VulnerabilityGroup>) -> Vec<VulnerabilityGroup> {
    groups.sort_by(compare);
    groups
}

/// Sorts groups by due date for the CSV report. Groups without a deadline
/// sort last.
pub fn by_due_date(mut groups: Vec<VulnerabilityGroup>) -> Vec<VulnerabilityGroup> {
    groups.sort_by(|a, b| {
        match (a.deadline.due_date, b.deadline.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| a.package_name.cmp(&b.package_name))
        .then_with(|| a.first_patched_version.cmp(&b.first_patched_version))
    });
    groups
}
