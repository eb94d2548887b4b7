//! Deadline computation and severity escalation.

use crate::calendar::WorkingCalendar;
use crate::severity::Severity;
use chrono::NaiveDate;

/// SLA outcome for one vulnerability at a given evaluation date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadline {
    /// Absent for `Low`, which never has a deadline.
    pub due_date: Option<NaiveDate>,
    /// Possibly escalated tier; equals the original tier while its due date
    /// has not passed.
    pub effective_severity: Severity,
    /// Signed calendar days from `today` to the original due date. Negative
    /// means overdue. Zero for `Low`.
    pub days_until_due: i64,
    /// Whether the original, non-escalated due date has passed. `Low` is
    /// never in breach.
    pub in_breach: bool,
}

impl Deadline {
    /// Human-readable deadline for report rows, e.g. `15 Jan (in 3 days)`.
    pub fn text(&self) -> String {
        let Some(due) = self.due_date else {
            return "No deadline".to_string();
        };
        let suffix = match self.days_until_due {
            n if n >= 2 => format!("(in {n} days)"),
            1 => "(tomorrow)".to_string(),
            0 => "(today)".to_string(),
            -1 => "(yesterday)".to_string(),
            n => format!("({} days ago)", -n),
        };
        format!("{} {}", due.format("%-d %b"), suffix)
    }
}

/// Computes the due date and the escalated severity for one vulnerability.
///
/// Pure and deterministic: `today` is an explicit input, never a live clock.
/// Re-running with the same inputs always yields the same result because the
/// escalation walk restarts from the original due date every time.
pub fn compute(
    original: Severity,
    published_at: NaiveDate,
    today: NaiveDate,
    calendar: &WorkingCalendar,
) -> Deadline {
    let Some(grace) = original.grace_period() else {
        return Deadline {
            due_date: None,
            effective_severity: Severity::Low,
            days_until_due: 0,
            in_breach: false,
        };
    };
    let due_date = calendar.add_working_days(published_at, grace);

    // Walk the ladder from the original due date: each missed deadline grants
    // the successor tier's grace period, measured from the date just missed.
    // The zero-day grace of the terminal tier keeps the breach date equal to
    // the date the walk entered it.
    let mut effective = original;
    let mut effective_due = due_date;
    while effective_due < today {
        let Some(next) = effective.escalates_to() else {
            break;
        };
        effective = next;
        effective_due = calendar.add_working_days(effective_due, next.grace_period().unwrap_or(0));
    }

    // Breach is judged against the original due date, not the escalated one:
    // "is this late at all" stays independent from "how urgent is it now".
    let days_until_due = (due_date - today).num_days();
    Deadline {
        due_date: Some(due_date),
        effective_severity: effective,
        days_until_due,
        in_breach: days_until_due < 0,
    }
}
