//! End-to-end pipeline tests over synthetic alerts: deadline computation,
//! aggregation, ranking, and both report formats.

use chrono::{NaiveDate, Utc};
use sla_audit::{
    Alert, CsvReporter, Reporter, Severity, TableReporter, WorkingCalendar, aggregate_alerts,
    by_due_date, compute_deadline, rank,
};
use std::collections::HashSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn empty_calendar() -> WorkingCalendar {
    WorkingCalendar::new(HashSet::new(), 0).unwrap()
}

fn alert(repo: &str, package: &str, severity: Severity, published_at: NaiveDate) -> Alert {
    Alert {
        repository: repo.to_string(),
        package_name: package.to_string(),
        ecosystem: "npm".to_string(),
        severity,
        first_patched_version: Some("2.0.0".to_string()),
        published_at,
        dismissed_at: None,
        fixed_at: None,
        withdrawn_at: None,
        repo_topics: vec!["backend".to_string()],
    }
}

#[test]
fn moderate_published_on_a_monday_escalates_to_high_after_breach() {
    // The worked SLA example: MODERATE published Monday 2024-01-01 is due
    // 2024-01-15 (10 working days, two weekends skipped). By 2024-01-20 it
    // is 5 days overdue and the escalated HIGH deadline (2024-01-22) has not
    // yet passed.
    let cal = empty_calendar();
    let d = compute_deadline(Severity::Moderate, date(2024, 1, 1), date(2024, 1, 20), &cal);
    assert_eq!(d.due_date, Some(date(2024, 1, 15)));
    assert_eq!(d.days_until_due, -5);
    assert!(d.in_breach);
    assert_eq!(d.effective_severity, Severity::High);
}

#[test]
fn full_pipeline_orders_and_renders() {
    colored::control::set_override(false);
    let today = date(2024, 3, 1);
    let cal = empty_calendar();

    let alerts = vec![
        // Overdue critical, reported from two repositories.
        alert("api", "openssl", Severity::Critical, date(2024, 2, 1)),
        alert("worker", "openssl", Severity::Critical, date(2024, 2, 1)),
        // Upcoming moderate.
        alert("api", "lodash", Severity::Moderate, date(2024, 2, 29)),
        // Low, never due.
        alert("frontend", "leftpad", Severity::Low, date(2023, 1, 1)),
        // Fixed alert must vanish entirely.
        Alert {
            fixed_at: Some(Utc::now()),
            ..alert("api", "serde", Severity::High, date(2024, 2, 1))
        },
    ];

    let groups = aggregate_alerts(&alerts, today, &cal);
    assert_eq!(groups.len(), 3);

    let ranked = rank(groups.clone());
    assert_eq!(ranked[0].package_name, "openssl");
    assert!(ranked[0].in_breach());
    assert_eq!(ranked[0].repos().count(), 2);
    assert_eq!(ranked[1].package_name, "lodash");
    assert_eq!(ranked[2].package_name, "leftpad");
    assert_eq!(ranked[2].effective_severity(), Severity::Low);

    let table = TableReporter::new().report(&ranked);
    assert!(table.contains("openssl"));
    assert!(table.contains("CRITICAL BREACH"));
    assert!(table.contains("No deadline"));
    let openssl_line = table.lines().position(|l| l.contains("openssl")).unwrap();
    let leftpad_line = table.lines().position(|l| l.contains("leftpad")).unwrap();
    assert!(openssl_line < leftpad_line);

    let csv = CsvReporter::new("acme").report(&by_due_date(groups));
    assert!(csv.starts_with("package_name,"));
    assert!(csv.contains("https://github.com/acme/api/security/dependabot/"));
    assert!(!csv.contains("serde"));
    // CSV order is by due date, deadline-less rows last.
    let openssl_pos = csv.find("openssl").unwrap();
    let lodash_pos = csv.find("lodash").unwrap();
    let leftpad_pos = csv.find("leftpad").unwrap();
    assert!(openssl_pos < lodash_pos);
    assert!(lodash_pos < leftpad_pos);
}

#[test]
fn holidays_shift_deadlines_through_the_whole_pipeline() {
    let today = date(2024, 1, 2);
    // 2024-01-02 .. 2024-01-04 are holidays, so a CRITICAL published Monday
    // 2024-01-01 is due Friday 2024-01-05 instead of Tuesday.
    let holidays: HashSet<NaiveDate> = (2..=4).map(|d| date(2024, 1, d)).collect();
    let cal = WorkingCalendar::new(holidays, 3).unwrap();

    let groups = aggregate_alerts(
        &[alert("api", "openssl", Severity::Critical, date(2024, 1, 1))],
        today,
        &cal,
    );
    assert_eq!(groups[0].deadline.due_date, Some(date(2024, 1, 5)));
    assert!(!groups[0].in_breach());
    assert_eq!(groups[0].deadline_text(), "5 Jan (in 3 days)");
}

#[test]
fn dismissed_alerts_stay_in_the_table_but_not_the_csv() {
    colored::control::set_override(false);
    let today = date(2024, 3, 1);
    let cal = empty_calendar();
    let dismissed = Alert {
        dismissed_at: Some(Utc::now()),
        ..alert("api", "lodash", Severity::Moderate, date(2024, 2, 29))
    };

    let groups = aggregate_alerts(&[dismissed], today, &cal);
    let table = TableReporter::new().report(&rank(groups.clone()));
    assert!(table.contains("😴 api"));

    let csv = CsvReporter::new("acme").report(&by_due_date(groups));
    assert!(!csv.contains("lodash"));
}
