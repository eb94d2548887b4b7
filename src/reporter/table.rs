//! ASCII table report for the terminal.

use crate::aggregate::VulnerabilityGroup;
use crate::reporter::Reporter;
use colored::Colorize;
use console::measure_text_width;

const HEADERS: [&str; 5] = [
    "Package",
    "must be bumped to",
    "by",
    "in repositories",
    "with effective severity",
];

pub struct TableReporter;

impl TableReporter {
    pub fn new() -> Self {
        Self
    }

    /// Cell text per column; the repositories cell is multi-line.
    fn cells(group: &VulnerabilityGroup) -> [String; 5] {
        let repos = group
            .repos()
            .map(|r| {
                if r.dismissed {
                    format!("😴 {}", r.name)
                } else {
                    r.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut severity = group.effective_severity().label().to_string();
        if group.in_breach() {
            severity.push_str(&format!(
                " (original: {})",
                group.original_severity.label()
            ));
        }

        [
            group.package_name.clone(),
            group.first_patched_version.clone(),
            group.deadline_text(),
            repos,
            severity,
        ]
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TableReporter {
    fn report(&self, groups: &[VulnerabilityGroup]) -> String {
        let rows: Vec<([String; 5], bool)> = groups
            .iter()
            .map(|group| (Self::cells(group), group.emphasized()))
            .collect();
        ascii_table(HEADERS, &rows)
    }
}

/// Bordered ASCII grid with per-row emphasis. Cells may be multi-line.
/// Widths come from the terminal display width of the uncolored text, so
/// emoji and other double-width characters keep the columns aligned; color
/// codes are applied after padding for the same reason.
pub(crate) fn ascii_table<const N: usize>(
    headers: [&str; N],
    rows: &[([String; N], bool)],
) -> String {
    let mut widths: [usize; N] = headers.map(measure_text_width);
    for (row, _) in rows {
        for (i, cell) in row.iter().enumerate() {
            for line in cell.lines() {
                widths[i] = widths[i].max(measure_text_width(line));
            }
        }
    }

    let border = {
        let mut b = String::from("+");
        for width in widths {
            b.push_str(&"-".repeat(width + 2));
            b.push('+');
        }
        b
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&render_line(&headers.map(String::from), &widths, None));
    out.push_str(&border);
    out.push('\n');

    for (row, emphasized) in rows {
        let height = row.iter().map(|c| c.lines().count().max(1)).max().unwrap_or(1);
        for line_idx in 0..height {
            let line: [String; N] = std::array::from_fn(|i| {
                row[i].lines().nth(line_idx).unwrap_or("").to_string()
            });
            out.push_str(&render_line(&line, &widths, Some(*emphasized)));
        }
    }

    out.push_str(&border);
    out.push('\n');
    out
}

fn render_line<const N: usize>(
    cells: &[String; N],
    widths: &[usize; N],
    emphasis: Option<bool>,
) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let padding = width.saturating_sub(measure_text_width(cell));
        let padded = format!("{}{}", cell, " ".repeat(padding));
        let styled = match emphasis {
            Some(true) => padded.bright_red().bold().to_string(),
            Some(false) => padded.bright_white().bold().to_string(),
            None => padded,
        };
        line.push(' ');
        line.push_str(&styled);
        line.push_str(" |");
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Alert, aggregate};
    use crate::calendar::WorkingCalendar;
    use crate::severity::Severity;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn alert(repo: &str, severity: Severity, dismissed: bool) -> Alert {
        Alert {
            repository: repo.to_string(),
            package_name: "lodash".to_string(),
            ecosystem: "npm".to_string(),
            severity,
            first_patched_version: Some("4.17.21".to_string()),
            published_at: date(2024, 1, 1),
            dismissed_at: dismissed.then(chrono::Utc::now),
            fixed_at: None,
            withdrawn_at: None,
            repo_topics: vec![],
        }
    }

    fn groups(severity: Severity, dismissed: bool) -> Vec<crate::aggregate::VulnerabilityGroup> {
        let cal = WorkingCalendar::new(HashSet::new(), 0).unwrap();
        aggregate(&[alert("repo-a", severity, dismissed)], date(2024, 1, 10), &cal)
    }

    #[test]
    fn test_table_contains_headers_and_row() {
        colored::control::set_override(false);
        let output = TableReporter::new().report(&groups(Severity::High, false));
        assert!(output.contains("Package"));
        assert!(output.contains("with effective severity"));
        assert!(output.contains("lodash"));
        assert!(output.contains("4.17.21"));
        assert!(output.contains("repo-a"));
        assert!(output.starts_with("+-"));
    }

    #[test]
    fn test_breach_row_shows_original_severity() {
        colored::control::set_override(false);
        // HIGH published 2024-01-01 is overdue on 2024-01-10 and escalates.
        let output = TableReporter::new().report(&groups(Severity::High, false));
        assert!(output.contains("(original: HIGH)"));
    }

    #[test]
    fn test_low_row_has_no_deadline() {
        colored::control::set_override(false);
        let output = TableReporter::new().report(&groups(Severity::Low, false));
        assert!(output.contains("No deadline"));
        assert!(!output.contains("(original:"));
    }

    #[test]
    fn test_dismissed_repo_is_marked() {
        colored::control::set_override(false);
        let output = TableReporter::new().report(&groups(Severity::Moderate, true));
        assert!(output.contains("😴 repo-a"));
    }

    #[test]
    fn test_double_width_marker_keeps_columns_aligned() {
        colored::control::set_override(false);
        // One dismissed repo (double-width 😴 prefix) next to a longer plain
        // name in the same cell; every rendered line must span the same
        // display width.
        let cal = WorkingCalendar::new(HashSet::new(), 0).unwrap();
        let groups = aggregate(
            &[
                alert("api", Severity::Moderate, true),
                alert("billing-service", Severity::Moderate, false),
            ],
            date(2024, 1, 10),
            &cal,
        );
        let output = TableReporter::new().report(&groups);
        let widths: HashSet<usize> = output.lines().map(measure_text_width).collect();
        assert!(output.contains("😴 api"));
        assert_eq!(widths.len(), 1, "ragged table:\n{output}");
    }
}
