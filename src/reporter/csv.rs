//! CSV report, one row per group with open (non-dismissed) alerts.

use crate::aggregate::VulnerabilityGroup;
use crate::reporter::Reporter;

const FIELDS: [&str; 6] = [
    "package_name",
    "first_patched_version",
    "deadline",
    "repositories",
    "severity",
    "github_topics",
];

pub struct CsvReporter {
    org: String,
}

impl CsvReporter {
    pub fn new(org: impl Into<String>) -> Self {
        Self { org: org.into() }
    }

    fn row(&self, group: &VulnerabilityGroup, open_repos: &[&str]) -> String {
        let repositories = open_repos
            .iter()
            .map(|repo| format!("https://github.com/{}/{}/security/dependabot/", self.org, repo))
            .collect::<Vec<_>>()
            .join("\n");
        let topics = group.topics().collect::<Vec<_>>().join("; ");

        [
            group.package_name.as_str(),
            group.first_patched_version.as_str(),
            &group.deadline_text(),
            &repositories,
            group.effective_severity().as_str(),
            &topics,
        ]
        .map(escape)
        .join(",")
    }
}

impl Reporter for CsvReporter {
    fn report(&self, groups: &[VulnerabilityGroup]) -> String {
        let mut out = FIELDS.join(",");
        out.push_str("\r\n");
        for group in groups {
            let open_repos: Vec<&str> = group.open_repos().collect();
            // A group whose every alert is dismissed carries no action item.
            if open_repos.is_empty() {
                continue;
            }
            out.push_str(&self.row(group, &open_repos));
            out.push_str("\r\n");
        }
        out
    }
}

/// RFC 4180 quoting: fields containing a comma, quote, or line break get
/// wrapped in quotes with internal quotes doubled.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
