//! ASCII table report for the deploy key audit.

use crate::deploy_keys::DeployKey;
use crate::reporter::table::ascii_table;
use chrono::NaiveDate;

const HEADERS: [&str; 4] = [
    "Repository",
    "Key created at",
    "Key read only",
    "Key title",
];

/// One row per key. Rows whose key predates the rotation cutoff are
/// emphasized the same way breached vulnerabilities are.
pub struct DeployKeyReporter {
    cutoff: NaiveDate,
}

impl DeployKeyReporter {
    pub fn new(cutoff: NaiveDate) -> Self {
        Self { cutoff }
    }

    pub fn report(&self, keys: &[DeployKey]) -> String {
        let rows: Vec<([String; 4], bool)> = keys
            .iter()
            .map(|key| {
                let cells = [
                    key.repository.clone(),
                    key.created_at_text(),
                    key.read_only.to_string(),
                    key.title.clone(),
                ];
                (cells, key.stale(self.cutoff))
            })
            .collect();
        ascii_table(HEADERS, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy_keys::DEFAULT_CUTOFF;

    fn key(repo: &str, created_at: &str, read_only: bool, title: &str) -> DeployKey {
        DeployKey {
            repository: repo.to_string(),
            created_at: created_at.parse().unwrap(),
            read_only,
            title: title.to_string(),
        }
    }

    #[test]
    fn test_key_table_lists_every_key() {
        colored::control::set_override(false);
        let keys = vec![
            key("api-server", "2022-06-01T00:00:00Z", true, "ci-pull"),
            key("api-server", "2023-08-15T09:00:00Z", false, "release-push"),
        ];
        let output = DeployKeyReporter::new(DEFAULT_CUTOFF).report(&keys);
        assert!(output.contains("Repository"));
        assert!(output.contains("Key title"));
        assert!(output.contains("2022-06-01T00:00:00Z"));
        assert!(output.contains("ci-pull"));
        assert!(output.contains("release-push"));
        assert!(output.contains("true"));
        assert!(output.contains("false"));
    }

    #[test]
    fn test_cutoff_splits_stale_from_fresh() {
        let cutoff = DEFAULT_CUTOFF;
        assert!(key("api-server", "2022-06-01T00:00:00Z", true, "ci-pull").stale(cutoff));
        assert!(!key("api-server", "2024-06-01T00:00:00Z", true, "ci-pull").stale(cutoff));
    }

    #[test]
    fn test_empty_key_list_renders_header_only() {
        colored::control::set_override(false);
        let output = DeployKeyReporter::new(DEFAULT_CUTOFF).report(&[]);
        assert_eq!(output.lines().count(), 4);
        assert!(output.contains("Repository"));
    }
}
