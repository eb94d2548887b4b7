use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Prioritized ASCII table
    #[default]
    Table,
    /// CSV ordered by due date
    Csv,
}

#[derive(Parser, Debug)]
#[command(
    name = "sla-audit",
    version,
    about = "Audits an organization's dependency vulnerability alerts against a working-day SLA",
    long_about = "sla-audit fetches open Dependabot alerts for an organization (or one of its \
teams), assigns each vulnerability a remediation deadline from its severity, escalates the \
effective severity of overdue items, and prints a prioritized report.\n\n\
Configuration comes from the environment: GITHUB_TOKEN and GITHUB_ORG (required), \
HOLIDAY_CALENDAR_URL (required for the vulnerability audit), GITHUB_TEAM_SLUG and \
GITHUB_TOPIC (optional filters)."
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Audit repository deploy keys instead of vulnerability alerts
    #[arg(long)]
    pub deploy_keys: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_output_is_table() {
        let cli = Cli::try_parse_from(["sla-audit"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Table);
    }

    #[test]
    fn test_parse_output_csv() {
        let cli = Cli::try_parse_from(["sla-audit", "--output", "csv"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Csv);
    }

    #[test]
    fn test_parse_deploy_keys_mode() {
        let cli = Cli::try_parse_from(["sla-audit", "--deploy-keys"]).unwrap();
        assert!(cli.deploy_keys);
        assert!(!Cli::try_parse_from(["sla-audit"]).unwrap().deploy_keys);
    }

    #[test]
    fn test_parse_verbose() {
        let cli = Cli::try_parse_from(["sla-audit", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(!Cli::try_parse_from(["sla-audit"]).unwrap().verbose);
    }

    #[test]
    fn test_rejects_unknown_output() {
        assert!(Cli::try_parse_from(["sla-audit", "--output", "xml"]).is_err());
    }
}
