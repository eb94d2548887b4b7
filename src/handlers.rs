//! Wiring of the audit pipeline: fetch, compute, group, rank, render.

use crate::aggregate::aggregate;
use crate::calendar::{self, WorkingCalendar};
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::deploy_keys;
use crate::error::Result;
use crate::github::GithubClient;
use crate::ranker;
use crate::reporter::{Reporter, csv::CsvReporter, keys::DeployKeyReporter, table::TableReporter};
use chrono::Utc;
use std::process::ExitCode;
use tracing::info;

pub fn run_audit(cli: &Cli) -> ExitCode {
    let report = Config::from_env().and_then(|config| audit(cli, &config));
    finish(report)
}

pub fn run_deploy_keys() -> ExitCode {
    let report = Config::from_env().and_then(|config| deploy_key_audit(&config));
    finish(report)
}

fn finish(report: Result<String>) -> ExitCode {
    match report {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn audit(cli: &Cli, config: &Config) -> Result<String> {
    // The calendar is validated before anything else: a bad holiday feed
    // would corrupt every due date.
    let holidays = calendar::fetch_holidays(config.holiday_calendar_url()?)?;
    let calendar = WorkingCalendar::new(holidays, config.min_holidays)?;

    let client = GithubClient::new(config)?;
    let alerts = client.fetch_alerts(config)?;

    // `today` is sampled once here; everything downstream is pure.
    let today = Utc::now().date_naive();
    let groups = aggregate(&alerts, today, &calendar);
    info!(groups = groups.len(), %today, "computed vulnerability groups");

    let report = match cli.output {
        OutputFormat::Table => TableReporter::new().report(&ranker::rank(groups)),
        OutputFormat::Csv => CsvReporter::new(&config.org).report(&ranker::by_due_date(groups)),
    };
    Ok(report)
}

fn deploy_key_audit(config: &Config) -> Result<String> {
    let client = GithubClient::new(config)?;
    let keys = client.fetch_deploy_keys(config)?;
    info!(keys = keys.len(), "rendering deploy key report");
    Ok(DeployKeyReporter::new(deploy_keys::DEFAULT_CUTOFF).report(&keys))
}
