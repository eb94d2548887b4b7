pub mod aggregate;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod deadline;
pub mod deploy_keys;
pub mod error;
pub mod github;
pub mod handlers;
pub mod ranker;
pub mod reporter;
pub mod severity;

pub use aggregate::{Alert, RepoRef, VulnerabilityGroup, aggregate as aggregate_alerts};
pub use calendar::WorkingCalendar;
pub use cli::{Cli, OutputFormat};
pub use config::Config;
pub use deadline::{Deadline, compute as compute_deadline};
pub use deploy_keys::DeployKey;
pub use error::{AuditError, Result};
pub use github::GithubClient;
pub use ranker::{by_due_date, rank};
pub use reporter::{Reporter, csv::CsvReporter, keys::DeployKeyReporter, table::TableReporter};
pub use severity::Severity;
