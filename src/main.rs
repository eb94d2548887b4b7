use clap::Parser;
use sla_audit::{Cli, handlers};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // --verbose turns on debug logging for this crate; RUST_LOG still wins
    // when set.
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sla_audit=debug"))
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.deploy_keys {
        handlers::run_deploy_keys()
    } else {
        handlers::run_audit(&cli)
    }
}
