//! Upsync CLI - rebase the current branch of a fork onto the default
//! branch of its upstream repository.

use clap::Parser;
use upsync_core::SyncOutcome;

mod conflicts;
mod notifier;
mod output;
mod run;

/// Sync a fork: find its upstream repository, fetch the upstream default
/// branch and rebase the current branch onto it.
///
/// The upstream is discovered through the GitHub API when no `upstream`
/// remote exists yet; ambient inputs are the repository around the
/// current directory, its remotes and a GitHub token (GITHUB_TOKEN or
/// `gh auth login`).
#[derive(Debug, Parser)]
#[command(name = "upsync", version)]
struct Cli {}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Cli {} = Cli::parse();

    match run::run() {
        // Aborts are benign; only hard failures change the exit status.
        Ok(SyncOutcome::Failed(_)) => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            output::error(&format!("{e:#}"));
            std::process::exit(1);
        }
    }
}
