//! Wiring: ambient repository and config, real collaborators, one run.

use anyhow::{Context, Result};
use upsync_core::{Config, ForkSync, SyncOutcome};
use upsync_git::{GitCli, Repository};
use upsync_github::{Auth, GitHubClient};

use crate::conflicts::InteractiveConflictResolver;
use crate::notifier::TerminalNotifier;

/// Run the fork-sync workflow against the repository around the current
/// directory.
pub fn run() -> Result<SyncOutcome> {
    let repo = Repository::open_current().context("not inside a git repository")?;
    let workdir = repo.workdir().context("cannot sync a bare repository")?;
    let runner = GitCli::new(workdir);

    let config = Config::load(repo.git_dir().join("upsync").join("config.toml"))?;
    let server = config.server_identity()?;

    let auth = Auth::auto();
    let client = GitHubClient::for_server(&auth, &server)?;

    let notifier = TerminalNotifier::new();
    let conflicts = InteractiveConflictResolver::new(runner.clone());

    let sync = ForkSync::new(&repo, &runner, &client, &notifier, &conflicts, server)
        .with_protocol(config.remote.protocol.into())
        .with_save_changes(config.sync.save_changes);

    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(sync.run()))
}
