//! The fork-sync orchestrator.
//!
//! A linear state machine: resolve the upstream remote, validate that it
//! is not the user's own repository, determine its default branch, fetch
//! it and rebase the current branch onto it. Every stage can exit early
//! with a [`Halt`]; expected business outcomes travel as values, never
//! as panics or error unwinding.

use tracing::{debug, info};

use upsync_git::{
    GitOps, GitRunner, RebaseProblemDetector, StashGuard, local_changes_detector,
    untracked_files_detector,
};
use upsync_github::{CloneProtocol, GitHubApi, RepositoryPath, ServerIdentity};

use crate::cancel::CancelToken;
use crate::classify::{RebaseVerdict, classify};
use crate::config::SaveChangesPolicy;
use crate::notify::{Notification, Notifier, Severity};
use crate::outcome::{Halt, SyncOutcome};
use crate::resolve::{UPSTREAM_REMOTE, UpstreamResolver};

/// Notification title for every terminal report of the workflow.
const TITLE: &str = "Sync fork";

/// Stash message for the uncommitted-changes checkpoint.
const STASH_MESSAGE: &str = "upsync: changes before rebase";

/// How the user's interactive conflict resolution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Conflicts were resolved and the rebase completed.
    Resolved,
    /// The user abandoned resolution; the rebase was aborted.
    Abandoned,
}

/// Drives conflict resolution when the rebase stops on merge conflicts.
///
/// Implementations own whatever interaction they need (prompts, rebase
/// `--continue`/`--abort`); by the time they return, the repository must
/// no longer be mid-rebase.
pub trait ConflictResolver {
    /// Resolve or abandon the current conflicted rebase.
    fn resolve(&self) -> ConflictResolution;
}

/// A successful or benign run, with its user-facing summary.
struct Finished {
    outcome: SyncOutcome,
    message: String,
}

/// The fork-sync workflow with all collaborators injected.
pub struct ForkSync<'a, G, R, H, N, C> {
    repo: &'a G,
    runner: &'a R,
    api: &'a H,
    notifier: &'a N,
    conflicts: &'a C,
    server: ServerIdentity,
    protocol: CloneProtocol,
    save_changes: SaveChangesPolicy,
    cancel: CancelToken,
}

#[allow(clippy::future_not_send)]
impl<'a, G, R, H, N, C> ForkSync<'a, G, R, H, N, C>
where
    G: GitOps,
    R: GitRunner,
    H: GitHubApi,
    N: Notifier,
    C: ConflictResolver,
{
    /// Workflow with default options: https clone URLs, stash policy,
    /// no cancellation.
    pub fn new(
        repo: &'a G,
        runner: &'a R,
        api: &'a H,
        notifier: &'a N,
        conflicts: &'a C,
        server: ServerIdentity,
    ) -> Self {
        Self {
            repo,
            runner,
            api,
            notifier,
            conflicts,
            server,
            protocol: CloneProtocol::Https,
            save_changes: SaveChangesPolicy::Stash,
            cancel: CancelToken::new(),
        }
    }

    /// Protocol for the clone URL of a created `upstream` remote.
    #[must_use]
    pub const fn with_protocol(mut self, protocol: CloneProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Policy for uncommitted changes around the rebase.
    #[must_use]
    pub const fn with_save_changes(mut self, policy: SaveChangesPolicy) -> Self {
        self.save_changes = policy;
        self
    }

    /// Cancellation token checked between stages.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the workflow to completion and report the outcome.
    ///
    /// Exactly one notification is emitted per run, here and nowhere
    /// else, so stage-local messages never contradict the terminal one.
    pub async fn run(&self) -> SyncOutcome {
        match self.execute().await {
            Ok(Finished { outcome, message }) => {
                info!("{message}");
                self.notifier
                    .notify(Notification::new(TITLE, message, Severity::Info));
                outcome
            }
            Err(Halt::Abort { message, link }) => {
                info!("sync aborted: {message}");
                let mut notification =
                    Notification::new(TITLE, message.clone(), Severity::Warning);
                if let Some(link) = link {
                    notification = notification.with_link(link);
                }
                self.notifier.notify(notification);
                SyncOutcome::Aborted(message)
            }
            Err(Halt::Fail(message)) => {
                self.notifier
                    .notify(Notification::new(TITLE, message.clone(), Severity::Error));
                SyncOutcome::Failed(message)
            }
        }
    }

    async fn execute(&self) -> Result<Finished, Halt> {
        // Init: act on fresh on-disk state, never a stale snapshot.
        self.check_cancelled()?;
        if self.repo.head_detached()? {
            return Err(Halt::fail("HEAD is detached - check out a branch first"));
        }
        if self.repo.is_rebasing() {
            return Err(Halt::fail("a rebase is already in progress"));
        }
        let branch = self.repo.current_branch()?;

        // ResolveUpstream.
        self.check_cancelled()?;
        let resolver = UpstreamResolver::new(
            self.repo,
            self.runner,
            self.api,
            &self.server,
            self.protocol,
        );
        let upstream_url = resolver.resolve().await?;

        // ValidateOwnership.
        self.check_cancelled()?;
        let upstream_path = RepositoryPath::from_remote_url(&upstream_url)
            .map_err(|e| Halt::fail(e.to_string()))?;
        match self.api.current_user().await {
            Ok(user) if user.login == upstream_path.owner() => {
                return Err(Halt::abort(format!(
                    "upstream {upstream_url} appears to be your own repository; \
                     rebasing onto it would change nothing"
                )));
            }
            Ok(user) => debug!("syncing as {}", user.login),
            Err(err) => {
                // Fail closed: never rebase when ownership cannot be verified.
                return Err(Halt::abort(format!(
                    "could not verify ownership of {upstream_url}: {err}"
                )));
            }
        }

        // DetermineTargetBranch.
        self.check_cancelled()?;
        let info = self
            .api
            .get_repository(upstream_path.owner(), upstream_path.name())
            .await
            .map_err(|e| {
                Halt::fail(format!("cannot read upstream repository {upstream_path}: {e}"))
            })?;
        let Some(default_branch) = info.default_branch else {
            return Err(Halt::fail(format!(
                "upstream repository {upstream_path} has no default branch"
            )));
        };

        // Fetch.
        self.check_cancelled()?;
        if self.repo.find_remote(UPSTREAM_REMOTE)?.is_none() {
            return Err(Halt::fail(format!(
                "remote `{UPSTREAM_REMOTE}` disappeared while syncing"
            )));
        }
        self.runner.fetch(UPSTREAM_REMOTE)?;

        // Rebase. Once started the process is never killed; cancellation
        // is only honored up to this point.
        self.check_cancelled()?;
        let target = format!("{UPSTREAM_REMOTE}/{default_branch}");
        self.rebase_onto(&branch, &target)
    }

    fn rebase_onto(&self, branch: &str, target: &str) -> Result<Finished, Halt> {
        let dirty = match self.save_changes {
            SaveChangesPolicy::Stash => !self.repo.is_clean()?,
            SaveChangesPolicy::Keep => false,
        };
        let guard = StashGuard::save(self.runner, STASH_MESSAGE, dirty)?;

        debug!("rebasing {branch} onto {target}");
        let mut problems = RebaseProblemDetector::new();
        let mut untracked = untracked_files_detector();
        let mut local = local_changes_detector();
        let mut transcript = Vec::new();

        // One process, one pass over its output, three detectors.
        let mut stream = match self.runner.rebase(target) {
            Ok(stream) => stream,
            Err(err) => {
                guard.restore()?;
                return Err(err.into());
            }
        };
        for line in stream.by_ref() {
            problems.feed(&line);
            untracked.feed(&line);
            local.feed(&line);
            transcript.push(line);
        }
        let exit = match stream.finish() {
            Ok(exit) => exit,
            Err(err) => {
                guard.restore()?;
                return Err(err.into());
            }
        };

        match classify(exit, &problems, &untracked, &local, &transcript) {
            RebaseVerdict::UpToDate => {
                guard.restore()?;
                Ok(Finished {
                    outcome: SyncOutcome::NothingToUpdate,
                    message: format!("{branch} is already up to date with {target}"),
                })
            }
            RebaseVerdict::CleanSuccess => {
                guard.restore()?;
                Ok(Finished {
                    outcome: SyncOutcome::Success,
                    message: format!("rebased {branch} onto {target}"),
                })
            }
            RebaseVerdict::NothingToApply => {
                // The rebase stopped on a commit whose changes are already
                // upstream; unwind it and report the benign no-op.
                self.runner.rebase_abort()?;
                guard.restore()?;
                Ok(Finished {
                    outcome: SyncOutcome::NothingToUpdate,
                    message: format!("{branch} has no changes missing from {target}"),
                })
            }
            RebaseVerdict::BlockedByUntrackedFiles(files) => {
                guard.restore()?;
                Err(Halt::fail(format!(
                    "rebase refused: untracked files would be overwritten: {}",
                    files.join(", ")
                )))
            }
            RebaseVerdict::BlockedByLocalChanges(files) => {
                guard.restore()?;
                Err(Halt::fail(format!(
                    "rebase refused: local changes would be overwritten: {}",
                    files.join(", ")
                )))
            }
            RebaseVerdict::Conflicts => self.resolve_conflicts(branch, target, guard),
            RebaseVerdict::Unrecognized(tail) => {
                guard.restore()?;
                Err(Halt::fail(format!("rebase failed:\n{tail}")))
            }
        }
    }

    fn resolve_conflicts(
        &self,
        branch: &str,
        target: &str,
        guard: StashGuard<'_, R>,
    ) -> Result<Finished, Halt> {
        match self.conflicts.resolve() {
            ConflictResolution::Resolved => {
                guard.restore()?;
                Ok(Finished {
                    outcome: SyncOutcome::SuccessWithResolvedConflicts,
                    message: format!("rebased {branch} onto {target} after resolving conflicts"),
                })
            }
            ConflictResolution::Abandoned => {
                // The resolver aborted the rebase; the tree is back where
                // it started, so the checkpoint can be restored.
                guard.restore()?;
                Err(Halt::abort(format!(
                    "rebase of {branch} onto {target} abandoned"
                )))
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), Halt> {
        if self.cancel.is_cancelled() {
            return Err(Halt::abort("sync cancelled"));
        }
        Ok(())
    }
}
