//! Interactive conflict resolution driven from the terminal.

use inquire::Confirm;
use tracing::debug;
use upsync_core::{ConflictResolution, ConflictResolver};
use upsync_git::{GitCli, GitRunner};

use crate::output;

/// Walks the user through resolving a conflicted rebase.
///
/// Loops over `git rebase --continue` until the rebase completes or the
/// user gives up, in which case the rebase is aborted so the repository
/// is never left mid-rebase.
pub struct InteractiveConflictResolver {
    runner: GitCli,
}

impl InteractiveConflictResolver {
    pub const fn new(runner: GitCli) -> Self {
        Self { runner }
    }

    fn abandon(&self) -> ConflictResolution {
        debug!("aborting conflicted rebase");
        if let Err(e) = self.runner.rebase_abort() {
            output::warn(&format!("could not abort the rebase: {e}"));
        }
        ConflictResolution::Abandoned
    }
}

impl ConflictResolver for InteractiveConflictResolver {
    fn resolve(&self) -> ConflictResolution {
        output::warn("The rebase stopped on merge conflicts.");
        loop {
            output::info("Resolve the conflicts in your working tree and stage the files.");
            let proceed = Confirm::new("Continue the rebase now?")
                .with_default(true)
                .prompt();

            match proceed {
                Ok(true) => match self.runner.rebase_continue() {
                    Ok(exit) if exit.success() => return ConflictResolution::Resolved,
                    // Non-zero means the next commit conflicted too.
                    Ok(_) => output::warn("Conflicts remain."),
                    Err(e) => {
                        output::error(&format!("could not continue the rebase: {e}"));
                        return self.abandon();
                    }
                },
                Ok(false) | Err(_) => return self.abandon(),
            }
        }
    }
}
