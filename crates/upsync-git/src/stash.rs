//! Scoped preservation of uncommitted changes around a rebase.

use tracing::warn;

use crate::error::Result;
use crate::runner::GitRunner;

const LEFT_STASHED: &str = "uncommitted changes remain stashed; restore them with `git stash pop`";

/// Uncommitted-changes checkpoint held for the duration of a rebase.
///
/// Created before the rebase starts. [`restore`](Self::restore) pops the
/// stash entry back onto the working tree; [`keep`](Self::keep) leaves it
/// for manual recovery. Dropping the guard without calling either keeps
/// the entry and logs where it went, so no exit path loses work.
pub struct StashGuard<'a, R: GitRunner> {
    runner: &'a R,
    stashed: bool,
    finished: bool,
}

impl<'a, R: GitRunner> StashGuard<'a, R> {
    /// Stash uncommitted changes when `dirty`, otherwise create a no-op
    /// guard.
    pub fn save(runner: &'a R, message: &str, dirty: bool) -> Result<Self> {
        let stashed = if dirty {
            runner.stash_push(message)?
        } else {
            false
        };
        Ok(Self {
            runner,
            stashed,
            finished: false,
        })
    }

    /// Whether changes were actually stashed.
    #[must_use]
    pub const fn stashed(&self) -> bool {
        self.stashed
    }

    /// Pop the stashed changes back onto the working tree.
    pub fn restore(mut self) -> Result<()> {
        self.finished = true;
        if self.stashed {
            self.runner.stash_pop()?;
        }
        Ok(())
    }

    /// Leave the stash entry in place, e.g. while conflicts are still
    /// being resolved in the working tree.
    pub fn keep(mut self) {
        self.finished = true;
        if self.stashed {
            warn!("{LEFT_STASHED}");
        }
    }
}

impl<R: GitRunner> Drop for StashGuard<'_, R> {
    fn drop(&mut self) {
        if self.stashed && !self.finished {
            warn!("{LEFT_STASHED}");
        }
    }
}
