//! Local repository inspection using git2-rs.

use std::path::Path;

use git2::{Repository as Git2Repository, RepositoryState, StatusOptions};

use crate::error::{Error, Result};
use crate::traits::{GitOps, Remote};

/// Wrapper around [`git2::Repository`] exposing the state the sync
/// workflow needs.
pub struct Repository {
    inner: Git2Repository,
}

impl Repository {
    /// Open the repository containing the given path.
    ///
    /// Walks up parent directories the same way `git` itself does.
    pub fn open(path: &Path) -> Result<Self> {
        let inner = Git2Repository::discover(path).map_err(|_| Error::NotARepository)?;
        Ok(Self { inner })
    }

    /// Open the repository containing the current directory.
    pub fn open_current() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::open(&cwd)
    }

    /// Path to the working tree root.
    pub fn workdir(&self) -> Result<&Path> {
        self.inner.workdir().ok_or(Error::NoWorkingTree)
    }

    /// Path to the `.git` directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    /// Name of the currently checked-out branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head()?;
        if !head.is_branch() {
            return Err(Error::DetachedHead);
        }
        head.shorthand()
            .map(String::from)
            .ok_or_else(|| Error::Git2(git2::Error::from_str("branch name is not valid UTF-8")))
    }

    /// Whether HEAD points at a commit instead of a branch.
    pub fn head_detached(&self) -> Result<bool> {
        Ok(self.inner.head_detached()?)
    }

    /// Whether a rebase is already in progress.
    #[must_use]
    pub fn is_rebasing(&self) -> bool {
        matches!(
            self.inner.state(),
            RepositoryState::Rebase
                | RepositoryState::RebaseInteractive
                | RepositoryState::RebaseMerge
        )
    }

    /// Whether the working tree and index have no uncommitted changes.
    ///
    /// Untracked files are not counted; they do not block a rebase.
    pub fn is_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);
        let statuses = self.inner.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    /// All configured remotes with their fetch URLs.
    pub fn remotes(&self) -> Result<Vec<Remote>> {
        let names = self.inner.remotes()?;
        let mut remotes = Vec::with_capacity(names.len());
        for name in names.iter().flatten() {
            let url = self
                .inner
                .find_remote(name)
                .ok()
                .and_then(|r| r.url().map(String::from));
            remotes.push(Remote {
                name: name.to_string(),
                url,
            });
        }
        Ok(remotes)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.inner.path())
            .finish()
    }
}

impl GitOps for Repository {
    fn workdir(&self) -> Result<&Path> {
        self.workdir()
    }

    fn git_dir(&self) -> &Path {
        self.git_dir()
    }

    fn current_branch(&self) -> Result<String> {
        self.current_branch()
    }

    fn head_detached(&self) -> Result<bool> {
        self.head_detached()
    }

    fn is_rebasing(&self) -> bool {
        self.is_rebasing()
    }

    fn is_clean(&self) -> Result<bool> {
        self.is_clean()
    }

    fn remotes(&self) -> Result<Vec<Remote>> {
        self.remotes()
    }
}
