//! Trait abstractions for repository inspection.
//!
//! These traits enable dependency injection and testing with mock
//! implementations.

use std::path::Path;

use crate::error::Result;

/// A named remote configured in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    /// Remote name, e.g. `origin`.
    pub name: String,
    /// Fetch URL, when one is configured and valid UTF-8.
    pub url: Option<String>,
}

/// Read-only view of the state of a local git repository.
pub trait GitOps {
    /// Path to the working tree root.
    fn workdir(&self) -> Result<&Path>;

    /// Path to the `.git` directory.
    fn git_dir(&self) -> &Path;

    /// Name of the currently checked-out branch.
    fn current_branch(&self) -> Result<String>;

    /// Whether HEAD is detached.
    fn head_detached(&self) -> Result<bool>;

    /// Whether a rebase is already in progress.
    fn is_rebasing(&self) -> bool;

    /// Whether the working tree has no uncommitted changes.
    fn is_clean(&self) -> Result<bool>;

    /// All configured remotes.
    fn remotes(&self) -> Result<Vec<Remote>>;

    /// Look up a remote by name.
    fn find_remote(&self, name: &str) -> Result<Option<Remote>> {
        Ok(self.remotes()?.into_iter().find(|r| r.name == name))
    }
}
