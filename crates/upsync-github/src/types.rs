//! GitHub API types.

use crate::path::RepositoryPath;

/// The currently authenticated GitHub user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Account login name.
    pub login: String,

    /// Profile URL.
    pub html_url: String,
}

/// Repository metadata used by the fork-sync workflow.
#[derive(Debug, Clone)]
pub struct RepositoryInfo {
    /// Repository name without the owner.
    pub name: String,

    /// Whether this repository is a fork.
    pub fork: bool,

    /// Browsing URL.
    pub html_url: String,

    /// Default branch name (absent on repositories without one).
    pub default_branch: Option<String>,

    /// Parent repository, populated for forks.
    pub parent: Option<RepositoryPath>,
}

impl RepositoryInfo {
    /// The parent path, but only when this repository is actually a fork.
    ///
    /// Repositories occasionally report a parent while not being flagged as
    /// a fork (e.g. after a transfer); both conditions must hold.
    #[must_use]
    pub const fn fork_parent(&self) -> Option<&RepositoryPath> {
        if self.fork { self.parent.as_ref() } else { None }
    }
}
