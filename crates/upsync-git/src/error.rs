//! Error types for git operations.

use thiserror::Error;

/// Errors that can occur during git operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The current directory is not inside a git repository.
    #[error("not a git repository")]
    NotARepository,

    /// HEAD is not on a branch.
    #[error("HEAD is detached - check out a branch first")]
    DetachedHead,

    /// The repository has no working tree (bare repository).
    #[error("repository has no working tree")]
    NoWorkingTree,

    /// Adding a remote failed.
    #[error("could not add remote: {0}")]
    RemoteAddFailed(String),

    /// Fetching from a remote failed.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// A rebase control command (abort) failed.
    #[error("rebase failed: {0}")]
    RebaseFailed(String),

    /// A stash operation failed.
    #[error("stash failed: {0}")]
    StashFailed(String),

    /// An underlying git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// Running the git executable failed.
    #[error("could not run git: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for git operations.
pub type Result<T> = std::result::Result<T, Error>;
