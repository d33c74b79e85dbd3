//! Error types for upsync-core.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in upsync-core operations.
///
/// Expected business outcomes (not a fork, conflicts, user abort) are not
/// errors; they travel as [`crate::SyncOutcome`] values. This type covers
/// the supporting machinery: configuration and the underlying layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Git operation error.
    #[error("git error: {0}")]
    Git(#[from] upsync_git::Error),

    /// GitHub API error.
    #[error(transparent)]
    GitHub(#[from] upsync_github::Error),

    /// TOML parsing error in the config file.
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
