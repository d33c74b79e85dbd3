//! Terminal outcomes of a fork-sync run.

/// The closed set of states a fork-sync run can end in.
///
/// Exactly one is produced per run; nothing is persisted between runs
/// except the `upstream` remote the workflow may have created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The rebase applied local commits onto the upstream branch.
    Success,

    /// The branch was already level with upstream; nothing changed.
    NothingToUpdate,

    /// The rebase hit conflicts which the user resolved interactively.
    SuccessWithResolvedConflicts,

    /// The run stopped on a benign condition (not a fork, own
    /// repository, cancelled, conflict resolution abandoned).
    Aborted(String),

    /// The run stopped on a hard failure.
    Failed(String),
}

impl SyncOutcome {
    /// Whether the run ended without an abort or failure.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Success | Self::NothingToUpdate | Self::SuccessWithResolvedConflicts
        )
    }
}

/// Early exit from a workflow stage.
///
/// Stages return `Result<T, Halt>` and compose with `?`; the orchestrator
/// turns a `Halt` into the corresponding [`SyncOutcome`] when reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// Benign stop: the workflow has nothing meaningful to do.
    Abort {
        /// Human-readable reason.
        message: String,
        /// Optional browsing URL to attach to the notification.
        link: Option<String>,
    },

    /// Hard stop: something went wrong.
    Fail(String),
}

impl Halt {
    /// A benign abort without a link.
    pub fn abort(message: impl Into<String>) -> Self {
        Self::Abort {
            message: message.into(),
            link: None,
        }
    }

    /// A hard failure.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

// Underlying git/API errors terminate a stage as a hard failure.

impl From<upsync_git::Error> for Halt {
    fn from(err: upsync_git::Error) -> Self {
        Self::Fail(err.to_string())
    }
}

impl From<upsync_github::Error> for Halt {
    fn from(err: upsync_github::Error) -> Self {
        Self::Fail(err.to_string())
    }
}
