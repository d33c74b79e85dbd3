//! Classification of a finished rebase into a verdict.
//!
//! Pure function over the process exit state and the detectors that
//! watched its output. The precedence on failure is load-bearing: a
//! destructive-overwrite refusal must never be presented as a resolvable
//! conflict, and a genuine conflict must never be hidden behind a
//! generic failure message.

use upsync_git::{GitExit, OverwrittenFilesDetector, RebaseProblemDetector};

/// How many trailing output lines an unrecognized failure carries.
const TRANSCRIPT_TAIL: usize = 10;

/// What the rebase output amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebaseVerdict {
    /// The rebase applied commits and exited cleanly.
    CleanSuccess,

    /// The branch was already level with the target.
    UpToDate,

    /// Git refused because untracked files would be overwritten.
    /// Blocking; never auto-resolved.
    BlockedByUntrackedFiles(Vec<String>),

    /// Git refused because local modifications would be overwritten.
    /// Blocking; never auto-resolved.
    BlockedByLocalChanges(Vec<String>),

    /// The rebase stopped on merge conflicts awaiting resolution.
    Conflicts,

    /// The patch is already contained in the target; nothing to apply.
    NothingToApply,

    /// Failure with no recognized signal; carries the output tail for
    /// diagnostics.
    Unrecognized(String),
}

/// Classify a finished rebase.
///
/// `transcript` is the full accumulated output, consulted only for the
/// unrecognized case.
#[must_use]
pub fn classify(
    exit: GitExit,
    problems: &RebaseProblemDetector,
    untracked: &OverwrittenFilesDetector,
    local: &OverwrittenFilesDetector,
    transcript: &[String],
) -> RebaseVerdict {
    if exit.success() {
        if problems.up_to_date() {
            return RebaseVerdict::UpToDate;
        }
        return RebaseVerdict::CleanSuccess;
    }

    if untracked.detected() {
        return RebaseVerdict::BlockedByUntrackedFiles(untracked.files().to_vec());
    }
    if local.detected() {
        return RebaseVerdict::BlockedByLocalChanges(local.files().to_vec());
    }
    if problems.merge_conflict() {
        return RebaseVerdict::Conflicts;
    }
    if problems.no_change() {
        return RebaseVerdict::NothingToApply;
    }

    let tail: Vec<&str> = transcript
        .iter()
        .rev()
        .take(TRANSCRIPT_TAIL)
        .rev()
        .map(String::as_str)
        .collect();
    RebaseVerdict::Unrecognized(tail.join("\n"))
}
