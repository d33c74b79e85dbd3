//! # upsync-git
//!
//! Git layer for Upsync: repository inspection built on git2-rs, a
//! process runner for the porcelain commands the sync workflow shells
//! out to (fetch, rebase, stash), and detectors that classify rebase
//! output.

mod detect;
mod error;
mod repository;
mod runner;
mod stash;
mod traits;

pub use detect::{
    OverwrittenFilesDetector, RebaseProblemDetector, local_changes_detector,
    untracked_files_detector,
};
pub use error::{Error, Result};
pub use repository::Repository;
pub use runner::{GitCli, GitExit, GitRunner, RebaseStream};
pub use stash::StashGuard;
pub use traits::{GitOps, Remote};
