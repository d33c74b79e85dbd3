//! # upsync-core
//!
//! Core library for Upsync: the fork-synchronization workflow that
//! resolves a fork's upstream repository through the hosting API,
//! fetches its default branch and rebases the current branch onto it.
//!
//! The orchestrator ([`ForkSync`]) takes all of its collaborators as
//! explicit parameters - an API client, a git runner, a repository view,
//! a notification sink and a conflict resolver - so the whole workflow
//! can be driven against mock implementations in tests.

mod cancel;
mod classify;
mod config;
mod error;
mod notify;
mod outcome;
mod resolve;
mod sync;

#[cfg(test)]
mod test_support;

pub use cancel::CancelToken;
pub use classify::{RebaseVerdict, classify};
pub use config::{Config, RemoteProtocol, SaveChangesPolicy};
pub use error::{Error, Result};
pub use notify::{Notification, Notifier, Severity};
pub use outcome::{Halt, SyncOutcome};
pub use resolve::{UPSTREAM_REMOTE, UpstreamResolver};
pub use sync::{ConflictResolution, ConflictResolver, ForkSync};
