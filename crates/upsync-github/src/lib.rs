//! # upsync-github
//!
//! GitHub API integration for Upsync, providing server identity handling,
//! remote URL parsing and the repository/user lookups the fork-sync
//! workflow depends on.
//!
//! # Security
//!
//! Authentication tokens are stored using `SecretString` which automatically
//! zeroizes memory when dropped, reducing credential exposure in memory dumps.

mod auth;
mod client;
mod error;
mod path;
mod server;
mod traits;
mod types;
mod urls;

pub use auth::Auth;
pub use client::GitHubClient;
pub use error::{Error, Result};
pub use path::RepositoryPath;
// Re-export SecretString for constructing Auth::Token
pub use secrecy::SecretString;
pub use server::{CloneProtocol, ServerIdentity};
pub use traits::GitHubApi;
pub use types::{AuthenticatedUser, RepositoryInfo};
