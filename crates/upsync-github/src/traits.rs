//! Trait abstractions for GitHub API operations.
//!
//! This module defines the `GitHubApi` trait which abstracts the hosting
//! service lookups, enabling dependency injection and testability.

use crate::{AuthenticatedUser, RepositoryInfo, Result};

/// Trait for GitHub API operations.
///
/// This trait abstracts the two lookups the fork-sync workflow performs,
/// allowing for:
/// - Dependency injection in the orchestration layer
/// - Mock implementations for testing
pub trait GitHubApi: Send + Sync {
    /// Get the currently authenticated user.
    fn current_user(&self) -> impl std::future::Future<Output = Result<AuthenticatedUser>> + Send;

    /// Get repository metadata by owner and name.
    fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<RepositoryInfo>> + Send;
}
