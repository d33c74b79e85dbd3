//! Resolution of the `upstream` remote for the current fork.

use tracing::{debug, info};

use upsync_git::{GitOps, GitRunner};
use upsync_github::{CloneProtocol, GitHubApi, RepositoryPath, ServerIdentity};

use crate::outcome::Halt;

/// Name of the remote pointing at the fork's parent repository.
pub const UPSTREAM_REMOTE: &str = "upstream";

/// Name of the remote pointing at the fork itself.
const ORIGIN_REMOTE: &str = "origin";

/// Ensures a local remote named `upstream` points at the fork's parent
/// repository and returns its URL.
///
/// An existing matching remote is reused without touching the network;
/// otherwise the parent is discovered through the hosting API and a new
/// remote is added. The remote is never deleted by this workflow.
pub struct UpstreamResolver<'a, G, R, H> {
    repo: &'a G,
    runner: &'a R,
    api: &'a H,
    server: &'a ServerIdentity,
    protocol: CloneProtocol,
}

#[allow(clippy::future_not_send)]
impl<'a, G: GitOps, R: GitRunner, H: GitHubApi> UpstreamResolver<'a, G, R, H> {
    /// Resolver for the given repository against the given server.
    pub const fn new(
        repo: &'a G,
        runner: &'a R,
        api: &'a H,
        server: &'a ServerIdentity,
        protocol: CloneProtocol,
    ) -> Self {
        Self {
            repo,
            runner,
            api,
            server,
            protocol,
        }
    }

    /// Find or create the `upstream` remote, returning its URL.
    ///
    /// # Errors
    /// Returns [`Halt::Abort`] when the repository is not a fork, and
    /// [`Halt::Fail`] on API or git failures.
    pub async fn resolve(&self) -> Result<String, Halt> {
        if let Some(remote) = self.repo.find_remote(UPSTREAM_REMOTE)? {
            if let Some(url) = remote.url {
                if self.server.matches(&url) {
                    debug!("reusing existing remote {UPSTREAM_REMOTE} -> {url}");
                    return Ok(url);
                }
            }
        }

        let fork = self.fork_path()?;
        let info = self
            .api
            .get_repository(fork.owner(), fork.name())
            .await
            .map_err(|e| Halt::fail(format!("cannot read repository {fork}: {e}")))?;

        let Some(parent) = info.fork_parent() else {
            return Err(Halt::Abort {
                message: format!("{fork} is not a fork; there is no upstream to rebase onto"),
                link: Some(info.html_url.clone()),
            });
        };

        let url = self.server.clone_url(parent, self.protocol);
        info!("adding remote {UPSTREAM_REMOTE} -> {url}");
        self.runner.add_remote(UPSTREAM_REMOTE, &url)?;
        Ok(url)
    }

    /// The fork's own path, read from the remote that points at the
    /// server (preferring `origin`).
    fn fork_path(&self) -> Result<RepositoryPath, Halt> {
        let remotes = self.repo.remotes()?;
        let candidates: Vec<(&str, &str)> = remotes
            .iter()
            .filter_map(|r| r.url.as_deref().map(|url| (r.name.as_str(), url)))
            .filter(|(_, url)| self.server.matches(url))
            .collect();

        let (_, url) = candidates
            .iter()
            .find(|(name, _)| *name == ORIGIN_REMOTE)
            .or_else(|| candidates.first())
            .ok_or_else(|| Halt::fail(format!("no remote points at {}", self.server)))?;

        RepositoryPath::from_remote_url(url).map_err(|e| Halt::fail(e.to_string()))
    }
}
