//! GitHub API client.

use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::Auth;
use crate::error::{Error, Result};
use crate::path::RepositoryPath;
use crate::server::ServerIdentity;
use crate::traits::GitHubApi;
use crate::types::{AuthenticatedUser, RepositoryInfo};

// === Internal API response types ===

/// Internal representation of a user from the GitHub API.
#[derive(serde::Deserialize)]
struct ApiUser {
    login: String,
    html_url: String,
}

impl ApiUser {
    fn into_user(self) -> AuthenticatedUser {
        AuthenticatedUser {
            login: self.login,
            html_url: self.html_url,
        }
    }
}

/// Internal representation of a repository from the GitHub API.
#[derive(serde::Deserialize)]
struct ApiRepository {
    name: String,
    #[serde(default)]
    fork: bool,
    html_url: String,
    /// Absent on repositories without any branches.
    default_branch: Option<String>,
    /// Only present on forks (and only in the detailed single-repo payload).
    parent: Option<ApiParentRepository>,
}

/// Parent entry nested inside a fork's repository payload.
#[derive(serde::Deserialize)]
struct ApiParentRepository {
    name: String,
    owner: ApiOwner,
}

#[derive(serde::Deserialize)]
struct ApiOwner {
    login: String,
}

impl ApiRepository {
    fn into_repository_info(self) -> RepositoryInfo {
        RepositoryInfo {
            name: self.name,
            fork: self.fork,
            html_url: self.html_url,
            default_branch: self.default_branch,
            parent: self
                .parent
                .map(|p| RepositoryPath::new(p.owner.login, p.name)),
        }
    }
}

/// Error payload shape returned by the GitHub API.
#[derive(serde::Deserialize)]
struct ApiErrorPayload {
    message: String,
}

/// GitHub API client.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    /// Token stored as `SecretString` for automatic zeroization on drop.
    token: SecretString,
}

impl GitHubClient {
    /// Default GitHub API URL.
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";

    /// Create a new GitHub client against public github.com.
    ///
    /// # Errors
    /// Returns error if authentication fails.
    pub fn new(auth: &Auth) -> Result<Self> {
        Self::with_base_url(auth, Self::DEFAULT_API_URL)
    }

    /// Create a new GitHub client for the given server identity.
    ///
    /// Uses the server's derived REST API URL, so both github.com and
    /// self-hosted instances work transparently.
    ///
    /// # Errors
    /// Returns error if authentication fails.
    pub fn for_server(auth: &Auth, server: &ServerIdentity) -> Result<Self> {
        Self::with_base_url(auth, server.to_api_url())
    }

    /// Create a new GitHub client with a custom API URL.
    ///
    /// # Errors
    /// Returns error if authentication fails.
    pub fn with_base_url(auth: &Auth, base_url: impl Into<String>) -> Result<Self> {
        let token = auth.resolve()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("upsync-cli"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    /// Make a GET request.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            )
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle API response.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.json().await?;
            return Ok(body);
        }

        // Handle error responses
        let status_code = status.as_u16();

        match status_code {
            401 => Err(Error::AuthenticationFailed),
            403 if response
                .headers()
                .get("x-ratelimit-remaining")
                .is_some_and(|v| v == "0") =>
            {
                Err(Error::RateLimited)
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                // Prefer the structured "message" field when the body carries one.
                let message =
                    serde_json::from_str::<ApiErrorPayload>(&text).map_or(text, |p| p.message);
                Err(Error::ApiError {
                    status: status_code,
                    message,
                })
            }
        }
    }

    // === User Operations ===

    /// Get the currently authenticated user.
    ///
    /// # Errors
    /// Returns error if authentication is invalid or the API call fails.
    pub async fn current_user(&self) -> Result<AuthenticatedUser> {
        let user: ApiUser = self.get("/user").await?;
        Ok(user.into_user())
    }

    // === Repository Operations ===

    /// Get repository metadata, including fork parent and default branch.
    ///
    /// # Errors
    /// Returns [`Error::RepoNotFound`] if the repository does not exist or
    /// is not accessible; other failures map to their API error kinds.
    pub async fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryInfo> {
        let repo: ApiRepository = self
            .get(&format!("/repos/{owner}/{name}"))
            .await
            .map_err(|e| match e {
                Error::ApiError { status: 404, .. } => Error::RepoNotFound(format!("{owner}/{name}")),
                other => other,
            })?;

        Ok(repo.into_repository_info())
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("token", &"[redacted]")
            .finish_non_exhaustive()
    }
}

// === Trait Implementation ===

impl GitHubApi for GitHubClient {
    async fn current_user(&self) -> Result<AuthenticatedUser> {
        self.current_user().await
    }

    async fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryInfo> {
        self.get_repository(owner, name).await
    }
}
