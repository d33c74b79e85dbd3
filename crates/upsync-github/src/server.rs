//! GitHub server location and the URLs derived from it.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::path::RepositoryPath;
use crate::urls;

const API_PREFIX: &str = "api.";
const API_SUFFIX: &str = "/api";
const ENTERPRISE_API_V3_SUFFIX: &str = "/v3";
const GRAPHQL_SUFFIX: &str = "/graphql";

// 1 - schema, 2 - host, 4 - port, 5 - path
#[allow(clippy::unwrap_used)] // literal pattern, always compiles
fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(https?://)?([^/?:]+)(:(\d+))?((?:/[^/?#]+)*)/?$").unwrap()
    })
}

/// A GitHub server location: optional scheme, host, optional port and an
/// optional path suffix for instances served under a sub-path.
///
/// The host is lowercased at construction. An absent scheme is distinct
/// from an explicit `https` one: equality compares all four fields as-is.
/// github.com gets the `api.` subdomain convention for API URLs; every
/// other host is treated as a self-hosted instance using the `/api/v3`
/// path convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerIdentity {
    use_http: Option<bool>,
    host: String,
    port: Option<u16>,
    suffix: Option<String>,
}

/// Protocol used when constructing clone URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloneProtocol {
    /// `https://host/owner/name.git`
    #[default]
    Https,
    /// `git@host:path/owner/name.git`
    Ssh,
}

impl ServerIdentity {
    /// The public GitHub host.
    pub const GITHUB_HOST: &'static str = "github.com";

    /// Identity of the public github.com server.
    #[must_use]
    pub fn github() -> Self {
        Self {
            use_http: None,
            host: Self::GITHUB_HOST.to_string(),
            port: None,
            suffix: None,
        }
    }

    /// Parse a server location of the shape `[scheme://]host[:port][/path]`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidServerUrl`] if the input does not match that
    /// shape, the host is empty, or the port is not a valid integer.
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidServerUrl {
            url: uri.to_string(),
            reason: reason.to_string(),
        };

        let captures = url_pattern()
            .captures(uri)
            .ok_or_else(|| invalid("not a valid URL"))?;

        let use_http = captures
            .get(1)
            .map(|m| m.as_str().eq_ignore_ascii_case("http://"));

        let host = captures.get(2).map_or("", |m| m.as_str());
        if host.is_empty() {
            return Err(invalid("empty host"));
        }

        let port = match captures.get(4) {
            None => None,
            Some(m) => Some(
                m.as_str()
                    .parse::<u16>()
                    .map_err(|_| invalid("invalid port format"))?,
            ),
        };

        let suffix = captures
            .get(5)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            use_http,
            host: host.to_ascii_lowercase(),
            port,
            suffix,
        })
    }

    /// The lowercased host name.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The explicit port, if any.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// The path suffix including its leading `/`, if any.
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// The scheme in effect: `http` only when explicitly requested.
    #[must_use]
    pub fn schema(&self) -> &'static str {
        if self.use_http == Some(true) {
            "http"
        } else {
            "https"
        }
    }

    /// Whether this identity points at public github.com.
    #[must_use]
    pub fn is_github_com(&self) -> bool {
        self.host == Self::GITHUB_HOST
    }

    /// Base browsing URL, always carrying a scheme.
    #[must_use]
    pub fn to_url(&self) -> String {
        format!(
            "{}{}{}{}",
            self.schema_part(),
            self.host,
            self.port_part(),
            self.suffix_str()
        )
    }

    /// REST API base URL.
    ///
    /// github.com uses the `api.` subdomain; self-hosted instances append
    /// `/api/v3` after the suffix.
    #[must_use]
    pub fn to_api_url(&self) -> String {
        if self.is_github_com() {
            format!(
                "{}{}{}{}{}",
                self.schema_part(),
                API_PREFIX,
                self.host,
                self.port_part(),
                self.suffix_str()
            )
        } else {
            format!(
                "{}{}{}{}{}{}",
                self.schema_part(),
                self.host,
                self.port_part(),
                self.suffix_str(),
                API_SUFFIX,
                ENTERPRISE_API_V3_SUFFIX
            )
        }
    }

    /// GraphQL API URL.
    #[must_use]
    pub fn to_graphql_url(&self) -> String {
        if self.is_github_com() {
            format!(
                "{}{}{}{}{}{}",
                self.schema_part(),
                API_PREFIX,
                self.host,
                self.port_part(),
                self.suffix_str(),
                GRAPHQL_SUFFIX
            )
        } else {
            format!(
                "{}{}{}{}{}{}",
                self.schema_part(),
                self.host,
                self.port_part(),
                self.suffix_str(),
                API_SUFFIX,
                GRAPHQL_SUFFIX
            )
        }
    }

    /// Whether a git remote URL belongs to this server.
    ///
    /// The candidate is stripped of protocol and port, then prefix-compared
    /// against `host + suffix`, ignoring ASCII case. Never fails: anything
    /// that cannot be read that way simply does not match.
    #[must_use]
    pub fn matches(&self, git_remote_url: &str) -> bool {
        let candidate = urls::remove_port(&urls::remove_protocol_prefix(git_remote_url));
        let prefix = format!("{}{}", self.host, self.suffix_str());
        candidate
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&prefix))
    }

    /// Canonical clone URL for a repository hosted on this server.
    ///
    /// The produced string is stable for a given identity and path, so it
    /// can be compared against configured remotes.
    #[must_use]
    pub fn clone_url(&self, path: &RepositoryPath, protocol: CloneProtocol) -> String {
        match protocol {
            CloneProtocol::Https => format!(
                "https://{}{}/{}/{}.git",
                self.host,
                self.suffix_str(),
                path.owner(),
                path.name()
            ),
            CloneProtocol::Ssh => {
                let suffix = self
                    .suffix
                    .as_deref()
                    .map(|s| s.strip_prefix('/').unwrap_or(s))
                    .filter(|s| !s.is_empty())
                    .map_or_else(String::new, |s| format!("{s}/"));
                format!(
                    "git@{}:{}{}/{}.git",
                    self.host,
                    suffix,
                    path.owner(),
                    path.name()
                )
            }
        }
    }

    fn schema_part(&self) -> String {
        format!("{}://", self.schema())
    }

    fn port_part(&self) -> String {
        self.port.map_or_else(String::new, |p| format!(":{p}"))
    }

    fn suffix_str(&self) -> &str {
        self.suffix.as_deref().unwrap_or("")
    }
}

impl fmt::Display for ServerIdentity {
    /// Omits the scheme when none was explicitly given, so that
    /// `parse(identity.to_string())` reproduces the identity exactly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.use_http.is_some() {
            write!(f, "{}", self.schema_part())?;
        }
        write!(f, "{}{}{}", self.host, self.port_part(), self.suffix_str())
    }
}
