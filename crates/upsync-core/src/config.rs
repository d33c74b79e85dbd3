//! Configuration management for Upsync.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use upsync_github::{CloneProtocol, ServerIdentity};

use crate::error::Result;

/// Upsync configuration loaded from `.git/upsync/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Sync behavior settings.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Remote URL settings.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load config from a TOML file. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if the file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// The server identity to sync against.
    ///
    /// Defaults to github.com when no host is configured.
    ///
    /// # Errors
    /// Returns error if the configured host string does not parse.
    pub fn server_identity(&self) -> std::result::Result<ServerIdentity, upsync_github::Error> {
        match &self.server.host {
            Some(host) => ServerIdentity::parse(host),
            None => Ok(ServerIdentity::github()),
        }
    }
}

/// What to do with uncommitted changes before the rebase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveChangesPolicy {
    /// Stash changes before the rebase and restore them afterwards.
    #[default]
    Stash,
    /// Leave the working tree alone and let the rebase refuse if it must.
    Keep,
}

/// Sync behavior settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    /// Uncommitted-changes policy applied before the rebase.
    #[serde(default)]
    pub save_changes: SaveChangesPolicy,
}

/// Protocol used for clone URLs of remotes this tool creates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteProtocol {
    /// `https://host/owner/name.git`
    #[default]
    Https,
    /// `git@host:path/owner/name.git`
    Ssh,
}

impl From<RemoteProtocol> for CloneProtocol {
    fn from(protocol: RemoteProtocol) -> Self {
        match protocol {
            RemoteProtocol::Https => Self::Https,
            RemoteProtocol::Ssh => Self::Ssh,
        }
    }
}

/// Remote URL settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Clone URL protocol for the created `upstream` remote.
    #[serde(default)]
    pub protocol: RemoteProtocol,
}

/// Server settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server location string, e.g. `ghe.corp.example:8080/github`.
    ///
    /// Absent means public github.com.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}
