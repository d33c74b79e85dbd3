//! Mock collaborators for testing the resolver and the orchestrator.
//!
//! The git mocks share one remote list through an `Rc`, so a remote
//! added through the runner is visible to the repository view, the same
//! way `git remote add` lands in the config git2 reads.

#![allow(clippy::unwrap_used)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;

use upsync_git::{GitExit, GitOps, GitRunner, RebaseStream, Remote};
use upsync_github::{AuthenticatedUser, RepositoryInfo};

use crate::notify::{Notification, Notifier};
use crate::sync::{ConflictResolution, ConflictResolver};

type SharedRemotes = Rc<RefCell<Vec<Remote>>>;

/// A linked repository view and runner over one shared remote list.
pub fn git_fixture() -> (MockGit, MockRunner) {
    let remotes: SharedRemotes = Rc::default();
    (MockGit::new(Rc::clone(&remotes)), MockRunner::new(remotes))
}

/// Mock implementation of `GitOps`.
pub struct MockGit {
    branch: String,
    detached: bool,
    rebasing: bool,
    clean: bool,
    remotes: SharedRemotes,
    workdir: PathBuf,
    git_dir: PathBuf,
}

impl MockGit {
    fn new(remotes: SharedRemotes) -> Self {
        Self {
            branch: "feature".to_string(),
            detached: false,
            rebasing: false,
            clean: true,
            remotes,
            workdir: PathBuf::from("/work"),
            git_dir: PathBuf::from("/work/.git"),
        }
    }

    pub fn with_branch(mut self, name: &str) -> Self {
        self.branch = name.to_string();
        self
    }

    pub fn with_detached_head(mut self) -> Self {
        self.detached = true;
        self
    }

    pub fn with_rebase_in_progress(mut self) -> Self {
        self.rebasing = true;
        self
    }

    pub fn with_dirty_tree(mut self) -> Self {
        self.clean = false;
        self
    }

    pub fn with_remote(self, name: &str, url: &str) -> Self {
        self.remotes.borrow_mut().push(Remote {
            name: name.to_string(),
            url: Some(url.to_string()),
        });
        self
    }

    pub fn remote_names(&self) -> Vec<String> {
        self.remotes.borrow().iter().map(|r| r.name.clone()).collect()
    }
}

impl GitOps for MockGit {
    fn workdir(&self) -> upsync_git::Result<&Path> {
        Ok(&self.workdir)
    }

    fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    fn current_branch(&self) -> upsync_git::Result<String> {
        if self.detached {
            return Err(upsync_git::Error::DetachedHead);
        }
        Ok(self.branch.clone())
    }

    fn head_detached(&self) -> upsync_git::Result<bool> {
        Ok(self.detached)
    }

    fn is_rebasing(&self) -> bool {
        self.rebasing
    }

    fn is_clean(&self) -> upsync_git::Result<bool> {
        Ok(self.clean)
    }

    fn remotes(&self) -> upsync_git::Result<Vec<Remote>> {
        Ok(self.remotes.borrow().clone())
    }
}

/// Mock implementation of `GitRunner` replaying canned rebase output.
pub struct MockRunner {
    remotes: SharedRemotes,
    calls: RefCell<Vec<String>>,
    fetch_error: Option<String>,
    add_remote_error: Option<String>,
    rebase_lines: Vec<String>,
    rebase_exit: GitExit,
}

impl MockRunner {
    fn new(remotes: SharedRemotes) -> Self {
        Self {
            remotes,
            calls: RefCell::new(Vec::new()),
            fetch_error: None,
            add_remote_error: None,
            rebase_lines: Vec::new(),
            rebase_exit: GitExit::new(Some(0)),
        }
    }

    pub fn with_rebase_output(mut self, lines: &[&str], exit_code: i32) -> Self {
        self.rebase_lines = lines.iter().map(ToString::to_string).collect();
        self.rebase_exit = GitExit::new(Some(exit_code));
        self
    }

    pub fn with_fetch_error(mut self, message: &str) -> Self {
        self.fetch_error = Some(message.to_string());
        self
    }

    pub fn with_add_remote_error(mut self, message: &str) -> Self {
        self.add_remote_error = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl GitRunner for MockRunner {
    fn add_remote(&self, name: &str, url: &str) -> upsync_git::Result<()> {
        self.record(format!("add_remote {name} {url}"));
        if let Some(message) = &self.add_remote_error {
            return Err(upsync_git::Error::RemoteAddFailed(message.clone()));
        }
        self.remotes.borrow_mut().push(Remote {
            name: name.to_string(),
            url: Some(url.to_string()),
        });
        Ok(())
    }

    fn fetch(&self, remote: &str) -> upsync_git::Result<()> {
        self.record(format!("fetch {remote}"));
        match &self.fetch_error {
            Some(message) => Err(upsync_git::Error::FetchFailed(message.clone())),
            None => Ok(()),
        }
    }

    fn rebase(&self, onto: &str) -> upsync_git::Result<RebaseStream> {
        self.record(format!("rebase {onto}"));
        Ok(RebaseStream::canned(
            self.rebase_lines.clone(),
            self.rebase_exit,
        ))
    }

    fn rebase_continue(&self) -> upsync_git::Result<GitExit> {
        self.record("rebase_continue".to_string());
        Ok(GitExit::new(Some(0)))
    }

    fn rebase_abort(&self) -> upsync_git::Result<()> {
        self.record("rebase_abort".to_string());
        Ok(())
    }

    fn stash_push(&self, _message: &str) -> upsync_git::Result<bool> {
        self.record("stash_push".to_string());
        Ok(true)
    }

    fn stash_pop(&self) -> upsync_git::Result<()> {
        self.record("stash_pop".to_string());
        Ok(())
    }
}

/// Mock implementation of `GitHubApi` backed by canned responses.
#[derive(Default)]
pub struct MockApi {
    user: Mutex<Option<AuthenticatedUser>>,
    user_lookup_fails: bool,
    repos: Mutex<HashMap<String, RepositoryInfo>>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default().with_user("alice")
    }

    pub fn with_user(self, login: &str) -> Self {
        *self.user.lock().unwrap() = Some(AuthenticatedUser {
            login: login.to_string(),
            html_url: format!("https://github.com/{login}"),
        });
        self
    }

    pub fn with_user_lookup_failure(mut self) -> Self {
        self.user_lookup_fails = true;
        self
    }

    pub fn with_repository(self, owner: &str, repo: RepositoryInfo) -> Self {
        self.repos
            .lock()
            .unwrap()
            .insert(format!("{owner}/{}", repo.name), repo);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl upsync_github::GitHubApi for MockApi {
    async fn current_user(&self) -> upsync_github::Result<AuthenticatedUser> {
        self.record("current_user".to_string());
        if self.user_lookup_fails {
            return Err(upsync_github::Error::ApiError {
                status: 500,
                message: "user lookup exploded".to_string(),
            });
        }
        self.user
            .lock()
            .unwrap()
            .clone()
            .ok_or(upsync_github::Error::AuthenticationFailed)
    }

    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> upsync_github::Result<RepositoryInfo> {
        self.record(format!("get_repository {owner}/{name}"));
        self.repos
            .lock()
            .unwrap()
            .get(&format!("{owner}/{name}"))
            .cloned()
            .ok_or_else(|| upsync_github::Error::RepoNotFound(format!("{owner}/{name}")))
    }
}

/// Notifier that records everything it is given.
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }
}

/// Conflict resolver returning a fixed resolution.
pub struct MockResolver {
    resolution: ConflictResolution,
    invoked: Cell<bool>,
}

impl MockResolver {
    pub fn resolving() -> Self {
        Self {
            resolution: ConflictResolution::Resolved,
            invoked: Cell::new(false),
        }
    }

    pub fn abandoning() -> Self {
        Self {
            resolution: ConflictResolution::Abandoned,
            invoked: Cell::new(false),
        }
    }

    pub fn invoked(&self) -> bool {
        self.invoked.get()
    }
}

impl ConflictResolver for MockResolver {
    fn resolve(&self) -> ConflictResolution {
        self.invoked.set(true);
        self.resolution
    }
}

/// Repository metadata for a fork of `parent_owner/name`.
pub fn fork_info(name: &str, parent_owner: &str) -> RepositoryInfo {
    RepositoryInfo {
        name: name.to_string(),
        fork: true,
        html_url: format!("https://github.com/alice/{name}"),
        default_branch: Some("main".to_string()),
        parent: Some(upsync_github::RepositoryPath::new(parent_owner, name)),
    }
}

/// Repository metadata for a plain, non-fork repository.
pub fn plain_repo_info(owner: &str, name: &str) -> RepositoryInfo {
    RepositoryInfo {
        name: name.to_string(),
        fork: false,
        html_url: format!("https://github.com/{owner}/{name}"),
        default_branch: Some("main".to_string()),
        parent: None,
    }
}
