//! Process-level git commands with line-streamed rebase output.
//!
//! Inspection goes through git2-rs, but fetch, rebase and stash shell out
//! to the `git` binary so their porcelain output can be watched line by
//! line while the command runs.

use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc;
use std::thread;

use tracing::debug;

use crate::error::{Error, Result};

/// Exit state of a finished git process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitExit {
    code: Option<i32>,
}

impl GitExit {
    /// Exit with the given status code. `None` means the process was
    /// terminated by a signal.
    #[must_use]
    pub const fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    /// Whether the process exited with status zero.
    #[must_use]
    pub const fn success(self) -> bool {
        matches!(self.code, Some(0))
    }

    /// The raw status code, if the process exited normally.
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        self.code
    }
}

enum StreamSource {
    Process {
        lines: mpsc::IntoIter<String>,
        child: Child,
    },
    Canned {
        lines: std::vec::IntoIter<String>,
        exit: GitExit,
    },
}

/// Output lines of a running `git rebase`, stdout and stderr interleaved
/// in arrival order.
///
/// Iterate to exhaustion, then call [`finish`](Self::finish) for the exit
/// state.
pub struct RebaseStream {
    source: StreamSource,
}

impl RebaseStream {
    /// Stream with predetermined lines and exit state, for mock runners.
    #[must_use]
    pub fn canned(lines: Vec<String>, exit: GitExit) -> Self {
        Self {
            source: StreamSource::Canned {
                lines: lines.into_iter(),
                exit,
            },
        }
    }

    fn from_child(mut child: Child) -> Self {
        let (tx, rx) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            spawn_line_reader(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_line_reader(stderr, tx.clone());
        }
        // The receiver ends once both readers hang up.
        drop(tx);
        Self {
            source: StreamSource::Process {
                lines: rx.into_iter(),
                child,
            },
        }
    }

    /// Wait for the process to finish and return its exit state.
    pub fn finish(self) -> Result<GitExit> {
        match self.source {
            StreamSource::Process { lines, mut child } => {
                drop(lines);
                let status = child.wait()?;
                Ok(GitExit::new(status.code()))
            }
            StreamSource::Canned { exit, .. } => Ok(exit),
        }
    }
}

impl Iterator for RebaseStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match &mut self.source {
            StreamSource::Process { lines, .. } => lines.next(),
            StreamSource::Canned { lines, .. } => lines.next(),
        }
    }
}

impl std::fmt::Debug for RebaseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match self.source {
            StreamSource::Process { .. } => "process",
            StreamSource::Canned { .. } => "canned",
        };
        f.debug_struct("RebaseStream")
            .field("source", &source)
            .finish()
    }
}

fn spawn_line_reader(pipe: impl Read + Send + 'static, tx: mpsc::Sender<String>) {
    thread::spawn(move || {
        let reader = BufReader::new(pipe);
        for line in reader.lines().map_while(std::result::Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
}

/// Trait for running the git commands the sync workflow needs.
///
/// Implemented by [`GitCli`]; mock implementations replay canned output
/// in tests.
pub trait GitRunner {
    /// Add a named remote.
    fn add_remote(&self, name: &str, url: &str) -> Result<()>;

    /// Fetch a remote by name.
    fn fetch(&self, remote: &str) -> Result<()>;

    /// Start `git rebase <onto>` and stream its output.
    fn rebase(&self, onto: &str) -> Result<RebaseStream>;

    /// Continue an interrupted rebase after conflicts were resolved.
    ///
    /// A non-zero exit is not an error here; it means conflicts remain.
    fn rebase_continue(&self) -> Result<GitExit>;

    /// Abort an interrupted rebase, restoring the original branch state.
    fn rebase_abort(&self) -> Result<()>;

    /// Stash uncommitted changes. Returns `false` when the tree had
    /// nothing to stash.
    fn stash_push(&self, message: &str) -> Result<bool>;

    /// Restore the most recent stash entry into the working tree.
    fn stash_pop(&self) -> Result<()>;
}

/// Runs the system `git` binary against a fixed working tree.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Runner operating on the given working tree root.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(&self.workdir)
            // Never hang on a credential prompt.
            .env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        debug!("git {}", args.join(" "));
        Ok(self.command(args).output()?)
    }
}

fn stderr_message(output: &Output) -> String {
    let text = String::from_utf8_lossy(&output.stderr);
    let text = text.trim();
    if text.is_empty() {
        format!("git exited with {}", output.status)
    } else {
        text.to_string()
    }
}

impl GitRunner for GitCli {
    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        let output = self.run(&["remote", "add", name, url])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::RemoteAddFailed(stderr_message(&output)))
        }
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        let output = self.run(&["fetch", remote])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::FetchFailed(stderr_message(&output)))
        }
    }

    fn rebase(&self, onto: &str) -> Result<RebaseStream> {
        debug!("git rebase {onto}");
        let child = self
            .command(&["rebase", onto])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        Ok(RebaseStream::from_child(child))
    }

    fn rebase_continue(&self) -> Result<GitExit> {
        debug!("git rebase --continue");
        // GIT_EDITOR=true accepts the default commit message without
        // opening an editor.
        let output = self
            .command(&["rebase", "--continue"])
            .env("GIT_EDITOR", "true")
            .output()?;
        Ok(GitExit::new(output.status.code()))
    }

    fn rebase_abort(&self) -> Result<()> {
        let output = self.run(&["rebase", "--abort"])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::RebaseFailed(stderr_message(&output)))
        }
    }

    fn stash_push(&self, message: &str) -> Result<bool> {
        let output = self.run(&["stash", "push", "-m", message])?;
        if !output.status.success() {
            return Err(Error::StashFailed(stderr_message(&output)));
        }
        // git reports a clean tree on stdout instead of failing.
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(!stdout.contains("No local changes to save"))
    }

    fn stash_pop(&self) -> Result<()> {
        let output = self.run(&["stash", "pop"])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::StashFailed(stderr_message(&output)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    /// Creates a temporary repository with one commit and a runner for it.
    fn init_test_repo() -> (TempDir, GitCli) {
        let dir = TempDir::new().unwrap();
        let raw = git2::Repository::init(dir.path()).unwrap();

        let mut config = raw.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        std::fs::write(dir.path().join("README.md"), "# test\n").unwrap();
        let mut index = raw.index().unwrap();
        index.add_path(Path::new("README.md")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = raw.find_tree(tree_id).unwrap();
        let sig = raw.signature().unwrap();
        raw.commit(Some("HEAD"), &sig, &sig, "initial commit", &tree, &[])
            .unwrap();

        let cli = GitCli::new(dir.path());
        (dir, cli)
    }

    #[test]
    fn test_exit_success_only_on_zero() {
        assert!(GitExit::new(Some(0)).success());
        assert!(!GitExit::new(Some(1)).success());
        assert!(!GitExit::new(None).success());
        assert_eq!(GitExit::new(Some(128)).code(), Some(128));
    }

    #[test]
    fn test_canned_stream_replays_lines_and_exit() {
        let mut stream = RebaseStream::canned(
            vec!["Applying: one".to_string(), "done".to_string()],
            GitExit::new(Some(0)),
        );
        assert_eq!(stream.next().as_deref(), Some("Applying: one"));
        assert_eq!(stream.next().as_deref(), Some("done"));
        assert_eq!(stream.next(), None);
        assert!(stream.finish().unwrap().success());
    }

    #[test]
    fn test_add_remote_is_visible_to_git2() {
        if !git_available() {
            return;
        }
        let (dir, cli) = init_test_repo();
        cli.add_remote("upstream", "https://github.com/acme/widget.git")
            .unwrap();

        let raw = git2::Repository::open(dir.path()).unwrap();
        let remote = raw.find_remote("upstream").unwrap();
        assert_eq!(remote.url(), Some("https://github.com/acme/widget.git"));
    }

    #[test]
    fn test_add_remote_twice_fails() {
        if !git_available() {
            return;
        }
        let (_dir, cli) = init_test_repo();
        cli.add_remote("upstream", "https://github.com/acme/widget.git")
            .unwrap();
        let result = cli.add_remote("upstream", "https://github.com/acme/widget.git");
        assert!(matches!(result, Err(Error::RemoteAddFailed(_))));
    }

    #[test]
    fn test_fetch_unknown_remote_fails() {
        if !git_available() {
            return;
        }
        let (_dir, cli) = init_test_repo();
        let result = cli.fetch("upstream");
        assert!(matches!(result, Err(Error::FetchFailed(_))));
    }

    #[test]
    fn test_rebase_onto_same_commit_reports_up_to_date() {
        if !git_available() {
            return;
        }
        let (dir, cli) = init_test_repo();
        let raw = git2::Repository::open(dir.path()).unwrap();
        let head = raw.head().unwrap().peel_to_commit().unwrap();
        raw.branch("base", &head, false).unwrap();

        let stream = cli.rebase("base").unwrap();
        let mut lines = Vec::new();
        let mut stream = stream;
        for line in stream.by_ref() {
            lines.push(line);
        }
        let exit = stream.finish().unwrap();

        assert!(exit.success());
        assert!(lines.iter().any(|l| l.contains("up to date")));
    }

    #[test]
    fn test_rebase_abort_without_rebase_fails() {
        if !git_available() {
            return;
        }
        let (_dir, cli) = init_test_repo();
        let result = cli.rebase_abort();
        assert!(matches!(result, Err(Error::RebaseFailed(_))));
    }

    #[test]
    fn test_stash_round_trip() {
        if !git_available() {
            return;
        }
        let (dir, cli) = init_test_repo();
        let readme = dir.path().join("README.md");
        std::fs::write(&readme, "# modified\n").unwrap();

        assert!(cli.stash_push("sync checkpoint").unwrap());
        assert_eq!(std::fs::read_to_string(&readme).unwrap(), "# test\n");

        cli.stash_pop().unwrap();
        assert_eq!(std::fs::read_to_string(&readme).unwrap(), "# modified\n");
    }

    #[test]
    fn test_stash_push_on_clean_tree_returns_false() {
        if !git_available() {
            return;
        }
        let (_dir, cli) = init_test_repo();
        assert!(!cli.stash_push("sync checkpoint").unwrap());
    }

    #[test]
    fn test_stash_pop_without_entry_fails() {
        if !git_available() {
            return;
        }
        let (_dir, cli) = init_test_repo();
        let result = cli.stash_pop();
        assert!(matches!(result, Err(Error::StashFailed(_))));
    }
}
