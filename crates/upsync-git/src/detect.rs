//! Detectors that recognize well-known git messages in rebase output.
//!
//! Git signals most rebase problems only through porcelain text, so the
//! sync workflow feeds every output line through these detectors and
//! reads the accumulated flags back once the process exits.

/// Rebase output fragments that indicate a merge conflict.
///
/// Compared against lowercased output lines.
const CONFLICT_INDICATORS: &[&str] = &[
    "merge conflict in",
    "falling back to patching base and 3-way merge...",
    "resolve all conflicts manually, mark them as resolved with",
    "could not apply",
];

/// Rebase output fragments printed when a commit becomes empty because
/// its changes are already upstream.
///
/// Compared against lowercased output lines.
const NO_CHANGE_INDICATORS: &[&str] = &[
    "no changes - did you forget to use 'git add'?",
    "no changes -- patch already applied.",
    "nothing to commit, working tree clean",
];

/// Printed when the branch already contains everything it would be
/// rebased onto.
const UP_TO_DATE_INDICATOR: &str = "is up to date";

/// Accumulates problem signals from `git rebase` output lines.
#[derive(Debug, Default)]
pub struct RebaseProblemDetector {
    merge_conflict: bool,
    no_change: bool,
    up_to_date: bool,
}

impl RebaseProblemDetector {
    /// Detector with no signals recorded yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect one output line.
    pub fn feed(&mut self, line: &str) {
        let line = line.to_lowercase();
        if CONFLICT_INDICATORS.iter().any(|m| line.contains(m)) {
            self.merge_conflict = true;
        }
        if NO_CHANGE_INDICATORS.iter().any(|m| line.contains(m)) {
            self.no_change = true;
        }
        if line.contains(UP_TO_DATE_INDICATOR) {
            self.up_to_date = true;
        }
    }

    /// Whether the output reported a merge conflict.
    #[must_use]
    pub const fn merge_conflict(&self) -> bool {
        self.merge_conflict
    }

    /// Whether the output reported an already-applied patch.
    #[must_use]
    pub const fn no_change(&self) -> bool {
        self.no_change
    }

    /// Whether the output reported the branch as already up to date.
    #[must_use]
    pub const fn up_to_date(&self) -> bool {
        self.up_to_date
    }
}

/// Watches for git refusing an operation because files would be
/// overwritten, and collects the file list printed after the message.
///
/// Git prints the affected paths as indented lines between the refusal
/// message and a closing instruction, so the detector gathers indented
/// lines while between the two markers.
#[derive(Debug)]
pub struct OverwrittenFilesDetector {
    start_markers: &'static [&'static str],
    end_markers: &'static [&'static str],
    detected: bool,
    gathering: bool,
    files: Vec<String>,
}

impl OverwrittenFilesDetector {
    const fn new(
        start_markers: &'static [&'static str],
        end_markers: &'static [&'static str],
    ) -> Self {
        Self {
            start_markers,
            end_markers,
            detected: false,
            gathering: false,
            files: Vec::new(),
        }
    }

    /// Inspect one output line.
    pub fn feed(&mut self, line: &str) {
        if self.start_markers.iter().any(|m| line.contains(m)) {
            self.detected = true;
            self.gathering = true;
            return;
        }
        if self.gathering {
            if self.end_markers.iter().any(|m| line.contains(m)) {
                self.gathering = false;
            } else if line.starts_with(char::is_whitespace) && !line.trim().is_empty() {
                self.files.push(line.trim().to_string());
            }
        }
    }

    /// Whether the refusal message was seen.
    #[must_use]
    pub const fn detected(&self) -> bool {
        self.detected
    }

    /// Paths git listed as affected.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }
}

/// Detector for untracked files that the rebase would overwrite.
#[must_use]
pub const fn untracked_files_detector() -> OverwrittenFilesDetector {
    OverwrittenFilesDetector::new(
        &[
            "untracked working tree files would be overwritten by",
            "Untracked working tree file",
        ],
        &["move or remove them before you"],
    )
}

/// Detector for local modifications that the rebase would overwrite.
#[must_use]
pub const fn local_changes_detector() -> OverwrittenFilesDetector {
    OverwrittenFilesDetector::new(
        &["Your local changes to the following files would be overwritten by checkout"],
        &["commit your changes or stash them"],
    )
}
