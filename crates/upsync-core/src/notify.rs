//! Notification sink abstraction.
//!
//! Every terminal outcome of a run reaches the user through this
//! interface; the workflow never blocks on it.

/// How prominently a notification should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Successful or neutral information.
    Info,
    /// The run stopped on a benign condition.
    Warning,
    /// The run failed.
    Error,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short title, e.g. the workflow name.
    pub title: String,
    /// Human-readable message.
    pub message: String,
    /// Rendering severity.
    pub severity: Severity,
    /// Optional follow-up URL.
    pub link: Option<String>,
}

impl Notification {
    /// Notification without a link.
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            link: None,
        }
    }

    /// Attach a follow-up URL.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Sink for user-facing notifications.
pub trait Notifier {
    /// Deliver one notification. Must not block.
    fn notify(&self, notification: Notification);
}
