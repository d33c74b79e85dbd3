//! Terminal rendering of workflow notifications.

use upsync_core::{Notification, Notifier, Severity};

use crate::output;

/// Notifier that renders to the terminal, never blocking.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub const fn new() -> Self {
        Self
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => {
                output::success(&notification.message);
                if let Some(link) = &notification.link {
                    output::detail(link);
                }
            }
            Severity::Warning => {
                output::warn(&notification.message);
                if let Some(link) = &notification.link {
                    output::detail_err(link);
                }
            }
            Severity::Error => {
                output::error(&notification.message);
                if let Some(link) = &notification.link {
                    output::detail_err(link);
                }
            }
        }
    }
}
