//! Notification collaborator
//!
//! Success and error messages surfaced to the user (toasts in the web
//! dashboard, console lines in the CLI). Fire-and-forget.

#[cfg(test)]
use mockall::automock;

/// Sink for user-facing notifications
#[cfg_attr(test, automock)]
pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);

    fn notify_error(&self, message: &str);
}

/// Notifier that discards every message
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify_success(&self, _message: &str) {}

    fn notify_error(&self, _message: &str) {}
}
