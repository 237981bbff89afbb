//! Notifier implementations

use tracing::{info, warn};

use crate::domain::notification::Notifier;

/// Notifier that writes messages to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_success(&self, message: &str) {
        info!(target: "notification", "{}", message);
    }

    fn notify_error(&self, message: &str) {
        warn!(target: "notification", "{}", message);
    }
}

/// Notifier for the command line: success on stdout, errors on stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_success(&self, message: &str) {
        println!("✓ {}", message);
    }

    fn notify_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }
}
