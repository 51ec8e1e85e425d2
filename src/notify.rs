// Notification surface and fetch outcome tracking.
//
// Every failure in the dashboard ends up here as something the user can
// read: a toast-style line on the terminal and, for the views, a LoadState
// the renderer checks before drawing rows.

use colored::Colorize;
use tracing::{info, warn};

/// Outcome of the most recent fetch feeding a view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing fetched yet.
    #[default]
    Idle,
    Loading,
    /// Fetch succeeded with this many records.
    Ready(usize),
    /// Fetch succeeded but returned nothing.
    Empty,
    /// Fetch failed; the message is shown in place of data.
    Failed(String),
}

impl LoadState {
    /// State for a successful fetch of `count` records.
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            LoadState::Empty
        } else {
            LoadState::Ready(count)
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Warning,
    Error,
}

/// Transient user-facing message sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotifyLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotifyLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(NotifyLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotifyLevel::Error, message);
    }
}

/// Prints notifications as colored lines and mirrors them to the log.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        match level {
            NotifyLevel::Success => {
                info!(message, "notification");
                println!("{} {}", "✓".green().bold(), message);
            }
            NotifyLevel::Warning => {
                warn!(message, "notification");
                println!("{} {}", "!".yellow().bold(), message.yellow());
            }
            NotifyLevel::Error => {
                warn!(message, "error notification");
                eprintln!("{} {}", "✗".red().bold(), message.red());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<(NotifyLevel, String)>>);

    impl Notifier for Recorder {
        fn notify(&self, level: NotifyLevel, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[test]
    fn helper_methods_route_levels() {
        let rec = Recorder(Mutex::new(Vec::new()));
        rec.success("ok");
        rec.warning("hmm");
        rec.error("bad");
        let seen = rec.0.lock().unwrap();
        assert_eq!(seen[0].0, NotifyLevel::Success);
        assert_eq!(seen[1].0, NotifyLevel::Warning);
        assert_eq!(seen[2], (NotifyLevel::Error, "bad".to_string()));
    }

    #[test]
    fn load_state_from_count() {
        assert_eq!(LoadState::from_count(0), LoadState::Empty);
        assert_eq!(LoadState::from_count(3), LoadState::Ready(3));
        assert!(LoadState::Failed("x".into()).is_failed());
    }
}
