//! Transient user notifications
//!
//! The terminal stand-in for toasts: a short title plus a description,
//! shown once and never stored in the conversation.

use colored::Colorize;
use std::sync::{Mutex, MutexGuard};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A one-off message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title, description)
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title, description)
    }

    fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Sink for notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints notifications to the terminal
///
/// Success and info go to stdout, errors to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    /// Render without printing
    pub fn render(notification: &Notification) -> String {
        let title = match notification.level {
            NotificationLevel::Success => format!("✓ {}", notification.title).green().bold(),
            NotificationLevel::Info => format!("ℹ {}", notification.title).cyan().bold(),
            NotificationLevel::Error => format!("✗ {}", notification.title).red().bold(),
        };
        if notification.description.is_empty() {
            title.to_string()
        } else {
            format!("{} {}", title, notification.description.dimmed())
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let line = Self::render(&notification);
        match notification.level {
            NotificationLevel::Error => eprintln!("{}", line),
            NotificationLevel::Success | NotificationLevel::Info => println!("{}", line),
        }
    }
}

/// Collects notifications in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Most recent notification
    pub fn last(&self) -> Option<Notification> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(title = %notification.title, "Recorded notification");
        self.lock().push(notification);
    }
}
