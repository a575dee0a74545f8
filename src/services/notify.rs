// SPDX-License-Identifier: MIT

//! Notification sink: fire-and-forget user-facing feedback.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        }
    }
}

/// Fire-and-forget notification sink. No response is consumed.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: NoticeLevel);
}

/// Production sink: emits notices as structured log events.
#[derive(Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, level: NoticeLevel) {
        match level {
            NoticeLevel::Error => tracing::warn!(notice = message, "User notice"),
            _ => tracing::info!(notice = message, level = level.as_str(), "User notice"),
        }
    }
}

/// Records notices for assertions in tests.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(String, NoticeLevel)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(String, NoticeLevel)> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.notices().iter().any(|(m, _)| m == message)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, level: NoticeLevel) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((message.to_string(), level));
    }
}
