//! Transient feedback messages.

use std::time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Severity of a toast, used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A single message with optional auto-clear.
///
/// ```ignore
/// let mut toast = Toast::with_auto_clear(TOAST_DURATION);
/// toast.success("ABC123: color Verde");
/// assert!(toast.message().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Toast {
    message: Option<(ToastLevel, String)>,
    set_at: Option<Instant>,
    auto_clear_after: Option<Duration>,
}

impl Toast {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_auto_clear(duration: Duration) -> Self {
        Self {
            message: None,
            set_at: None,
            auto_clear_after: Some(duration),
        }
    }

    pub fn set(&mut self, level: ToastLevel, msg: impl Into<String>) {
        self.message = Some((level, msg.into()));
        self.set_at = Some(Instant::now());
    }

    pub fn success(&mut self, msg: impl Into<String>) {
        self.set(ToastLevel::Success, msg);
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.set(ToastLevel::Info, msg);
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.set(ToastLevel::Warning, msg);
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.set(ToastLevel::Error, msg);
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.set_at = None;
    }

    /// Current message, dropping it first if it has expired.
    pub fn message(&mut self) -> Option<(ToastLevel, &str)> {
        if let (Some(set_at), Some(duration)) = (self.set_at, self.auto_clear_after)
            && set_at.elapsed() >= duration
        {
            self.clear();
        }
        self.peek()
    }

    /// Current message without checking expiry.
    #[must_use]
    pub fn peek(&self) -> Option<(ToastLevel, &str)> {
        self.message
            .as_ref()
            .map(|(level, text)| (*level, text.as_str()))
    }
}
