//! User feedback with duplicate suppression.
//!
//! The [`NotificationGate`] sits between cart commands and whatever displays
//! toasts. It guarantees two things:
//!
//! - An identical message is shown at most once per dedup window (2000 ms by
//!   default), so double clicks and retries do not stack toasts.
//! - Each [`NotificationCategory`] has at most one visible notification; a
//!   new one dismisses its predecessor in the same category first.
//!
//! Presentation is delegated to a [`Notifier`].

mod notifier;

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub use notifier::{Notifier, NotifierEvent, RecordingNotifier, TracingNotifier};

/// Upper bound on remembered messages; the TTL keeps the real set tiny.
const RECENT_CAPACITY: u64 = 512;

/// Bucket enforcing "one visible notification at a time".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    Cart,
    Error,
    General,
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cart => write!(f, "cart"),
            Self::Error => write!(f, "error"),
            Self::General => write!(f, "general"),
        }
    }
}

/// How a notification should be styled; also picks its default duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
    Info,
}

/// Handle for a shown notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A notification handed to the [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub category: NotificationCategory,
    pub severity: Severity,
    pub message: String,
    /// How long the notification stays visible.
    pub duration: Duration,
}

/// Timing configuration for the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    /// How long a shown message suppresses identical messages.
    pub dedup_window: Duration,
    /// Default duration for success notifications.
    pub success_duration: Duration,
    /// Default duration for error notifications.
    pub error_duration: Duration,
    /// Default duration for informational notifications.
    pub info_duration: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            dedup_window: Duration::from_millis(2000),
            success_duration: Duration::from_millis(1500),
            error_duration: Duration::from_millis(2000),
            info_duration: Duration::from_millis(1500),
        }
    }
}

impl GateConfig {
    const fn duration_for(&self, severity: Severity) -> Duration {
        match severity {
            Severity::Success => self.success_duration,
            Severity::Error => self.error_duration,
            Severity::Info => self.info_duration,
        }
    }
}

/// Deduplicating, per-category notification dispatcher.
pub struct NotificationGate<N> {
    notifier: N,
    config: GateConfig,
    recent: Cache<String, ()>,
    active: HashMap<NotificationCategory, NotificationId>,
}

impl<N: Notifier> NotificationGate<N> {
    /// Create a gate presenting through `notifier`.
    #[must_use]
    pub fn new(notifier: N, config: GateConfig) -> Self {
        let recent = Cache::builder()
            .max_capacity(RECENT_CAPACITY)
            .time_to_live(config.dedup_window)
            .build();

        Self {
            notifier,
            config,
            recent,
            active: HashMap::new(),
        }
    }

    /// Show a success message in `category`.
    pub fn success(
        &mut self,
        category: NotificationCategory,
        message: impl Into<String>,
    ) -> Option<NotificationId> {
        self.show(category, Severity::Success, message, None)
    }

    /// Show an error message in the error category.
    pub fn error(&mut self, message: impl Into<String>) -> Option<NotificationId> {
        self.show(NotificationCategory::Error, Severity::Error, message, None)
    }

    /// Show a notification unless the same message was shown recently.
    ///
    /// `duration` overrides the severity default. Returns the new handle, or
    /// `None` when the message was suppressed.
    pub fn show(
        &mut self,
        category: NotificationCategory,
        severity: Severity,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> Option<NotificationId> {
        let message = message.into();
        if self.is_recent(&message) {
            debug!(%category, %message, "Suppressed duplicate notification");
            return None;
        }

        if let Some(previous) = self.active.remove(&category) {
            self.notifier.dismiss(previous);
        }

        let notification = Notification {
            id: NotificationId::generate(),
            category,
            severity,
            duration: duration.unwrap_or_else(|| self.config.duration_for(severity)),
            message,
        };

        self.notifier.show(&notification);
        self.active.insert(category, notification.id);
        self.recent.insert(notification.message, ());

        Some(notification.id)
    }

    /// Whether `message` is inside its dedup window.
    #[must_use]
    pub fn is_recent(&self, message: &str) -> bool {
        self.recent.get(message).is_some()
    }

    /// The visible notification in `category`, if any.
    #[must_use]
    pub fn active(&self, category: NotificationCategory) -> Option<NotificationId> {
        self.active.get(&category).copied()
    }

    /// Dismiss every active notification.
    pub fn dismiss_all(&mut self) {
        for (_, id) in self.active.drain() {
            self.notifier.dismiss(id);
        }
    }

    /// The presenter behind this gate.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::thread;

    use super::*;

    fn gate() -> (NotificationGate<RecordingNotifier>, RecordingNotifier) {
        let recorder = RecordingNotifier::new();
        (
            NotificationGate::new(recorder.clone(), GateConfig::default()),
            recorder,
        )
    }

    #[test]
    fn test_identical_message_suppressed() {
        let (mut gate, recorder) = gate();

        assert!(gate.success(NotificationCategory::Cart, "Added Hammer").is_some());
        assert!(gate.success(NotificationCategory::Cart, "Added Hammer").is_none());
        assert_eq!(recorder.shown_messages(), vec!["Added Hammer"]);
    }

    #[test]
    fn test_same_category_dismisses_previous() {
        let (mut gate, recorder) = gate();

        let first = gate.success(NotificationCategory::Cart, "Added Hammer").unwrap();
        let second = gate.success(NotificationCategory::Cart, "Added Saw").unwrap();

        assert_eq!(gate.active(NotificationCategory::Cart), Some(second));
        assert!(recorder.events().contains(&NotifierEvent::Dismissed(first)));
    }

    #[test]
    fn test_categories_are_independent() {
        let (mut gate, recorder) = gate();

        let cart = gate.success(NotificationCategory::Cart, "Added Hammer").unwrap();
        gate.error("only 2 units available (0 more can be added)").unwrap();

        assert_eq!(gate.active(NotificationCategory::Cart), Some(cart));
        assert!(recorder
            .events()
            .iter()
            .all(|e| !matches!(e, NotifierEvent::Dismissed(_))));
    }

    #[test]
    fn test_default_durations_by_severity() {
        let (mut gate, recorder) = gate();

        gate.success(NotificationCategory::General, "ok").unwrap();
        gate.error("bad").unwrap();
        gate.show(
            NotificationCategory::General,
            Severity::Info,
            "custom",
            Some(Duration::from_millis(5000)),
        )
        .unwrap();

        let durations: Vec<u128> = recorder
            .shown()
            .iter()
            .map(|n| n.duration.as_millis())
            .collect();
        assert_eq!(durations, vec![1500, 2000, 5000]);
    }

    #[test]
    fn test_message_can_repeat_after_window() {
        let recorder = RecordingNotifier::new();
        let mut gate = NotificationGate::new(
            recorder.clone(),
            GateConfig {
                dedup_window: Duration::from_millis(50),
                ..GateConfig::default()
            },
        );

        assert!(gate.error("out of stock").is_some());
        assert!(gate.error("out of stock").is_none());

        thread::sleep(Duration::from_millis(150));
        assert!(!gate.is_recent("out of stock"));
        assert!(gate.error("out of stock").is_some());
        assert_eq!(recorder.shown().len(), 2);
    }

    #[test]
    fn test_dismiss_all_clears_handles() {
        let (mut gate, recorder) = gate();
        gate.success(NotificationCategory::Cart, "a").unwrap();
        gate.error("b").unwrap();

        gate.dismiss_all();

        assert!(gate.active(NotificationCategory::Cart).is_none());
        assert!(gate.active(NotificationCategory::Error).is_none());
        let dismissed = recorder
            .events()
            .iter()
            .filter(|e| matches!(e, NotifierEvent::Dismissed(_)))
            .count();
        assert_eq!(dismissed, 2);
    }
}
