//! Notification presenters.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use super::{Notification, NotificationId, Severity};

/// Displays and hides notifications.
pub trait Notifier {
    fn show(&self, notification: &Notification);
    fn dismiss(&self, id: NotificationId);
}

/// Writes notifications to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show(&self, notification: &Notification) {
        let Notification {
            id,
            category,
            severity,
            message,
            duration,
        } = notification;
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

        match severity {
            Severity::Error => warn!(%id, %category, duration_ms, "{message}"),
            Severity::Success | Severity::Info => info!(%id, %category, duration_ms, "{message}"),
        }
    }

    fn dismiss(&self, id: NotificationId) {
        debug!(%id, "Dismissed notification");
    }
}

/// Something a [`RecordingNotifier`] observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    Shown(Notification),
    Dismissed(NotificationId),
}

/// Captures notifications in memory. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<NotifierEvent>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything observed so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<NotifierEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Notifications shown so far, in order.
    #[must_use]
    pub fn shown(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                NotifierEvent::Shown(n) => Some(n),
                NotifierEvent::Dismissed(_) => None,
            })
            .collect()
    }

    /// Messages of the notifications shown so far.
    #[must_use]
    pub fn shown_messages(&self) -> Vec<String> {
        self.shown().into_iter().map(|n| n.message).collect()
    }

    /// Forget everything observed.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    fn record(&self, event: NotifierEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, notification: &Notification) {
        self.record(NotifierEvent::Shown(notification.clone()));
    }

    fn dismiss(&self, id: NotificationId) {
        self.record(NotifierEvent::Dismissed(id));
    }
}
