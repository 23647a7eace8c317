//! Transient, dismissible user notifications.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
}

/// Pending notifications, oldest first.
///
/// An identical level+message already queued is not enqueued again.
#[derive(Debug, Default)]
pub struct Notifications {
    queue: Vec<Notification>,
    next_id: u64,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new notification, or `None` when it duplicates a queued one.
    pub fn push(
        &mut self,
        level: NotificationLevel,
        message: impl Into<String>,
    ) -> Option<&Notification> {
        let message = message.into();
        if self
            .queue
            .iter()
            .any(|queued| queued.level == level && queued.message == message)
        {
            return None;
        }
        self.next_id += 1;
        self.queue.push(Notification {
            id: self.next_id,
            level,
            message,
        });
        self.queue.last()
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.queue.len();
        self.queue.retain(|notification| notification.id != id);
        self.queue.len() != before
    }

    pub fn pending(&self) -> &[Notification] {
        &self.queue
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.queue)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
