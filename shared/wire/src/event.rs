use super::Notification;
use serde::{Deserialize, Serialize};

///
/// Event pushed over the realtime channel.
///
/// Delivery is best effort. Clients must not rely on receiving
/// every event and reconcile through the list endpoint instead.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum RealtimeEvent {
    NewNotification(Notification),
    NotificationUpdated(Notification),
    NotificationDeleted(NotificationDeleted),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDeleted {
    pub notification_id: String,
}

impl RealtimeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RealtimeEvent::NewNotification(_) => "new_notification",
            RealtimeEvent::NotificationUpdated(_) => "notification_updated",
            RealtimeEvent::NotificationDeleted(_) => "notification_deleted",
        }
    }
}

///
/// Liveness probe pair. Carries no payload and has no correctness
/// role, it only lets the client detect a dead connection promptly.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Probe {
    Ping,
    Pong,
}
