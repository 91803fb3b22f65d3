use crate::repository;

pub use notifier_wire::Notification;

impl From<repository::Notification> for Notification {
    fn from(notification: repository::Notification) -> Self {
        Self {
            id: notification.id.to_hex(),
            user_id: notification.user_id,
            message: notification.message,
            kind: notification.kind,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}
