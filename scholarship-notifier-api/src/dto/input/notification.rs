use notifier_wire::NotificationKind;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct Notification {
    pub user_id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
}
