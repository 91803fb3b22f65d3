use bson::{DateTime, Uuid};
use notifier_wire::NotificationKind;
use serde::Serialize;

#[derive(Serialize)]
pub struct NotificationInsertEntity {
    pub user_id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime,
}
