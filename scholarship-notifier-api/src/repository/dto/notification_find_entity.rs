use bson::{oid::ObjectId, DateTime, Uuid};
use notifier_wire::NotificationKind;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct NotificationFindEntity {
    pub _id: ObjectId,
    pub user_id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime,
}
