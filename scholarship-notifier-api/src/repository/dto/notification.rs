use super::NotificationFindEntity;
use bson::oid::ObjectId;
use notifier_wire::NotificationKind;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone)]
pub struct Notification {
    pub id: ObjectId,
    pub user_id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: OffsetDateTime,
}

impl From<NotificationFindEntity> for Notification {
    fn from(entity: NotificationFindEntity) -> Self {
        Self {
            id: entity._id,
            user_id: entity.user_id.into(),
            message: entity.message,
            kind: entity.kind,
            read: entity.read,
            created_at: entity.created_at.into(),
        }
    }
}
