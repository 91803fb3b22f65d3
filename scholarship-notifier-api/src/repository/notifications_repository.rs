use super::{dto::Notification, error::Error};
use axum::async_trait;
use bson::oid::ObjectId;
use notifier_wire::NotificationKind;
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsRepository: Send + Sync {
    ///
    /// Inserts new unread notification.
    ///
    async fn insert(
        &self,
        user_id: Uuid,
        message: String,
        kind: NotificationKind,
        created_at: OffsetDateTime,
    ) -> Result<Notification, Error>;

    ///
    /// Finds page of user's notifications ordered
    /// from the newest to the oldest.
    ///
    async fn find_many(
        &self,
        user_id: Uuid,
        skip: u64,
        limit: i64,
        only_unread: bool,
    ) -> Result<Vec<Notification>, Error>;

    ///
    /// Counts user's notifications.
    ///
    async fn count(&self, user_id: Uuid, only_unread: bool) -> Result<u64, Error>;

    ///
    /// Marks notification as read and returns its updated state.
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when
    ///     - notification does not exist
    ///     - notification does not belong to the user
    ///
    async fn update_read(&self, id: ObjectId, user_id: Uuid) -> Result<Notification, Error>;

    ///
    /// Marks all user's notifications as read.
    /// Returns number of updated notifications.
    ///
    async fn update_all_read(&self, user_id: Uuid) -> Result<u64, Error>;

    ///
    /// Deletes notification.
    /// Returns false when notification does not exist
    /// or does not belong to the user.
    ///
    async fn delete(&self, id: ObjectId, user_id: Uuid) -> Result<bool, Error>;
}
