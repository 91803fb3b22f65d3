use crate::{
    dto::{input, output},
    error::Error,
};
use axum::async_trait;
use bson::oid::ObjectId;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    ///
    /// Save new notification in application
    /// and announce it on the real-time channel.
    ///
    /// ### Returns
    /// created notification
    ///
    /// ### Errors
    /// - [Error::Validation] when
    ///     - message is empty
    /// - [Error::ValidationMessageTooLong] when
    ///     - message is too long
    ///
    async fn save_notification(
        &self,
        producer_id: Uuid,
        notification: input::Notification,
    ) -> Result<output::Notification, Error>;

    ///
    /// Find page of notifications that belong to the user
    /// and match filters
    ///
    /// ### Returns
    /// page of notifications with pagination metadata
    ///
    async fn find_notifications(
        &self,
        user_id: Uuid,
        pagination: input::Pagination,
        filters: input::NotificationFilters,
    ) -> Result<output::NotificationList, Error>;

    ///
    /// Mark notification as read
    /// and announce the update on the real-time channel.
    ///
    /// Marking already read notification succeeds.
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when
    ///     - notification with id does not exist
    ///     - notification does not belong to the user
    ///
    async fn mark_notification_read(&self, id: ObjectId, user_id: Uuid) -> Result<(), Error>;

    ///
    /// Mark all user's notifications as read.
    ///
    /// The update is not announced on the real-time channel,
    /// caller refreshes its state from the store afterwards.
    ///
    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<(), Error>;

    ///
    /// Delete notification
    /// and announce the deletion on the real-time channel.
    ///
    /// Deleting notification that does not exist
    /// or belongs to another user succeeds without any effect.
    ///
    async fn delete_notification(&self, id: ObjectId, user_id: Uuid) -> Result<(), Error>;
}
