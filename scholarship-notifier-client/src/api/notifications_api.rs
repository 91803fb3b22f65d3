use super::Error;
use async_trait::async_trait;
use notifier_wire::NotificationList;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsApi: Send + Sync {
    ///
    /// Fetch one page of the user's notifications, newest first
    ///
    async fn list_notifications(
        &self,
        page: u32,
        limit: u32,
        only_unread: bool,
    ) -> Result<NotificationList, Error>;

    ///
    /// Mark a single notification as read
    ///
    async fn mark_notification_read(&self, id: &str) -> Result<(), Error>;

    ///
    /// Mark every notification of the user as read
    ///
    async fn mark_all_notifications_read(&self) -> Result<(), Error>;

    ///
    /// Delete a single notification
    ///
    async fn delete_notification(&self, id: &str) -> Result<(), Error>;
}
