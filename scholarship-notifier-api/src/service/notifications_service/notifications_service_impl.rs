use super::{NotificationsService, NotificationsServiceConfig};
use crate::{
    dto::{input, output},
    error::Error,
    repository::{self, NotificationsRepository},
    service::realtime_service::RealtimeService,
};
use axum::async_trait;
use bson::oid::ObjectId;
use notifier_wire::{NotificationDeleted, RealtimeEvent};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

pub struct NotificationsServiceImpl {
    config: NotificationsServiceConfig,
    repository: Arc<dyn NotificationsRepository>,
    realtime_service: Option<Arc<dyn RealtimeService>>,
}

impl NotificationsServiceImpl {
    pub fn new(
        config: NotificationsServiceConfig,
        repository: Arc<dyn NotificationsRepository>,
        realtime_service: Option<Arc<dyn RealtimeService>>,
    ) -> Self {
        Self {
            config,
            repository,
            realtime_service,
        }
    }

    fn validate_save_notification(&self, notification: &input::Notification) -> Result<(), Error> {
        if notification.message.trim().is_empty() {
            return Err(Error::Validation("message cannot be empty"));
        }
        if notification.message.len() > self.config.max_message_len {
            return Err(Error::ValidationMessageTooLong {
                len: notification.message.len(),
                max_len: self.config.max_message_len,
            });
        }

        Ok(())
    }

    ///
    /// Delivery is best effort. Persisted state is already
    /// committed at this point, a user without an open
    /// connection catches up through polling.
    ///
    async fn publish(&self, user_id: Uuid, event: RealtimeEvent) {
        match &self.realtime_service {
            Some(realtime_service) => realtime_service.publish(user_id, event).await,
            None => tracing::debug!(event = event.name(), "real-time channel disabled"),
        }
    }
}

#[async_trait]
impl NotificationsService for NotificationsServiceImpl {
    async fn save_notification(
        &self,
        producer_id: Uuid,
        notification: input::Notification,
    ) -> Result<output::Notification, Error> {
        tracing::info!(%producer_id, "creating notification");
        tracing::trace!(?notification);

        self.validate_save_notification(&notification)?;

        let inserted_notification = self
            .repository
            .insert(
                notification.user_id,
                notification.message,
                notification.kind,
                OffsetDateTime::now_utc(),
            )
            .await?;

        let notification = output::Notification::from(inserted_notification);
        tracing::info!(id = %notification.id, "created notification");

        self.publish(
            notification.user_id,
            RealtimeEvent::NewNotification(notification.clone()),
        )
        .await;

        Ok(notification)
    }

    async fn find_notifications(
        &self,
        user_id: Uuid,
        pagination: input::Pagination,
        filters: input::NotificationFilters,
    ) -> Result<output::NotificationList, Error> {
        tracing::info!("finding notifications");
        tracing::trace!(?filters);

        let page = pagination.effective_page();
        let limit = pagination.effective_limit();
        let skip = u64::from(page - 1) * u64::from(limit);

        let notifications = self
            .repository
            .find_many(user_id, skip, i64::from(limit), filters.only_unread)
            .await?;
        let total = self.repository.count(user_id, filters.only_unread).await?;
        tracing::info!(count = notifications.len(), total, "found notifications");

        let items = notifications
            .into_iter()
            .map(output::Notification::from)
            .collect();

        Ok(output::NotificationList {
            items,
            pagination: output::PaginationMetadata::new(total, page, limit),
        })
    }

    async fn mark_notification_read(&self, id: ObjectId, user_id: Uuid) -> Result<(), Error> {
        tracing::info!(id = id.to_hex(), "marking notification as read");

        let notification = self
            .repository
            .update_read(id, user_id)
            .await
            .map_err(|err| match err {
                repository::Error::NoDocumentUpdated => Error::NotificationNotExist,
                err => Error::Database(err),
            })?;

        tracing::info!(id = id.to_hex(), "marked notification as read");

        self.publish(
            user_id,
            RealtimeEvent::NotificationUpdated(notification.into()),
        )
        .await;

        Ok(())
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<(), Error> {
        tracing::info!("marking all notifications as read");

        let count = self.repository.update_all_read(user_id).await?;
        tracing::info!(count, "marked all notifications as read");

        Ok(())
    }

    async fn delete_notification(&self, id: ObjectId, user_id: Uuid) -> Result<(), Error> {
        tracing::info!(id = id.to_hex(), "deleting notification");

        let deleted = self.repository.delete(id, user_id).await?;
        if !deleted {
            tracing::info!(id = id.to_hex(), "notification was already gone");
            return Ok(());
        }

        tracing::info!(id = id.to_hex(), "deleted notification");

        self.publish(
            user_id,
            RealtimeEvent::NotificationDeleted(NotificationDeleted {
                notification_id: id.to_hex(),
            }),
        )
        .await;

        Ok(())
    }
}
