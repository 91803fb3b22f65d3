#![allow(dead_code)]

use axum::async_trait;
use bson::oid::ObjectId;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use notifier_wire::NotificationKind;
use scholarship_notifier_api::{
    application::{create_application, ApplicationMiddleware, ApplicationState},
    auth::JwtAuthorizationValidator,
    repository::{self, NotificationsRepository},
    service::{
        notifications_service::{NotificationsServiceConfig, NotificationsServiceImpl},
        realtime_service::{RealtimeService, RealtimeServiceConfig, RealtimeServiceImpl},
    },
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower_http::{
    limit::RequestBodyLimitLayer, trace::TraceLayer,
    validate_request::ValidateRequestHeaderLayer,
};
use uuid::Uuid;

pub const JWT_SECRET: &[u8] = b"some secret";
pub const PRODUCE_NOTIFICATIONS_ROLE: &str = "scholarship_notifier_produce_notifications";
pub const MAX_MESSAGE_LEN: usize = 2048;

///
/// Notifications store backed by a Vec.
/// Keeps integration tests independent from a running database.
///
#[derive(Default)]
pub struct InMemoryNotificationsRepository {
    notifications: Mutex<Vec<repository::Notification>>,
}

#[async_trait]
impl NotificationsRepository for InMemoryNotificationsRepository {
    async fn insert(
        &self,
        user_id: Uuid,
        message: String,
        kind: NotificationKind,
        created_at: OffsetDateTime,
    ) -> Result<repository::Notification, repository::Error> {
        let notification = repository::Notification {
            id: ObjectId::new(),
            user_id,
            message,
            kind,
            read: false,
            created_at,
        };

        let mut notifications = self.notifications.lock().await;
        notifications.push(notification.clone());

        Ok(notification)
    }

    async fn find_many(
        &self,
        user_id: Uuid,
        skip: u64,
        limit: i64,
        only_unread: bool,
    ) -> Result<Vec<repository::Notification>, repository::Error> {
        let notifications = self.notifications.lock().await;

        let mut found = notifications
            .iter()
            .filter(|notification| notification.user_id == user_id)
            .filter(|notification| !only_unread || !notification.read)
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(found
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, user_id: Uuid, only_unread: bool) -> Result<u64, repository::Error> {
        let notifications = self.notifications.lock().await;

        let count = notifications
            .iter()
            .filter(|notification| notification.user_id == user_id)
            .filter(|notification| !only_unread || !notification.read)
            .count();

        Ok(count as u64)
    }

    async fn update_read(
        &self,
        id: ObjectId,
        user_id: Uuid,
    ) -> Result<repository::Notification, repository::Error> {
        let mut notifications = self.notifications.lock().await;

        let notification = notifications
            .iter_mut()
            .find(|notification| notification.id == id && notification.user_id == user_id)
            .ok_or(repository::Error::NoDocumentUpdated)?;
        notification.read = true;

        Ok(notification.clone())
    }

    async fn update_all_read(&self, user_id: Uuid) -> Result<u64, repository::Error> {
        let mut notifications = self.notifications.lock().await;

        let mut count = 0;
        notifications
            .iter_mut()
            .filter(|notification| notification.user_id == user_id && !notification.read)
            .for_each(|notification| {
                notification.read = true;
                count += 1;
            });

        Ok(count)
    }

    async fn delete(&self, id: ObjectId, user_id: Uuid) -> Result<bool, repository::Error> {
        let mut notifications = self.notifications.lock().await;

        let len_before = notifications.len();
        notifications
            .retain(|notification| !(notification.id == id && notification.user_id == user_id));

        Ok(notifications.len() != len_before)
    }
}

///
/// Starts application on a random port.
///
/// ### Returns
/// address the application listens on
///
pub async fn spawn_app() -> SocketAddr {
    let jwt_validator = JwtAuthorizationValidator::new(
        DecodingKey::from_secret(JWT_SECRET),
        vec![Algorithm::HS256],
    );

    let repository = Arc::new(InMemoryNotificationsRepository::default());

    let realtime_service: Arc<dyn RealtimeService> =
        Arc::new(RealtimeServiceImpl::new(RealtimeServiceConfig {
            ping_interval: Duration::from_secs(30),
            connection_buffer_size: 16,
        }));

    let notifications_service = Arc::new(NotificationsServiceImpl::new(
        NotificationsServiceConfig {
            max_message_len: MAX_MESSAGE_LEN,
        },
        repository,
        Some(realtime_service.clone()),
    ));

    let state = ApplicationState {
        notifications_service,
        realtime_service,
        jwt_validator: jwt_validator.clone(),
    };
    let middleware = ApplicationMiddleware {
        auth: ValidateRequestHeaderLayer::custom(jwt_validator),
        body_limit: RequestBodyLimitLayer::new(64 * 1024),
        trace: TraceLayer::new_for_http(),
    };

    let app = create_application(state, middleware);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    address
}

pub fn create_jwt(user_id: Uuid, roles: &[&str]) -> String {
    let claims = json!({
        "sub": user_id,
        "exp": 253402210800_i64,
        "realm_access": {
            "roles": roles,
        }
    });

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET),
    )
    .unwrap()
}

pub fn create_user_jwt(user_id: Uuid) -> String {
    create_jwt(user_id, &[])
}

pub fn create_producer_jwt() -> String {
    create_jwt(Uuid::new_v4(), &[PRODUCE_NOTIFICATIONS_ROLE])
}

pub fn ws_url(address: SocketAddr, token: &str) -> String {
    format!("ws://{address}/ws/v1/notifications?token={token}")
}
