use super::ApplicationEnv;
use crate::{
    auth::JwtAuthorizationValidator,
    repository::NotificationsRepositoryImpl,
    service::{
        notifications_service::{
            NotificationsService, NotificationsServiceConfig, NotificationsServiceImpl,
        },
        realtime_service::{RealtimeService, RealtimeServiceConfig, RealtimeServiceImpl},
    },
};
use axum::extract::FromRef;
use mongodb::{options::ClientOptions, Client};
use std::sync::Arc;

#[derive(Clone, FromRef)]
pub struct ApplicationState {
    pub notifications_service: Arc<dyn NotificationsService>,
    pub realtime_service: Arc<dyn RealtimeService>,
    pub jwt_validator: JwtAuthorizationValidator,
}

pub struct ApplicationStateToClose {
    pub db_client: Client,
}

pub async fn create_state(
    env: &ApplicationEnv,
) -> anyhow::Result<(ApplicationState, ApplicationStateToClose)> {
    tracing::info!("connecting to database");
    let db_client_options = ClientOptions::parse(&env.db_connection_string).await?;
    let db_client = Client::with_options(db_client_options)?;
    let db = db_client.database(&env.db_name);

    tracing::info!("creating repositories");
    let notifications_repository = NotificationsRepositoryImpl::new(db).await?;
    let notifications_repository = Arc::new(notifications_repository);

    tracing::info!("creating services");
    let config = RealtimeServiceConfig {
        ping_interval: env.websocket_ping_interval,
        connection_buffer_size: env.websocket_connection_buffer_size,
    };
    let realtime_service = RealtimeServiceImpl::new(config);
    let realtime_service: Arc<dyn RealtimeService> = Arc::new(realtime_service);

    let config = NotificationsServiceConfig {
        max_message_len: env.max_message_len,
    };
    let notifications_service = NotificationsServiceImpl::new(
        config,
        notifications_repository,
        Some(realtime_service.clone()),
    );
    let notifications_service = Arc::new(notifications_service);

    let jwt_validator =
        JwtAuthorizationValidator::new(env.jwt_key.clone(), env.jwt_algorithms.clone());

    Ok((
        ApplicationState {
            notifications_service,
            realtime_service,
            jwt_validator,
        },
        ApplicationStateToClose { db_client },
    ))
}
