use crate::{
    application::{ApplicationMiddleware, ApplicationState},
    auth::{self, dto::User, JwtAuthorizationValidator, Role},
    dto::{input, output},
    error::Error,
    service::{notifications_service::NotificationsService, realtime_service::RealtimeService},
};
use axum::{
    extract::{ConnectInfo, Path, Query, State, WebSocketUpgrade},
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use bson::oid::ObjectId;
use std::{net::SocketAddr, sync::Arc};
use uuid::Uuid;

pub fn routing(application_middleware: &ApplicationMiddleware) -> Router<ApplicationState> {
    Router::new()
        .route("/api/v1/notifications", post(post_notification))
        .route("/api/v1/notifications", get(get_notifications))
        .route("/api/v1/notifications/read", put(put_notifications_read))
        .route("/api/v1/notifications/:id/read", put(put_notification_read))
        .route("/api/v1/notifications/:id", delete(delete_notification))
        .route("/api/v1/connections/:user_id", delete(delete_connections))
        .route_layer(application_middleware.auth.clone())
        .route("/ws/v1/notifications", get(websocket_upgrade))
}

async fn post_notification(
    Extension(user): Extension<User>,
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Json(notification): Json<input::Notification>,
) -> Result<(StatusCode, Json<output::Notification>), Error> {
    auth::require_all_roles(&user, &[Role::ProduceNotifications])?;

    let notification = notifications_service
        .save_notification(user.id, notification)
        .await?;

    Ok((StatusCode::CREATED, Json(notification)))
}

async fn get_notifications(
    Extension(user): Extension<User>,
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Query(pagination): Query<input::Pagination>,
    Query(filters): Query<input::NotificationFilters>,
) -> Result<Json<output::NotificationList>, Error> {
    let notifications = notifications_service
        .find_notifications(user.id, pagination, filters)
        .await?;

    Ok(Json(notifications))
}

async fn put_notifications_read(
    Extension(user): Extension<User>,
    State(notifications_service): State<Arc<dyn NotificationsService>>,
) -> Result<StatusCode, Error> {
    notifications_service
        .mark_all_notifications_read(user.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn put_notification_read(
    Extension(user): Extension<User>,
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    let id = parse_notification_id(&id)?;

    notifications_service
        .mark_notification_read(id, user.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_notification(
    Extension(user): Extension<User>,
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    let id = parse_notification_id(&id)?;

    notifications_service.delete_notification(id, user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_connections(
    Extension(user): Extension<User>,
    State(realtime_service): State<Arc<dyn RealtimeService>>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, Error> {
    // Users may close only their own connections
    if user.id != user_id {
        return Err(Error::MissingRole);
    }

    realtime_service.close_connections(user_id).await;

    Ok(StatusCode::NO_CONTENT)
}

async fn websocket_upgrade(
    State(jwt_validator): State<JwtAuthorizationValidator>,
    State(realtime_service): State<Arc<dyn RealtimeService>>,
    Query(websocket_token): Query<input::WebSocketToken>,
    headers: HeaderMap,
    ConnectInfo(address): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> Result<Response, Error> {
    let token = auth::resolve_websocket_token(websocket_token.token.as_deref(), &headers)?;
    let user = jwt_validator.decode_user(&token)?;

    tracing::info!(user_id = %user.id, %address, "upgrading websocket connection");

    let response = ws.on_upgrade(move |websocket| async move {
        realtime_service
            .handle_client(user.id, address, websocket)
            .await;
    });

    Ok(response)
}

fn parse_notification_id(id: &str) -> Result<ObjectId, Error> {
    ObjectId::parse_str(id).map_err(|_| Error::NotificationNotExist)
}
