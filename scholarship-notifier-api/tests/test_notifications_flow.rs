mod common;

pub use common::*;
use futures::{SinkExt, StreamExt};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::{json, Value};
use std::{net::SocketAddr, time::Duration};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};
use tokio::time::timeout;
use uuid::Uuid;

type WebSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[tokio::test]
async fn notification_lifecycle_observed_over_websocket() {
    let address = spawn_app().await;

    let client = Client::new();
    let user_id = Uuid::new_v4();
    let user = create_user_jwt(user_id);
    let producer = create_producer_jwt();

    let mut websocket = connect_websocket(address, &create_user_jwt(user_id)).await;

    // create notification
    let response = client
        .post(format!("http://{address}/api/v1/notifications"))
        .bearer_auth(&producer)
        .header(CONTENT_TYPE, "application/json")
        .body(
            json!({
                "user_id": user_id,
                "message": "Your scholarship application has been accepted",
                "kind": "SCHOLARSHIP_ACCEPTED",
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response.json::<Value>().await.unwrap();
    let notification_id = created.get("id").unwrap().as_str().unwrap().to_string();
    assert_eq!(created.get("read").unwrap().as_bool().unwrap(), false);

    // creation announced in real time
    let event = read_event(&mut websocket).await;
    assert_eq!(event.get("event").unwrap().as_str().unwrap(), "new_notification");
    let payload = event.get("payload").unwrap();
    assert_eq!(payload.get("id").unwrap().as_str().unwrap(), notification_id);
    assert_eq!(
        payload.get("message").unwrap().as_str().unwrap(),
        "Your scholarship application has been accepted"
    );

    // notification visible in the list
    let response = client
        .get(format!("http://{address}/api/v1/notifications"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = response.json::<Value>().await.unwrap();
    let items = list.get("items").unwrap().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(
        list.get("pagination")
            .unwrap()
            .get("total")
            .unwrap()
            .as_u64()
            .unwrap(),
        1
    );

    // mark as read
    let response = client
        .put(format!(
            "http://{address}/api/v1/notifications/{notification_id}/read"
        ))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let event = read_event(&mut websocket).await;
    assert_eq!(
        event.get("event").unwrap().as_str().unwrap(),
        "notification_updated"
    );
    let payload = event.get("payload").unwrap();
    assert_eq!(payload.get("read").unwrap().as_bool().unwrap(), true);

    // delete
    let response = client
        .delete(format!(
            "http://{address}/api/v1/notifications/{notification_id}"
        ))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let event = read_event(&mut websocket).await;
    assert_eq!(
        event.get("event").unwrap().as_str().unwrap(),
        "notification_deleted"
    );
    let payload = event.get("payload").unwrap();
    assert_eq!(
        payload.get("notification_id").unwrap().as_str().unwrap(),
        notification_id
    );

    // list is empty again
    let response = client
        .get(format!("http://{address}/api/v1/notifications"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    let list = response.json::<Value>().await.unwrap();
    assert!(list.get("items").unwrap().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn events_are_not_delivered_to_other_users() {
    let address = spawn_app().await;

    let client = Client::new();
    let user_id = Uuid::new_v4();
    let other_user_id = Uuid::new_v4();
    let producer = create_producer_jwt();

    let mut other_websocket = connect_websocket(address, &create_user_jwt(other_user_id)).await;

    create_notification(&client, address, &producer, user_id, "not for you").await;

    // other user receives nothing
    let read_result = timeout(Duration::from_millis(300), other_websocket.next()).await;
    assert!(read_result.is_err());

    // and sees nothing in his list
    let response = client
        .get(format!("http://{address}/api/v1/notifications"))
        .bearer_auth(create_user_jwt(other_user_id))
        .send()
        .await
        .unwrap();
    let list = response.json::<Value>().await.unwrap();
    assert!(list.get("items").unwrap().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn post_notification_without_role_forbidden() {
    let address = spawn_app().await;

    let client = Client::new();

    let response = client
        .post(format!("http://{address}/api/v1/notifications"))
        .bearer_auth(create_user_jwt(Uuid::new_v4()))
        .header(CONTENT_TYPE, "application/json")
        .body(
            json!({
                "user_id": Uuid::new_v4(),
                "message": "message",
                "kind": "INFO",
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn post_notification_with_empty_message_unprocessable() {
    let address = spawn_app().await;

    let client = Client::new();

    let response = client
        .post(format!("http://{address}/api/v1/notifications"))
        .bearer_auth(create_producer_jwt())
        .header(CONTENT_TYPE, "application/json")
        .body(
            json!({
                "user_id": Uuid::new_v4(),
                "message": "  ",
                "kind": "INFO",
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn mark_read_foreign_notification_not_found() {
    let address = spawn_app().await;

    let client = Client::new();
    let owner_id = Uuid::new_v4();
    let producer = create_producer_jwt();

    let notification_id =
        create_notification(&client, address, &producer, owner_id, "owner only").await;

    let response = client
        .put(format!(
            "http://{address}/api/v1/notifications/{notification_id}/read"
        ))
        .bearer_auth(create_user_jwt(Uuid::new_v4()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mark_read_twice_succeeds() {
    let address = spawn_app().await;

    let client = Client::new();
    let user_id = Uuid::new_v4();
    let user = create_user_jwt(user_id);
    let producer = create_producer_jwt();

    let notification_id =
        create_notification(&client, address, &producer, user_id, "read me twice").await;

    for _ in 0..2 {
        let response = client
            .put(format!(
                "http://{address}/api/v1/notifications/{notification_id}/read"
            ))
            .bearer_auth(&user)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}

#[tokio::test]
async fn mark_read_malformed_id_not_found() {
    let address = spawn_app().await;

    let client = Client::new();

    let response = client
        .put(format!(
            "http://{address}/api/v1/notifications/not-an-object-id/read"
        ))
        .bearer_auth(create_user_jwt(Uuid::new_v4()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_foreign_notification_leaves_it_in_place() {
    let address = spawn_app().await;

    let client = Client::new();
    let owner_id = Uuid::new_v4();
    let producer = create_producer_jwt();

    let notification_id =
        create_notification(&client, address, &producer, owner_id, "keep me").await;

    // deletion of someone else's notification reveals nothing
    let response = client
        .delete(format!(
            "http://{address}/api/v1/notifications/{notification_id}"
        ))
        .bearer_auth(create_user_jwt(Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // owner still sees the notification
    let response = client
        .get(format!("http://{address}/api/v1/notifications"))
        .bearer_auth(create_user_jwt(owner_id))
        .send()
        .await
        .unwrap();
    let list = response.json::<Value>().await.unwrap();
    assert_eq!(list.get("items").unwrap().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn mark_all_read_clears_unread_filter() {
    let address = spawn_app().await;

    let client = Client::new();
    let user_id = Uuid::new_v4();
    let user = create_user_jwt(user_id);
    let producer = create_producer_jwt();

    for i in 0..3 {
        create_notification(&client, address, &producer, user_id, &format!("message {i}")).await;
    }

    let response = client
        .put(format!("http://{address}/api/v1/notifications/read"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!(
            "http://{address}/api/v1/notifications?only_unread=true"
        ))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    let list = response.json::<Value>().await.unwrap();
    assert!(list.get("items").unwrap().as_array().unwrap().is_empty());

    // all notifications still present
    let response = client
        .get(format!("http://{address}/api/v1/notifications"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    let list = response.json::<Value>().await.unwrap();
    assert_eq!(list.get("items").unwrap().as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn excessive_limit_is_clamped() {
    let address = spawn_app().await;

    let client = Client::new();
    let user = create_user_jwt(Uuid::new_v4());

    let response = client
        .get(format!(
            "http://{address}/api/v1/notifications?page=1&limit=500"
        ))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let list = response.json::<Value>().await.unwrap();
    let pagination = list.get("pagination").unwrap();
    assert_eq!(pagination.get("limit").unwrap().as_u64().unwrap(), 50);
}

#[tokio::test]
async fn notifications_sorted_from_newest_to_oldest() {
    let address = spawn_app().await;

    let client = Client::new();
    let user_id = Uuid::new_v4();
    let producer = create_producer_jwt();

    for i in 0..3 {
        create_notification(&client, address, &producer, user_id, &format!("message {i}")).await;
    }

    let response = client
        .get(format!("http://{address}/api/v1/notifications"))
        .bearer_auth(create_user_jwt(user_id))
        .send()
        .await
        .unwrap();
    let list = response.json::<Value>().await.unwrap();
    let messages = list
        .get("items")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item.get("message").unwrap().as_str().unwrap().to_string())
        .collect::<Vec<_>>();

    assert_eq!(messages, vec!["message 2", "message 1", "message 0"]);
}

#[tokio::test]
async fn websocket_token_accepted_from_authorization_header() {
    use tokio_tungstenite::tungstenite::{client::IntoClientRequest, http::header::AUTHORIZATION};

    let address = spawn_app().await;
    let token = create_user_jwt(Uuid::new_v4());

    let mut request = format!("ws://{address}/ws/v1/notifications")
        .into_client_request()
        .unwrap();
    request.headers_mut().insert(
        AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );

    let (mut websocket, _) = connect_async(request).await.unwrap();

    ensure_joined(&mut websocket).await;
}

#[tokio::test]
async fn delete_connections_closes_websocket() {
    let address = spawn_app().await;

    let client = Client::new();
    let user_id = Uuid::new_v4();
    let user = create_user_jwt(user_id);

    let mut websocket = connect_websocket(address, &user).await;

    let response = client
        .delete(format!("http://{address}/api/v1/connections/{user_id}"))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // server closes the connection
    loop {
        let message = timeout(Duration::from_secs(1), websocket.next())
            .await
            .unwrap();
        match message {
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
            Some(Ok(_)) => (),
        }
    }
}

#[tokio::test]
async fn delete_connections_of_other_user_forbidden() {
    let address = spawn_app().await;

    let client = Client::new();

    let response = client
        .delete(format!(
            "http://{address}/api/v1/connections/{}",
            Uuid::new_v4(),
        ))
        .bearer_auth(create_user_jwt(Uuid::new_v4()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

///
/// Connects to the real-time channel and waits until the connection
/// task answers a probe. Events published afterwards will reach it.
///
async fn connect_websocket(address: SocketAddr, token: &str) -> WebSocket {
    let (mut websocket, _) = connect_async(ws_url(address, token)).await.unwrap();
    ensure_joined(&mut websocket).await;
    websocket
}

async fn ensure_joined(websocket: &mut WebSocket) {
    websocket
        .send(Message::Text(r#"{"event":"ping"}"#.to_string()))
        .await
        .unwrap();

    loop {
        let message = timeout(Duration::from_secs(1), websocket.next())
            .await
            .unwrap() // timeout
            .unwrap() // stream closed
            .unwrap(); // protocol error
        if let Message::Text(payload) = message {
            assert_eq!(payload, r#"{"event":"pong"}"#);
            break;
        }
    }
}

async fn read_event(websocket: &mut WebSocket) -> Value {
    loop {
        let message = timeout(Duration::from_secs(1), websocket.next())
            .await
            .unwrap() // timeout
            .unwrap() // stream closed
            .unwrap(); // protocol error
        if let Message::Text(payload) = message {
            return serde_json::from_str(&payload).unwrap();
        }
    }
}

async fn create_notification(
    client: &Client,
    address: SocketAddr,
    producer_jwt: &str,
    user_id: Uuid,
    message: &str,
) -> String {
    let response = client
        .post(format!("http://{address}/api/v1/notifications"))
        .bearer_auth(producer_jwt)
        .header(CONTENT_TYPE, "application/json")
        .body(
            json!({
                "user_id": user_id,
                "message": message,
                "kind": "INFO",
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = response.json::<Value>().await.unwrap();
    created.get("id").unwrap().as_str().unwrap().to_string()
}
