use axum::{async_trait, extract::ws::WebSocket};
use notifier_wire::RealtimeEvent;
use std::net::SocketAddr;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RealtimeService: Send + Sync {
    ///
    /// Takes ownership of an authenticated WebSocket,
    /// joins the user's multicast group and drives the
    /// connection until either side closes it.
    ///
    async fn handle_client(&self, user_id: Uuid, address: SocketAddr, websocket: WebSocket);

    ///
    /// Queues event to every open connection of the user.
    /// Delivery is best effort, a user without connections
    /// is not an error.
    ///
    async fn publish(&self, user_id: Uuid, event: RealtimeEvent);

    ///
    /// Forcefully closes all connections of the user.
    ///
    async fn close_connections(&self, user_id: Uuid);
}
