use super::{realtime_connection::RealtimeConnection, RealtimeService, RealtimeServiceConfig};
use axum::{async_trait, extract::ws::WebSocket};
use futures::StreamExt;
use notifier_wire::RealtimeEvent;
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

pub struct RealtimeServiceImpl {
    config: Arc<RealtimeServiceConfig>,

    users_connections: Arc<RwLock<HashMap<Uuid, broadcast::Sender<Arc<RealtimeEvent>>>>>,
}

impl RealtimeServiceImpl {
    pub fn new(config: RealtimeServiceConfig) -> Self {
        let users_connections = HashMap::new();
        let users_connections = RwLock::new(users_connections);
        let users_connections = Arc::new(users_connections);

        Self {
            config: Arc::new(config),
            users_connections,
        }
    }

    async fn join_group(&self, user_id: Uuid) -> broadcast::Receiver<Arc<RealtimeEvent>> {
        let mut connections = self.users_connections.write().await;
        match connections.get(&user_id) {
            Some(tx) => tx.subscribe(),
            None => {
                let (tx, rx) = broadcast::channel(self.config.connection_buffer_size);
                connections.insert(user_id, tx);
                tracing::debug!(%user_id, "created multicast group");
                rx
            }
        }
    }

    ///
    /// Removes the group once its last connection is gone.
    /// The sender may have been removed already by close_connections.
    ///
    async fn leave_group(&self, user_id: Uuid) {
        let mut connections = self.users_connections.write().await;
        if let Some(tx) = connections.get(&user_id) {
            if tx.receiver_count() == 0 {
                connections.remove(&user_id);
                tracing::debug!(%user_id, "removed multicast group");
            }
        }
    }
}

#[async_trait]
impl RealtimeService for RealtimeServiceImpl {
    async fn handle_client(&self, user_id: Uuid, address: SocketAddr, websocket: WebSocket) {
        let events_rx = self.join_group(user_id).await;
        let (ws_tx, ws_rx) = websocket.split();

        let connection = RealtimeConnection::new(
            self.config.clone(),
            user_id,
            address,
            events_rx,
            ws_tx,
            ws_rx,
        );
        connection.run().await;

        self.leave_group(user_id).await;
    }

    async fn publish(&self, user_id: Uuid, event: RealtimeEvent) {
        let connections = self.users_connections.read().await;
        let Some(tx) = connections.get(&user_id) else {
            tracing::trace!(%user_id, event = event.name(), "no open connections");
            return;
        };

        let event = Arc::new(event);
        let _ = tx.send(event.clone());
        tracing::info!(%user_id, event = event.name(), "queued event to be sent");
    }

    async fn close_connections(&self, user_id: Uuid) {
        let count = {
            let mut connections_lock = self.users_connections.write().await;
            connections_lock.remove(&user_id)
        }
        .map(|tx| tx.receiver_count())
        .unwrap_or(0);

        tracing::info!(%user_id, count, "closing user connections");
    }
}
