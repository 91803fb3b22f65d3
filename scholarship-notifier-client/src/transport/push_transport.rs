use super::ReconnectBackoff;
use crate::{config::ClientConfig, NotificationsClient};
use futures::{SinkExt, StreamExt};
use notifier_wire::{Probe, RealtimeEvent};
use tokio::{net::TcpStream, sync::watch, task::JoinHandle, time::Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WebSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum Disconnect {
    Client,
    Server,
}

///
/// Websocket connection to the realtime channel.
///
/// Keeps the connection alive with application level ping probes and
/// reconnects with exponential backoff when it drops. Every successful
/// connect forces a refresh, events missed while disconnected would
/// otherwise stay invisible until the next poll.
///
pub struct PushTransport {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PushTransport {
    ///
    /// Connect to `url` and keep the connection running in a background
    /// task until [`Self::stop`] or until the reconnect attempts run out.
    ///
    pub fn start(url: String, client: NotificationsClient) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(url, client, shutdown_rx));

        Self {
            shutdown_tx,
            handle,
        }
    }

    ///
    /// Close the connection and wait for the background task to end
    ///
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}

#[tracing::instrument(name = "RealtimeChannel", skip_all)]
async fn run(url: String, client: NotificationsClient, mut shutdown_rx: watch::Receiver<bool>) {
    let config = client.config().clone();
    let mut backoff = ReconnectBackoff::new(
        config.reconnect_initial_delay,
        config.reconnect_max_delay,
        config.reconnect_max_attempts,
    );

    loop {
        if *shutdown_rx.borrow() {
            return;
        }

        match connect_async(url.as_str()).await {
            Ok((websocket, _)) => {
                tracing::info!("connected");
                client.set_push_connected(true);
                backoff.reset();
                client.refresh(true).await;

                let disconnect =
                    drive_connection(websocket, &client, &config, &mut shutdown_rx).await;
                client.set_push_connected(false);

                match disconnect {
                    Disconnect::Client => return,
                    Disconnect::Server => tracing::warn!("disconnected"),
                }
            }
            Err(err) => tracing::warn!(err = %err, "connect failed"),
        }

        let Some(delay) = backoff.next_delay() else {
            tracing::warn!("reconnect attempts exhausted");
            return;
        };
        tokio::select! {
            _ = tokio::time::sleep(delay) => (),
            _ = shutdown_rx.changed() => return,
        }
    }
}

async fn drive_connection(
    mut websocket: WebSocket,
    client: &NotificationsClient,
    config: &ClientConfig,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> Disconnect {
    let mut ping_time = Instant::now() + config.ping_interval;
    let mut pings_unanswered = 0_u32;

    loop {
        tokio::select! {
            biased;

            _ = shutdown_rx.changed() => {
                let _ = websocket.close(None).await;
                return Disconnect::Client;
            }

            _ = tokio::time::sleep_until(ping_time) => {
                if pings_unanswered > 1 {
                    tracing::warn!("server unresponsive");
                    let _ = websocket.close(None).await;
                    return Disconnect::Server;
                }

                match serde_json::to_string(&Probe::Ping) {
                    Ok(json) => {
                        if websocket.send(Message::Text(json)).await.is_err() {
                            return Disconnect::Server;
                        }
                        pings_unanswered += 1;
                    }
                    Err(err) => tracing::error!(err = %err, "failed to serialize ping probe"),
                }
                ping_time = Instant::now() + config.ping_interval;
            }

            message = websocket.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    if let Ok(event) = serde_json::from_str::<RealtimeEvent>(&text) {
                        tracing::info!(event = event.name(), "event received");
                        client.apply_push_event(&event);
                    } else if let Ok(Probe::Pong) = serde_json::from_str::<Probe>(&text) {
                        pings_unanswered = 0;
                    } else {
                        tracing::warn!("unexpected text message received");
                    }
                }
                // protocol level pings are answered by the websocket library
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => (),
                Some(Ok(Message::Close(_))) => return Disconnect::Server,
                Some(Ok(_)) => tracing::warn!("unexpected message received"),
                Some(Err(err)) => {
                    tracing::warn!(err = %err, "websocket error");
                    return Disconnect::Server;
                }
                None => return Disconnect::Server,
            }
        }
    }
}
