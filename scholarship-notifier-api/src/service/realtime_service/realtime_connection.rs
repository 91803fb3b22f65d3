use super::{dto::RealtimeServiceConfig, error::Error};
use anyhow::anyhow;
use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};
use notifier_wire::{Probe, RealtimeEvent};
use std::{fmt::Display, net::SocketAddr, sync::Arc};
use tokio::{
    sync::broadcast,
    time::{sleep_until, Instant},
};
use uuid::Uuid;

pub struct RealtimeConnection<WebSocketSink, WebSocketStream> {
    config: Arc<RealtimeServiceConfig>,

    user_id: Uuid,
    user_address: SocketAddr,

    events_rx: broadcast::Receiver<Arc<RealtimeEvent>>,
    ws_tx: WebSocketSink,
    ws_rx: WebSocketStream,

    ping_time: Instant,
    ping_message: u32,
    pings_sent: u8,
}

impl<WebSocketSink, WebSocketStream, SinkError, StreamError>
    RealtimeConnection<WebSocketSink, WebSocketStream>
where
    WebSocketSink: Sink<Message, Error = SinkError> + Unpin,
    WebSocketStream: Stream<Item = Result<Message, StreamError>> + Unpin,
    SinkError: Display,
    StreamError: Display,
{
    pub fn new(
        config: Arc<RealtimeServiceConfig>,
        user_id: Uuid,
        user_address: SocketAddr,
        events_rx: broadcast::Receiver<Arc<RealtimeEvent>>,
        ws_tx: WebSocketSink,
        ws_rx: WebSocketStream,
    ) -> Self {
        let ping_time = Instant::now() + config.ping_interval;
        let ping_message = 0;
        let pings_sent = 0;

        Self {
            config,
            user_id,
            user_address,
            events_rx,
            ws_tx,
            ws_rx,
            ping_time,
            ping_message,
            pings_sent,
        }
    }

    #[tracing::instrument(
        name = "WebSocket",
        skip_all,
        fields(
            user_id = %self.user_id,
            address = %self.user_address,
        )
    )]
    pub async fn run(mut self) {
        match self.try_run().await {
            Ok(()) => (),
            Err(Error::Close(message)) => {
                tracing::info!("closing connection: {message}");
            }
            Err(Error::Anyhow(err)) => {
                tracing::warn!("{err}");
            }
        }

        tracing::info!("closing websocket");
        match self.ws_tx.close().await {
            Ok(()) => tracing::info!("websocket closed"),
            Err(err) => tracing::warn!(%err, "failed to close websocket"),
        }
    }

    async fn try_run(&mut self) -> Result<(), Error> {
        loop {
            tokio::select! {
                biased;

                // Wait for time to send the ping
                _ = sleep_until(self.ping_time) => {
                    self.process_ping().await?;
                }

                // Wait for message from the user
                message = self.ws_rx.next() => {
                    self.process_incoming_message(message).await?;
                }

                // Wait for new event to send
                event = self.events_rx.recv() => {
                    self.process_event(event).await?;
                }
            }
        }
    }

    async fn process_ping(&mut self) -> anyhow::Result<()> {
        // If after sending 2 pings none of them is responded with a pong,
        // user is unresponsive and connection should be closed
        if self.pings_sent > 1 {
            anyhow::bail!("user unresponsive");
        }

        // If this is first ping of the heartbeat
        // it should be sent with a new message
        if self.pings_sent == 0 {
            self.ping_message += 1;
        }

        let bytes = self.ping_message.to_be_bytes().to_vec();
        self.ws_tx
            .send(Message::Ping(bytes))
            .await
            .map_err(|err| anyhow!("failed to send ping: {err}"))?;
        tracing::trace!(ping_message = self.ping_message, "ping sent");

        self.pings_sent += 1;
        self.ping_time = Instant::now() + self.config.ping_interval;

        Ok(())
    }

    async fn process_incoming_message(
        &mut self,
        message: Option<Result<Message, StreamError>>,
    ) -> Result<(), Error> {
        match message {
            Some(Ok(Message::Text(payload))) => {
                tracing::trace!("processing probe");
                self.process_incoming_text_message(payload).await?;
                tracing::trace!("processed probe");
            }
            Some(Ok(Message::Binary(_))) => {
                return Err(Error::Anyhow(anyhow!("received binary message")));
            }
            Some(Ok(Message::Ping(_))) => tracing::trace!("processed ping message"),
            Some(Ok(Message::Pong(payload))) => {
                tracing::trace!("processing pong message");
                self.process_incoming_pong_message(payload)?;
                tracing::trace!("processed pong message");
            }
            Some(Ok(Message::Close(_))) => {
                return Err(Error::Close("received close message"));
            }
            Some(Err(err)) => {
                return Err(Error::Anyhow(anyhow!(
                    "failed to read incoming message: {err}"
                )));
            }
            None => return Err(Error::Anyhow(anyhow!("incoming messages stream closed"))),
        }

        Ok(())
    }

    ///
    /// Browser clients cannot observe protocol level ping/pong
    /// frames so they probe liveness with text messages instead.
    ///
    async fn process_incoming_text_message(&mut self, payload: String) -> anyhow::Result<()> {
        let probe = serde_json::from_str::<Probe>(&payload)
            .map_err(|err| anyhow!("failed to decode probe: {err}"))?;

        // User produced traffic, he is responsive
        // and sending ping can be deferred
        self.ping_time = Instant::now() + self.config.ping_interval;
        self.pings_sent = 0;

        if let Probe::Ping = probe {
            let pong = serde_json::to_string(&Probe::Pong)
                .map_err(|err| anyhow!("failed to encode pong probe: {err}"))?;
            self.ws_tx
                .send(Message::Text(pong))
                .await
                .map_err(|err| anyhow!("failed to send pong probe: {err}"))?;
        }

        Ok(())
    }

    fn process_incoming_pong_message(&mut self, payload: Vec<u8>) -> anyhow::Result<()> {
        let byte_array = payload.try_into().map_err(|err: Vec<u8>| {
            anyhow!(
                "pong payload length invalid: len {} expected {}",
                err.len(),
                std::mem::size_of::<u32>()
            )
        })?;
        let pong_message = u32::from_be_bytes(byte_array);

        // Pong was delayed or no ping was sent.
        // Receiving pong in this case is not an error
        if self.pings_sent == 0 {
            tracing::trace!("pong was not expected");
            return Ok(());
        }

        // Pong was delayed and new ping had already been sent.
        // Receiving pong in this case is also not an error
        if pong_message != self.ping_message {
            tracing::trace!(
                pong_message,
                ping_message = self.ping_message,
                "pong message does not match expected message"
            );
            return Ok(());
        }

        // At this point pong_message matches sent ping_message
        // so user is responsive and ping can be deferred
        self.ping_time = Instant::now() + self.config.ping_interval;
        self.pings_sent = 0;

        Ok(())
    }

    async fn process_event(
        &mut self,
        event: Result<Arc<RealtimeEvent>, broadcast::error::RecvError>,
    ) -> Result<(), Error> {
        match event {
            Err(broadcast::error::RecvError::Lagged(count)) => Err(Error::Anyhow(anyhow!(
                "connection lagged. skipped events: {count}"
            ))),
            Err(broadcast::error::RecvError::Closed) => {
                Err(Error::Close("connection forcefully closed"))
            }
            Ok(event) => {
                let payload = serde_json::to_string(event.as_ref())
                    .map_err(|err| anyhow!("failed to encode event: {err}"))?;

                tracing::info!(event = event.name(), "sending event");
                self.ws_tx
                    .send(Message::Text(payload))
                    .await
                    .map_err(|err| anyhow!("sending event failed: {err}"))?;
                tracing::info!(event = event.name(), "sent event");

                Ok(())
            }
        }
    }
}
