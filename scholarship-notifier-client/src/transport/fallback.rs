use crate::NotificationsClient;
use notifier_wire::RealtimeEvent;
use tokio::{sync::mpsc, task::JoinHandle};

///
/// Feed events from a secondary source, eg. another tab of the host
/// application, into the client.
///
/// The events pass through [`NotificationsClient::apply_fallback_event`]
/// and are dropped while the realtime channel is connected.
///
/// The task ends when the sender is dropped.
///
pub fn start_fallback(
    client: NotificationsClient,
    mut events_rx: mpsc::Receiver<RealtimeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            client.apply_fallback_event(&event);
        }
    })
}
