use super::ClientVisibility;
use crate::NotificationsClient;
use tokio::sync::watch;

///
/// Poll loop backing up the realtime channel.
///
/// Fetch cadence follows the reported visibility. While offline no
/// fetches happen at all. Regaining visibility, either by leaving the
/// offline state or by coming back to the foreground, triggers an
/// immediate forced refresh to close the gap.
///
/// Returns when the visibility sender is dropped.
///
pub async fn run_poll_loop(
    client: NotificationsClient,
    mut visibility_rx: watch::Receiver<ClientVisibility>,
) {
    let mut previous = *visibility_rx.borrow();
    loop {
        let visibility = *visibility_rx.borrow();
        let visibility_regained = visibility != previous
            && (previous == ClientVisibility::Offline
                || visibility == ClientVisibility::Foreground);
        if visibility_regained {
            tracing::debug!("visibility regained, refreshing");
            client.refresh(true).await;
        }
        previous = visibility;

        match visibility {
            ClientVisibility::Offline => {
                if visibility_rx.changed().await.is_err() {
                    return;
                }
            }
            ClientVisibility::Foreground | ClientVisibility::Background => {
                let interval = match visibility {
                    ClientVisibility::Foreground => client.config().poll_interval_foreground,
                    _ => client.config().poll_interval_background,
                };
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {
                        client.refresh(false).await;
                    }
                    changed = visibility_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }
}
