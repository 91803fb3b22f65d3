use crate::{
    api::NotificationsApi,
    cache::NotificationsCache,
    config::ClientConfig,
    error::Error,
    sync::{run_poll_loop, ClientVisibility, EventCallback, RefreshCoordinator, SubscriptionToken, Subscriptions},
};
use notifier_wire::{Notification, RealtimeEvent};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use tokio::{sync::watch, task::JoinHandle};

enum RefreshOutcome {
    Applied,
    Dropped,
    Failed,
}

///
/// Entry point of the client.
///
/// Holds the local notification cache and converges it towards the
/// server state from three directions. Pushed events mutate it directly,
/// polling backstops lost events, and user actions apply optimistically
/// and roll back when the server rejects them.
///
/// Cheap to clone, all clones share the same state.
///
#[derive(Clone)]
pub struct NotificationsClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    api: Arc<dyn NotificationsApi>,
    config: ClientConfig,
    cache: Mutex<NotificationsCache>,
    refresh_coordinator: RefreshCoordinator,
    subscriptions: Subscriptions,
    push_connected: AtomicBool,
}

impl NotificationsClient {
    pub fn new(api: Arc<dyn NotificationsApi>, config: ClientConfig) -> Self {
        let refresh_coordinator = RefreshCoordinator::new(config.min_fetch_interval);
        Self {
            inner: Arc::new(ClientInner {
                api,
                config,
                cache: Mutex::new(NotificationsCache::default()),
                refresh_coordinator,
                subscriptions: Subscriptions::default(),
                push_connected: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    ///
    /// Snapshot of the cached notifications, newest first
    ///
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.cache.lock().unwrap().notifications().to_vec()
    }

    pub fn unread_count(&self) -> usize {
        self.inner.cache.lock().unwrap().unread_count()
    }

    ///
    /// Fetch the first page and replace the cache with it.
    ///
    /// Unforced refreshes may be dropped, see [`RefreshCoordinator`].
    /// A failed fetch is retried once after `fetch_retry_delay`, the
    /// retry runs in the background.
    ///
    /// Returns whether this call replaced the cache.
    ///
    pub async fn refresh(&self, force: bool) -> bool {
        match self.refresh_once(force).await {
            RefreshOutcome::Applied => true,
            RefreshOutcome::Dropped => false,
            RefreshOutcome::Failed => {
                let client = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(client.inner.config.fetch_retry_delay).await;
                    client.refresh_once(true).await;
                });
                false
            }
        }
    }

    async fn refresh_once(&self, force: bool) -> RefreshOutcome {
        if !self.inner.refresh_coordinator.begin(force) {
            return RefreshOutcome::Dropped;
        }

        let result = self
            .inner
            .api
            .list_notifications(1, self.inner.config.page_limit, false)
            .await;
        self.inner.refresh_coordinator.finish();

        match result {
            Ok(list) => {
                self.inner.cache.lock().unwrap().replace_all(list.items);
                RefreshOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(err = %err, "failed to refresh notifications");
                RefreshOutcome::Failed
            }
        }
    }

    ///
    /// Mark a notification as read.
    ///
    /// The cache updates immediately and rolls back when the server
    /// rejects the change.
    ///
    pub async fn mark_read(&self, id: &str) -> Result<(), Error> {
        let undo = self.inner.cache.lock().unwrap().mark_read_local(id);

        match self.inner.api.mark_notification_read(id).await {
            Ok(()) => {
                self.refresh(true).await;
                Ok(())
            }
            Err(err) => {
                if let Some(undo) = undo {
                    let mut cache = self.inner.cache.lock().unwrap();
                    undo(&mut cache);
                }
                Err(err.into())
            }
        }
    }

    ///
    /// Mark every notification as read
    ///
    pub async fn mark_all_read(&self) -> Result<(), Error> {
        let undo = self.inner.cache.lock().unwrap().mark_all_read_local();

        match self.inner.api.mark_all_notifications_read().await {
            Ok(()) => {
                self.refresh(true).await;
                Ok(())
            }
            Err(err) => {
                let mut cache = self.inner.cache.lock().unwrap();
                undo(&mut cache);
                drop(cache);
                Err(err.into())
            }
        }
    }

    ///
    /// Delete a notification
    ///
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        let undo = self.inner.cache.lock().unwrap().delete_local(id);

        match self.inner.api.delete_notification(id).await {
            Ok(()) => {
                self.refresh(true).await;
                Ok(())
            }
            Err(err) => {
                if let Some(undo) = undo {
                    let mut cache = self.inner.cache.lock().unwrap();
                    undo(&mut cache);
                }
                Err(err.into())
            }
        }
    }

    ///
    /// Apply an event received over the realtime channel
    ///
    pub fn apply_push_event(&self, event: &RealtimeEvent) {
        {
            let mut cache = self.inner.cache.lock().unwrap();
            match event {
                RealtimeEvent::NewNotification(notification) => {
                    cache.apply_created(notification.clone())
                }
                RealtimeEvent::NotificationUpdated(notification) => {
                    cache.apply_updated(notification.clone())
                }
                RealtimeEvent::NotificationDeleted(deleted) => {
                    cache.apply_deleted(&deleted.notification_id)
                }
            }
        }

        self.inner.subscriptions.notify(event);
    }

    ///
    /// Apply an event received from a secondary source.
    ///
    /// Ignored while the realtime channel is connected, the channel
    /// already delivers the same events. Deletions are never applied
    /// from secondary sources, the poll backstop removes stale entries.
    ///
    pub fn apply_fallback_event(&self, event: &RealtimeEvent) {
        if self.is_push_connected() {
            tracing::trace!(event = event.name(), "fallback event ignored, channel connected");
            return;
        }

        match event {
            RealtimeEvent::NewNotification(_) | RealtimeEvent::NotificationUpdated(_) => {
                self.apply_push_event(event)
            }
            RealtimeEvent::NotificationDeleted(_) => {
                tracing::trace!("fallback deletion ignored");
            }
        }
    }

    pub fn subscribe(&self, callback: EventCallback) -> SubscriptionToken {
        self.inner.subscriptions.subscribe(callback)
    }

    pub fn unsubscribe(&self, token: SubscriptionToken) {
        self.inner.subscriptions.unsubscribe(token)
    }

    pub fn set_push_connected(&self, connected: bool) {
        self.inner.push_connected.store(connected, Ordering::Relaxed);
    }

    pub fn is_push_connected(&self) -> bool {
        self.inner.push_connected.load(Ordering::Relaxed)
    }

    ///
    /// Start the poll loop. The task runs until the visibility
    /// sender is dropped.
    ///
    pub fn start_polling(
        &self,
        visibility_rx: watch::Receiver<ClientVisibility>,
    ) -> JoinHandle<()> {
        tokio::spawn(run_poll_loop(self.clone(), visibility_rx))
    }
}
