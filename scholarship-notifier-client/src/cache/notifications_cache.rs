use notifier_wire::Notification;
use std::cmp::Ordering;

/// Reverts an optimistic mutation that could not be confirmed by the server.
pub type Undo = Box<dyn FnOnce(&mut NotificationsCache) + Send>;

///
/// Local copy of the user's notifications.
///
/// Kept sorted the way the server returns them, newest first with
/// the id as tie break. Events and refreshes both converge the cache
/// towards the server state, applying the same event twice is harmless.
///
#[derive(Default)]
pub struct NotificationsCache {
    notifications: Vec<Notification>,
    unread_count: usize,
}

impl NotificationsCache {
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    ///
    /// Replace the whole cache with a freshly fetched page
    ///
    pub fn replace_all(&mut self, notifications: Vec<Notification>) {
        self.notifications = notifications;
        self.notifications.sort_by(Self::newest_first);
        self.recount_unread();
    }

    ///
    /// Insert a notification pushed by the server.
    /// A notification with the same id is replaced instead.
    ///
    pub fn apply_created(&mut self, notification: Notification) {
        self.upsert(notification);
    }

    ///
    /// Apply a server side update of an existing notification.
    /// An update for an unknown notification inserts it.
    ///
    pub fn apply_updated(&mut self, notification: Notification) {
        self.upsert(notification);
    }

    ///
    /// Remove a notification deleted on the server.
    /// Unknown ids are ignored.
    ///
    pub fn apply_deleted(&mut self, id: &str) {
        self.notifications.retain(|notification| notification.id != id);
        self.recount_unread();
    }

    ///
    /// Optimistically mark a notification as read.
    ///
    /// Returns [`None`] when nothing changed, either because the
    /// notification is unknown or because it was already read.
    ///
    pub fn mark_read_local(&mut self, id: &str) -> Option<Undo> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|notification| notification.id == id)?;
        if notification.read {
            return None;
        }

        notification.read = true;
        self.unread_count -= 1;

        let id = id.to_string();
        Some(Box::new(move |cache| {
            if let Some(notification) = cache
                .notifications
                .iter_mut()
                .find(|notification| notification.id == id)
            {
                notification.read = false;
            }
            cache.recount_unread();
        }))
    }

    ///
    /// Optimistically mark every notification as read
    ///
    pub fn mark_all_read_local(&mut self) -> Undo {
        let unread_ids = self
            .notifications
            .iter()
            .filter(|notification| !notification.read)
            .map(|notification| notification.id.clone())
            .collect::<Vec<_>>();

        for notification in &mut self.notifications {
            notification.read = true;
        }
        self.unread_count = 0;

        Box::new(move |cache| {
            for notification in &mut cache.notifications {
                if unread_ids.contains(&notification.id) {
                    notification.read = false;
                }
            }
            cache.recount_unread();
        })
    }

    ///
    /// Optimistically remove a notification.
    ///
    /// Returns [`None`] when the notification is unknown.
    ///
    pub fn delete_local(&mut self, id: &str) -> Option<Undo> {
        let position = self
            .notifications
            .iter()
            .position(|notification| notification.id == id)?;
        let removed = self.notifications.remove(position);
        self.recount_unread();

        Some(Box::new(move |cache| {
            cache.upsert(removed);
        }))
    }

    fn upsert(&mut self, notification: Notification) {
        self.notifications
            .retain(|existing| existing.id != notification.id);
        let position = self
            .notifications
            .partition_point(|existing| Self::newest_first(existing, &notification) == Ordering::Less);
        self.notifications.insert(position, notification);
        self.recount_unread();
    }

    fn newest_first(a: &Notification, b: &Notification) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }

    fn recount_unread(&mut self) {
        self.unread_count = self
            .notifications
            .iter()
            .filter(|notification| !notification.read)
            .count();
    }
}
