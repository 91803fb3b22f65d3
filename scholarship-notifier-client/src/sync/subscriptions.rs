use notifier_wire::RealtimeEvent;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

pub type EventCallback = Box<dyn Fn(&RealtimeEvent) + Send + Sync>;

/// Handle returned by [`Subscriptions::subscribe`], used to unsubscribe.
#[derive(Debug, PartialEq, Eq)]
pub struct SubscriptionToken(u64);

///
/// Callbacks invoked for every event applied to the cache
///
#[derive(Default)]
pub struct Subscriptions {
    next_id: AtomicU64,
    callbacks: Mutex<HashMap<u64, EventCallback>>,
}

impl Subscriptions {
    pub fn subscribe(&self, callback: EventCallback) -> SubscriptionToken {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks.lock().unwrap().insert(id, callback);
        SubscriptionToken(id)
    }

    pub fn unsubscribe(&self, token: SubscriptionToken) {
        self.callbacks.lock().unwrap().remove(&token.0);
    }

    pub fn notify(&self, event: &RealtimeEvent) {
        let callbacks = self.callbacks.lock().unwrap();
        for callback in callbacks.values() {
            callback(event);
        }
    }
}
