use std::collections::HashMap;

use {
    relay_contracts::Kind,
    serde::Serialize,
    tokio::sync::{RwLock, mpsc},
    tracing::{debug, warn},
};

/// Per-subscriber queue capacity. A subscriber that falls more than this
/// many events behind starts losing events, never blocking the writer.
const SUBSCRIBER_CAPACITY: usize = 10;

/// Change notification emitted when the devbox store mutates.
///
/// Serializes to the `{ "type": ..., "data": ... }` frames the live
/// dashboard consumes, e.g. `{"type":"email_received","data":{"id":"…"}}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DevboxEvent {
    EmailReceived { id: String },
    EmailDeleted { id: String },
    SmsReceived { id: String },
    SmsDeleted { id: String },
    PushReceived { id: String },
    PushDeleted { id: String },
    ChatReceived { id: String },
    ChatDeleted { id: String },
    MessagesCleared,
}

impl DevboxEvent {
    /// The received event for one kind.
    #[must_use]
    pub fn received(kind: Kind, id: String) -> Self {
        match kind {
            Kind::Email => Self::EmailReceived { id },
            Kind::Sms => Self::SmsReceived { id },
            Kind::Push => Self::PushReceived { id },
            Kind::Chat => Self::ChatReceived { id },
        }
    }

    /// The deleted event for one kind.
    #[must_use]
    pub fn deleted(kind: Kind, id: String) -> Self {
        match kind {
            Kind::Email => Self::EmailDeleted { id },
            Kind::Sms => Self::SmsDeleted { id },
            Kind::Push => Self::PushDeleted { id },
            Kind::Chat => Self::ChatDeleted { id },
        }
    }
}

/// Opaque handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Fans out store-change events to an open set of subscribers.
///
/// Delivery is best-effort and at-most-once: a full queue drops the event
/// for that subscriber, and broadcast never fails observably. Emission
/// order is preserved per subscriber.
#[derive(Default)]
pub struct EventHub {
    inner: RwLock<HubInner>,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    subscribers: HashMap<u64, mpsc::Sender<String>>,
}

impl EventHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and return its bounded event queue.
    /// The queue delivers serialized event frames.
    pub async fn subscribe(&self) -> (SubscriberId, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CAPACITY);
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(id, tx);
        debug!(subscriber = id, "devbox event subscriber added");
        (SubscriberId(id), rx)
    }

    /// Deregister a subscriber, closing its queue. Unknown ids are a
    /// no-op, so calling this after a connection already went away is
    /// safe.
    pub async fn unsubscribe(&self, id: SubscriberId) {
        if self.inner.write().await.subscribers.remove(&id.0).is_some() {
            debug!(subscriber = id.0, "devbox event subscriber removed");
        }
    }

    /// Serialize the event once and attempt a non-blocking send to every
    /// subscriber. Full or closed queues are skipped silently.
    pub async fn broadcast(&self, event: DevboxEvent) {
        let frame = match serde_json::to_string(&event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("failed to serialize devbox event: {e}");
                return;
            },
        };

        let inner = self.inner.read().await;
        debug!(
            subscribers = inner.subscribers.len(),
            "broadcasting devbox event"
        );
        for tx in inner.subscribers.values() {
            // Queue full or receiver gone: drop for this subscriber.
            let _ = tx.try_send(frame.clone());
        }
    }

    /// Number of currently registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.inner.read().await.subscribers.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_sees_events_in_emission_order() {
        let hub = EventHub::new();
        let (_id, mut rx) = hub.subscribe().await;

        hub.broadcast(DevboxEvent::received(Kind::Email, "1".into()))
            .await;
        hub.broadcast(DevboxEvent::deleted(Kind::Email, "1".into()))
            .await;
        hub.broadcast(DevboxEvent::MessagesCleared).await;

        assert_eq!(
            rx.recv().await.unwrap(),
            r#"{"type":"email_received","data":{"id":"1"}}"#
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            r#"{"type":"email_deleted","data":{"id":"1"}}"#
        );
        assert_eq!(rx.recv().await.unwrap(), r#"{"type":"messages_cleared"}"#);
    }

    #[tokio::test]
    async fn full_queue_drops_without_blocking() {
        let hub = EventHub::new();
        let (_id, mut rx) = hub.subscribe().await;

        for i in 0..SUBSCRIBER_CAPACITY + 5 {
            hub.broadcast(DevboxEvent::received(Kind::Sms, i.to_string()))
                .await;
        }

        // Exactly the first CAPACITY events made it; nothing blocked.
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, SUBSCRIBER_CAPACITY);
    }

    #[tokio::test]
    async fn unsubscribe_closes_the_queue() {
        let hub = EventHub::new();
        let (id, mut rx) = hub.subscribe().await;
        assert_eq!(hub.subscriber_count().await, 1);

        hub.unsubscribe(id).await;
        assert_eq!(hub.subscriber_count().await, 0);
        assert!(rx.recv().await.is_none());

        // Second unsubscribe for the same id is a no-op.
        hub.unsubscribe(id).await;
    }

    #[tokio::test]
    async fn broadcast_without_subscribers_is_fine() {
        let hub = EventHub::new();
        hub.broadcast(DevboxEvent::MessagesCleared).await;
    }

    #[tokio::test]
    async fn events_before_subscribe_are_not_replayed() {
        let hub = EventHub::new();
        hub.broadcast(DevboxEvent::received(Kind::Push, "old".into()))
            .await;

        let (_id, mut rx) = hub.subscribe().await;
        hub.broadcast(DevboxEvent::received(Kind::Push, "new".into()))
            .await;

        let frame = rx.recv().await.unwrap();
        assert!(frame.contains("new"));
        assert!(rx.try_recv().is_err());
    }
}
