//! Development-mode message interceptor.
//!
//! Instead of delivering through a vendor API, the memory provider stores
//! every message in an in-process [`MemoryStore`] and notifies live
//! observers through the [`EventHub`], so development and E2E flows can
//! inspect what would have been sent.

pub mod hub;
pub mod sender;
pub mod store;

use std::sync::Arc;

use relay_contracts::Email;

pub use {
    hub::{DevboxEvent, EventHub, SubscriberId},
    sender::{MemorySender, PROVIDER_NAME},
    store::{MemoryStore, Record, StoreStats, Stored},
};

/// Best-effort tap invoked after an email is intercepted.
///
/// The original gateway could forward intercepted mail to a local SMTP
/// sink (Mailpit); the wire protocol belongs to the embedding
/// application, this is just the seam. Failures must stay inside the tap.
pub trait EmailTap: Send + Sync {
    fn tap(&self, email: &Email);
}

/// The devbox handle: shared store plus event hub.
///
/// Passed explicitly to everything that needs it (memory senders, the
/// presentation layer); there is no global accessor.
#[derive(Default)]
pub struct Devbox {
    store: MemoryStore,
    hub: EventHub,
    email_tap: Option<Box<dyn EmailTap>>,
}

impl Devbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an email tap (e.g. an SMTP forwarder owned by the caller).
    #[must_use]
    pub fn with_email_tap(mut self, tap: Box<dyn EmailTap>) -> Self {
        self.email_tap = Some(tap);
        self
    }

    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    #[must_use]
    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// Build the memory sender for one kind, sharing this devbox.
    #[must_use]
    pub fn sender<M: Record>(self: &Arc<Self>) -> MemorySender<M> {
        MemorySender::new(Arc::clone(self))
    }

    /// All stored messages of one kind, insertion order.
    pub async fn list<M: Record>(&self) -> Vec<Stored<M>> {
        self.store.list::<M>().await
    }

    /// Point lookup by id.
    pub async fn get<M: Record>(&self, id: &str) -> Option<Stored<M>> {
        self.store.get::<M>(id).await
    }

    /// Delete one message by id, broadcasting the kind's deleted event on
    /// success. Returns whether a removal occurred.
    pub async fn delete<M: Record>(&self, id: &str) -> bool {
        let deleted = self.store.delete::<M>(id).await;
        if deleted {
            self.hub
                .broadcast(DevboxEvent::deleted(M::KIND, id.to_string()))
                .await;
        }
        deleted
    }

    /// Empty every kind's collection and broadcast `messages_cleared`.
    pub async fn clear(&self) {
        self.store.clear().await;
        self.hub.broadcast(DevboxEvent::MessagesCleared).await;
    }

    /// Point-in-time counts per kind plus total.
    pub async fn stats(&self) -> StoreStats {
        self.store.stats().await
    }

    pub(crate) async fn intercept<M: Record>(&self, message: &M) -> Stored<M> {
        if let (Some(tap), Some(email)) = (&self.email_tap, message.as_email()) {
            tap.tap(email);
        }
        let stored = self.store.add(message.clone()).await;
        self.hub
            .broadcast(DevboxEvent::received(M::KIND, stored.id.clone()))
            .await;
        stored
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use relay_contracts::{Chat, Sender};

    use super::*;

    #[tokio::test]
    async fn delete_broadcasts_deleted_event() {
        let devbox = Arc::new(Devbox::new());
        let stored = devbox.store().add(Chat::default()).await;

        let (_id, mut rx) = devbox.hub().subscribe().await;
        assert!(devbox.delete::<Chat>(&stored.id).await);

        let frame = rx.recv().await.unwrap();
        assert!(frame.contains("chat_deleted"));
        assert!(frame.contains(&stored.id));
    }

    #[tokio::test]
    async fn delete_miss_stays_silent() {
        let devbox = Arc::new(Devbox::new());
        let (_id, mut rx) = devbox.hub().subscribe().await;

        assert!(!devbox.delete::<Chat>("missing").await);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn clear_broadcasts_messages_cleared() {
        let devbox = Arc::new(Devbox::new());
        devbox.store().add(Email::default()).await;

        let (_id, mut rx) = devbox.hub().subscribe().await;
        devbox.clear().await;

        assert_eq!(rx.recv().await.unwrap(), r#"{"type":"messages_cleared"}"#);
        assert_eq!(devbox.stats().await.total, 0);
    }

    #[tokio::test]
    async fn email_tap_fires_for_email_only() {
        static TAPS: AtomicUsize = AtomicUsize::new(0);

        struct StaticTap;
        impl EmailTap for StaticTap {
            fn tap(&self, _email: &Email) {
                TAPS.fetch_add(1, Ordering::SeqCst);
            }
        }

        let devbox = Arc::new(Devbox::new().with_email_tap(Box::new(StaticTap)));
        devbox.sender::<Email>().send(&Email::default()).await.unwrap();
        devbox.sender::<Chat>().send(&Chat::default()).await.unwrap();

        assert_eq!(TAPS.load(Ordering::SeqCst), 1);
    }
}
