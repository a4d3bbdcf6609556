use std::time::{SystemTime, UNIX_EPOCH};

use {
    relay_contracts::{Chat, Email, Message, Push, Sms},
    serde::Serialize,
    tokio::sync::RwLock,
    uuid::Uuid,
};

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// A captured message with storage metadata.
///
/// Append-only: records are never mutated after insertion, only removed
/// by delete or clear. `created_at` is unix millis from the process
/// clock, non-decreasing with insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct Stored<M> {
    pub id: String,
    pub created_at: i64,
    pub message: M,
}

/// The four per-kind collections, all guarded by one lock.
#[derive(Default)]
pub struct Shelves {
    emails: Vec<Stored<Email>>,
    sms: Vec<Stored<Sms>>,
    pushes: Vec<Stored<Push>>,
    chats: Vec<Stored<Chat>>,
}

/// Maps a message type to its shelf inside [`Shelves`].
///
/// Implemented for the four message types only; the accessors are an
/// implementation detail of the store.
pub trait Record: Message {
    #[doc(hidden)]
    fn shelf(shelves: &Shelves) -> &Vec<Stored<Self>>;
    #[doc(hidden)]
    fn shelf_mut(shelves: &mut Shelves) -> &mut Vec<Stored<Self>>;

    /// Downcast used by the devbox email tap.
    #[doc(hidden)]
    fn as_email(&self) -> Option<&Email> {
        None
    }
}

impl Record for Email {
    fn shelf(shelves: &Shelves) -> &Vec<Stored<Self>> {
        &shelves.emails
    }

    fn shelf_mut(shelves: &mut Shelves) -> &mut Vec<Stored<Self>> {
        &mut shelves.emails
    }

    fn as_email(&self) -> Option<&Email> {
        Some(self)
    }
}

impl Record for Sms {
    fn shelf(shelves: &Shelves) -> &Vec<Stored<Self>> {
        &shelves.sms
    }

    fn shelf_mut(shelves: &mut Shelves) -> &mut Vec<Stored<Self>> {
        &mut shelves.sms
    }
}

impl Record for Push {
    fn shelf(shelves: &Shelves) -> &Vec<Stored<Self>> {
        &shelves.pushes
    }

    fn shelf_mut(shelves: &mut Shelves) -> &mut Vec<Stored<Self>> {
        &mut shelves.pushes
    }
}

impl Record for Chat {
    fn shelf(shelves: &Shelves) -> &Vec<Stored<Self>> {
        &shelves.chats
    }

    fn shelf_mut(shelves: &mut Shelves) -> &mut Vec<Stored<Self>> {
        &mut shelves.chats
    }
}

/// Message counts per kind plus total, as a point-in-time snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub emails: usize,
    pub sms: usize,
    pub push: usize,
    pub chat: usize,
    pub total: usize,
}

/// Thread-safe, append-only store for intercepted messages.
///
/// One reader/writer lock guards all four collections; lookups are linear
/// because devbox volumes are small. Nothing here blocks on I/O.
#[derive(Default)]
pub struct MemoryStore {
    shelves: RwLock<Shelves>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, assigning a fresh id and timestamp. Always
    /// succeeds; returns a copy of the stored record.
    pub async fn add<M: Record>(&self, message: M) -> Stored<M> {
        let stored = Stored {
            id: Uuid::new_v4().to_string(),
            created_at: now_ms(),
            message,
        };
        let mut shelves = self.shelves.write().await;
        M::shelf_mut(&mut shelves).push(stored.clone());
        stored
    }

    /// Look up a record by id.
    pub async fn get<M: Record>(&self, id: &str) -> Option<Stored<M>> {
        let shelves = self.shelves.read().await;
        M::shelf(&shelves).iter().find(|s| s.id == id).cloned()
    }

    /// Remove the first record matching `id`. Returns whether a removal
    /// occurred; a second call for the same id returns false.
    pub async fn delete<M: Record>(&self, id: &str) -> bool {
        let mut shelves = self.shelves.write().await;
        let shelf = M::shelf_mut(&mut shelves);
        match shelf.iter().position(|s| s.id == id) {
            Some(idx) => {
                shelf.remove(idx);
                true
            },
            None => false,
        }
    }

    /// All records of one kind in insertion order, as a defensive copy.
    pub async fn list<M: Record>(&self) -> Vec<Stored<M>> {
        let shelves = self.shelves.read().await;
        M::shelf(&shelves).clone()
    }

    /// Empty every kind's collection under a single lock acquisition.
    pub async fn clear(&self) {
        let mut shelves = self.shelves.write().await;
        *shelves = Shelves::default();
    }

    /// Counts per kind plus total.
    pub async fn stats(&self) -> StoreStats {
        let shelves = self.shelves.read().await;
        let (emails, sms, push, chat) = (
            shelves.emails.len(),
            shelves.sms.len(),
            shelves.pushes.len(),
            shelves.chats.len(),
        );
        StoreStats {
            emails,
            sms,
            push,
            chat,
            total: emails + sms + push + chat,
        }
    }

    /// Total number of stored messages across all kinds.
    pub async fn count(&self) -> usize {
        self.stats().await.total
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn email(subject: &str) -> Email {
        Email {
            to: vec!["a@b.com".into()],
            subject: subject.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn add_then_get_round_trips() {
        let store = MemoryStore::new();
        let stored = store.add(email("hello")).await;
        assert!(!stored.id.is_empty());

        let fetched = store.get::<Email>(&stored.id).await.unwrap();
        assert_eq!(fetched.id, stored.id);
        assert_eq!(fetched.message.subject, "hello");
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() {
        let store = MemoryStore::new();
        assert!(store.get::<Sms>("nope").await.is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent_in_effect() {
        let store = MemoryStore::new();
        let stored = store.add(email("bye")).await;

        assert!(store.delete::<Email>(&stored.id).await);
        let stats = store.stats().await;
        assert_eq!(stats.emails, 0);

        assert!(!store.delete::<Email>(&stored.id).await);
        assert_eq!(store.stats().await, stats);
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store.add(email(&format!("msg {i}"))).await;
        }
        let all = store.list::<Email>().await;
        assert_eq!(all.len(), 5);
        for (i, stored) in all.iter().enumerate() {
            assert_eq!(stored.message.subject, format!("msg {i}"));
        }
        for pair in all.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn kinds_are_isolated() {
        let store = MemoryStore::new();
        store.add(email("e")).await;
        store
            .add(Sms {
                to: vec!["+1555".into()],
                message: "s".into(),
                ..Default::default()
            })
            .await;

        assert_eq!(store.list::<Email>().await.len(), 1);
        assert_eq!(store.list::<Sms>().await.len(), 1);
        assert_eq!(store.list::<Push>().await.len(), 0);
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn clear_zeroes_all_counts() {
        let store = MemoryStore::new();
        store.add(email("x")).await;
        store
            .add(Chat {
                to: vec!["u1".into()],
                message: "hi".into(),
                ..Default::default()
            })
            .await;

        store.clear().await;
        assert_eq!(store.stats().await, StoreStats::default());
    }

    #[tokio::test]
    async fn ids_are_unique_under_concurrent_adds() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.add(email("concurrent")).await.id
            }));
        }
        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }
        assert_eq!(store.count().await, 16);
    }
}
