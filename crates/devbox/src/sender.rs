use std::sync::Arc;

use {
    async_trait::async_trait,
    relay_contracts::{Result, SendResult, Sender},
    tracing::debug,
};

use crate::{Devbox, store::Record};

/// Provider name the memory interceptor registers under, for every kind.
pub const PROVIDER_NAME: &str = "memory";

/// The memory provider: one generic sender covering all four kinds.
///
/// `send` never touches the network; it stores the message in the shared
/// devbox store, emits the kind's received event, and reports success.
pub struct MemorySender<M: Record> {
    devbox: Arc<Devbox>,
    _kind: std::marker::PhantomData<fn() -> M>,
}

impl<M: Record> MemorySender<M> {
    #[must_use]
    pub fn new(devbox: Arc<Devbox>) -> Self {
        Self {
            devbox,
            _kind: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<M: Record> Sender<M> for MemorySender<M> {
    async fn send(&self, message: &M) -> Result<SendResult> {
        let stored = self.devbox.intercept(message).await;
        debug!(kind = %M::KIND, id = %stored.id, "message intercepted");
        Ok(SendResult {
            id: stored.id,
            status_code: 200,
            message: format!("stored {} message in memory", M::KIND),
            meta: Default::default(),
        })
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use relay_contracts::{Email, Push, Sms};

    use super::*;

    #[tokio::test]
    async fn send_stores_and_reports_the_id() {
        let devbox = Arc::new(Devbox::new());
        let sender = devbox.sender::<Email>();

        let email = Email {
            to: vec!["a@b.com".into()],
            subject: "hi".into(),
            ..Default::default()
        };
        let result = sender.send(&email).await.unwrap();
        assert!(!result.id.is_empty());
        assert_eq!(result.status_code, 200);
        assert_eq!(result.message, "stored email message in memory");

        let stored = devbox.get::<Email>(&result.id).await.unwrap();
        assert_eq!(stored.message.subject, "hi");
    }

    #[tokio::test]
    async fn send_emits_received_event() {
        let devbox = Arc::new(Devbox::new());
        let (_id, mut rx) = devbox.hub().subscribe().await;

        let sender = devbox.sender::<Sms>();
        let result = sender
            .send(&Sms {
                to: vec!["+1555".into()],
                message: "ping".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let frame = rx.recv().await.unwrap();
        assert!(frame.contains("sms_received"));
        assert!(frame.contains(&result.id));
    }

    #[tokio::test]
    async fn sender_name_is_memory() {
        let devbox = Arc::new(Devbox::new());
        assert_eq!(devbox.sender::<Push>().name(), "memory");
    }
}
