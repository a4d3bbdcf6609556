use std::sync::Arc;

use async_trait::async_trait;

use crate::{error::Result, message::Message};

/// The uniform provider contract for one message kind.
///
/// A provider implements `Sender<Email>`, `Sender<Sms>`, etc. for each
/// kind it can deliver. `send` may block on network I/O; cancellation is
/// the caller's concern (dropping the future aborts the call). Vendor
/// failures surface as [`crate::Error::Provider`] with the original cause
/// attached.
#[async_trait]
pub trait Sender<M: Message>: Send + Sync {
    /// Deliver one message. No retries; the result or error is returned
    /// to the dispatcher unchanged.
    async fn send(&self, message: &M) -> Result<crate::SendResult>;

    /// Provider name, e.g. "mailgun" or "memory".
    fn name(&self) -> &str;
}

/// Shared, non-owning handle to a live provider. The registry owns the
/// instances; callers only ever hold one of these.
pub type DynSender<M> = Arc<dyn Sender<M>>;
