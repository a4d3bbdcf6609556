//! Explicit registration of built-in providers.
//!
//! Registration is a startup routine the embedding application calls
//! before the first dispatch; nothing registers itself through load-time
//! side effects.

use std::sync::Arc;

use {
    relay_contracts::{Chat, DynSender, Email, Push, Sms},
    relay_devbox::{Devbox, MemorySender, PROVIDER_NAME, Record},
    relay_registry::{Factory, Registry, Routable},
    tracing::debug,
};

fn memory_factory<M: Record + Routable>(devbox: &Arc<Devbox>) -> Factory<M> {
    let devbox = Arc::clone(devbox);
    Box::new(move |_cfg| {
        let sender: DynSender<M> = Arc::new(MemorySender::new(Arc::clone(&devbox)));
        Ok(sender)
    })
}

/// Register the memory interceptor factory for all four kinds.
///
/// Every factory closure captures the same devbox, so all memory senders
/// share one store and one event hub.
pub async fn register_builtin_providers(registry: &Registry, devbox: Arc<Devbox>) {
    registry
        .register_factory::<Email>(PROVIDER_NAME, memory_factory(&devbox))
        .await;
    registry
        .register_factory::<Sms>(PROVIDER_NAME, memory_factory(&devbox))
        .await;
    registry
        .register_factory::<Push>(PROVIDER_NAME, memory_factory(&devbox))
        .await;
    registry
        .register_factory::<Chat>(PROVIDER_NAME, memory_factory(&devbox))
        .await;
    debug!("built-in providers registered");
}
