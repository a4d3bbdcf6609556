//! Provider registry: binds provider names to factories and lazily
//! instantiates provider handles, at most once per (kind, name) pair.
//!
//! The dispatch service never constructs providers itself; it asks the
//! registry, which either returns the cached instance or invokes the
//! registered factory under the kind's write lock. Shared dependencies
//! (like the devbox) are captured by the factory closure at registration
//! time.

use std::collections::HashMap;

use {
    relay_config::ProviderConfig,
    relay_contracts::{Chat, DynSender, Email, Error, Message, Push, Result, Sms},
    tokio::sync::RwLock,
    tracing::{debug, info},
};

/// Builds a sender from its configuration bag.
///
/// Factories may perform blocking setup (credential validation); the
/// registry imposes no timeout on them. A rejected configuration surfaces
/// as [`Error::Config`] and nothing is cached, so a later call retries.
pub type Factory<M> = Box<dyn Fn(&ProviderConfig) -> Result<DynSender<M>> + Send + Sync>;

/// Registrations for one kind: pending factories and constructed
/// instances, keyed by provider name.
pub struct Slot<M: Message> {
    factories: HashMap<String, Factory<M>>,
    instances: HashMap<String, DynSender<M>>,
}

impl<M: Message> Default for Slot<M> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
            instances: HashMap::new(),
        }
    }
}

/// Maps a message type to its slot inside the [`Registry`].
pub trait Routable: Message {
    #[doc(hidden)]
    fn slot(registry: &Registry) -> &RwLock<Slot<Self>>;
}

impl Routable for Email {
    fn slot(registry: &Registry) -> &RwLock<Slot<Self>> {
        &registry.email
    }
}

impl Routable for Sms {
    fn slot(registry: &Registry) -> &RwLock<Slot<Self>> {
        &registry.sms
    }
}

impl Routable for Push {
    fn slot(registry: &Registry) -> &RwLock<Slot<Self>> {
        &registry.push
    }
}

impl Routable for Chat {
    fn slot(registry: &Registry) -> &RwLock<Slot<Self>> {
        &registry.chat
    }
}

/// Thread-safe registry of provider factories and live instances.
///
/// The registry exclusively owns all live senders; callers receive shared
/// [`DynSender`] handles. Construction is idempotent: racing callers for
/// the same (kind, name) observe exactly one factory invocation.
#[derive(Default)]
pub struct Registry {
    email: RwLock<Slot<Email>>,
    sms: RwLock<Slot<Sms>>,
    push: RwLock<Slot<Push>>,
    chat: RwLock<Slot<Chat>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a factory with a (kind, name) pair. Last write wins, so
    /// tests can override built-ins; an override does not evict an
    /// instance that was already constructed.
    pub async fn register_factory<M: Routable>(&self, name: impl Into<String>, factory: Factory<M>) {
        let name = name.into();
        debug!(kind = %M::KIND, provider = %name, "factory registered");
        M::slot(self).write().await.factories.insert(name, factory);
    }

    /// Inject a ready-made sender under a (kind, name) pair, bypassing
    /// lazy construction. Used for manual/test injection.
    pub async fn register_instance<M: Routable>(
        &self,
        name: impl Into<String>,
        sender: DynSender<M>,
    ) {
        let name = name.into();
        debug!(kind = %M::KIND, provider = %name, "instance registered");
        M::slot(self).write().await.instances.insert(name, sender);
    }

    /// Non-constructing lookup: the live instance for (kind, name), if
    /// one has been built or injected.
    pub async fn get<M: Routable>(&self, name: &str) -> Option<DynSender<M>> {
        M::slot(self).read().await.instances.get(name).cloned()
    }

    /// Names of constructed instances for a kind, without side effects.
    pub async fn active<M: Routable>(&self) -> Vec<String> {
        M::slot(self).read().await.instances.keys().cloned().collect()
    }

    /// Return the live sender for (kind, name), constructing it through
    /// the registered factory on first use.
    ///
    /// Errors with [`Error::NotRegistered`] when no factory exists;
    /// factory failures propagate unchanged and leave the slot empty.
    pub async fn get_or_create<M: Routable>(
        &self,
        name: &str,
        config: &ProviderConfig,
    ) -> Result<DynSender<M>> {
        if let Some(sender) = M::slot(self).read().await.instances.get(name) {
            return Ok(sender.clone());
        }

        let mut slot = M::slot(self).write().await;
        // Re-check: another caller may have built it while we waited.
        if let Some(sender) = slot.instances.get(name) {
            return Ok(sender.clone());
        }

        let factory = slot
            .factories
            .get(name)
            .ok_or_else(|| Error::not_registered(M::KIND, name))?;
        let sender = factory(config)?;
        slot.instances.insert(name.to_string(), sender.clone());
        info!(kind = %M::KIND, provider = %name, "provider constructed");
        Ok(sender)
    }
}
