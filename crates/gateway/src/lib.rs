//! The dispatch service: the single entry point callers use to send a
//! message, hiding provider resolution behind the registry.
//!
//! The gateway is a stateless router per call; all provider state lives
//! in the [`Registry`]. Provider errors pass through unchanged so callers
//! can always tell a routing failure from a delivery failure.

pub mod builtin;

use std::sync::Arc;

use {
    relay_config::GatewayConfig,
    relay_contracts::{DynSender, Error, Result, SendResult},
    relay_registry::{Registry, Routable},
    tracing::{debug, info, warn},
};

pub use builtin::register_builtin_providers;

/// Placeholder provider name reported when a kind has no configured
/// default.
const NO_DEFAULT: &str = "default (none configured)";

/// Routes outbound messages to the right provider.
pub struct Gateway {
    config: GatewayConfig,
    registry: Arc<Registry>,
}

impl Gateway {
    #[must_use]
    pub fn new(config: GatewayConfig, registry: Arc<Registry>) -> Self {
        Self { config, registry }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Send through the kind's configured default provider.
    ///
    /// Fails fast with `ProviderNotFound` when no default is configured,
    /// without touching the registry.
    pub async fn send<M: Routable>(&self, message: &M) -> Result<SendResult> {
        match self.config.default_provider(M::KIND) {
            Some(name) => {
                let name = name.to_string();
                self.send_with(&name, message).await
            },
            None => Err(Error::provider_not_found(M::KIND, NO_DEFAULT)),
        }
    }

    /// Send through a named provider, constructing it lazily on first
    /// use. The provider's result or error is returned verbatim.
    pub async fn send_with<M: Routable>(&self, name: &str, message: &M) -> Result<SendResult> {
        let sender = self.provider::<M>(name).await?;
        match sender.send(message).await {
            Ok(result) => {
                info!(kind = %M::KIND, provider = %name, id = %result.id, "message dispatched");
                Ok(result)
            },
            Err(err) => {
                warn!(kind = %M::KIND, provider = %name, error = %err, "dispatch failed");
                Err(err)
            },
        }
    }

    /// Resolve the default provider for a kind without sending.
    pub async fn default_provider<M: Routable>(&self) -> Result<DynSender<M>> {
        match self.config.default_provider(M::KIND) {
            Some(name) => {
                let name = name.to_string();
                self.provider::<M>(&name).await
            },
            None => Err(Error::provider_not_found(M::KIND, NO_DEFAULT)),
        }
    }

    /// Resolve a named provider without sending, constructing lazily.
    ///
    /// An unregistered name surfaces as `ProviderNotFound`; factory
    /// failures (`Config`, ...) pass through unchanged.
    pub async fn provider<M: Routable>(&self, name: &str) -> Result<DynSender<M>> {
        debug!(kind = %M::KIND, provider = %name, "resolving provider");
        let config = self.config.provider(M::KIND, name);
        self.registry
            .get_or_create::<M>(name, &config)
            .await
            .map_err(|err| match err {
                Error::NotRegistered { kind, name } => Error::ProviderNotFound { kind, name },
                other => other,
            })
    }

    /// Manually inject a ready-made provider (test doubles, embedders).
    pub async fn register_provider<M: Routable>(
        &self,
        name: impl Into<String>,
        sender: DynSender<M>,
    ) {
        self.registry.register_instance::<M>(name, sender).await;
    }
}
