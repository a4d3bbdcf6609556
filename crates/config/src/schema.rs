use std::collections::HashMap;

use {
    relay_contracts::Kind,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::warn,
};

/// Flat per-provider configuration bag.
///
/// Every provider reads the fields it needs and rejects the bag with a
/// `Config` error when a required field is missing; unknown extras travel
/// in `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<Secret<String>>,
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_secret: Option<Secret<String>>,
    pub region: Option<String>,
    pub base_url: Option<String>,
    // Email
    pub domain: Option<String>,
    pub from_email: Option<String>,
    pub from_name: Option<String>,
    // SMS / chat
    pub from_phone: Option<String>,
    pub webhook_url: Option<String>,
    // Push
    pub app_id: Option<String>,
    pub topic: Option<String>,
    /// Provider-specific fields with no dedicated slot.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

impl ProviderConfig {
    /// Exposed API key, if configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|s| s.expose_secret().as_str())
    }

    /// Exposed API secret, if configured.
    #[must_use]
    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_ref().map(|s| s.expose_secret().as_str())
    }
}

/// Configuration for one message kind: the default provider name plus the
/// per-provider bags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KindConfig {
    pub default_provider: Option<String>,
    pub providers: HashMap<String, ProviderConfig>,
}

/// Root configuration consumed by the dispatch service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub email: KindConfig,
    pub sms: KindConfig,
    pub push: KindConfig,
    pub chat: KindConfig,
}

impl GatewayConfig {
    /// Configuration section for one kind.
    #[must_use]
    pub fn kind(&self, kind: Kind) -> &KindConfig {
        match kind {
            Kind::Email => &self.email,
            Kind::Sms => &self.sms,
            Kind::Push => &self.push,
            Kind::Chat => &self.chat,
        }
    }

    fn kind_mut(&mut self, kind: Kind) -> &mut KindConfig {
        match kind {
            Kind::Email => &mut self.email,
            Kind::Sms => &mut self.sms,
            Kind::Push => &mut self.push,
            Kind::Chat => &mut self.chat,
        }
    }

    /// Default provider name for a kind. An empty string counts as
    /// unconfigured.
    #[must_use]
    pub fn default_provider(&self, kind: Kind) -> Option<&str> {
        self.kind(kind)
            .default_provider
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// Set the default provider for a kind (builder-style, mainly for
    /// tests and embedding).
    #[must_use]
    pub fn with_default_provider(mut self, kind: Kind, name: impl Into<String>) -> Self {
        self.kind_mut(kind).default_provider = Some(name.into());
        self
    }

    /// Insert a provider bag for a kind (builder-style).
    #[must_use]
    pub fn with_provider(
        mut self,
        kind: Kind,
        name: impl Into<String>,
        config: ProviderConfig,
    ) -> Self {
        self.kind_mut(kind).providers.insert(name.into(), config);
        self
    }

    /// Configuration bag for a named provider. Providers without an entry
    /// get an empty bag; the factory decides whether that is acceptable.
    #[must_use]
    pub fn provider(&self, kind: Kind, name: &str) -> ProviderConfig {
        self.kind(kind).providers.get(name).cloned().unwrap_or_default()
    }

    /// Flag defaults that point at providers with no configuration entry.
    ///
    /// Not fatal: built-ins like "memory" need no configuration. Findings
    /// are returned for the embedding application to surface and logged
    /// at warn level.
    pub fn validate(&self) -> Vec<String> {
        let mut findings = Vec::new();
        for kind in Kind::ALL {
            let section = self.kind(kind);
            if let Some(name) = self.default_provider(kind)
                && name != "memory"
                && !section.providers.contains_key(name)
            {
                findings.push(format!(
                    "{kind}: default provider '{name}' has no configuration entry"
                ));
            }
        }
        for finding in &findings {
            warn!("config: {finding}");
        }
        findings
    }
}

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
