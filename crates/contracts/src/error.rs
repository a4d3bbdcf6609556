use std::error::Error as StdError;

use crate::kind::Kind;

/// Crate-wide result type for dispatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors shared across the dispatch core.
///
/// Callers match on variants; no error-string inspection is ever needed
/// to tell a routing failure from a delivery failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No factory is registered for this (kind, name) pair.
    #[error("no {kind} factory registered under '{name}'")]
    NotRegistered { kind: Kind, name: String },

    /// Dispatch could not resolve a default or named provider.
    #[error("{kind} provider '{name}' not found")]
    ProviderNotFound { kind: Kind, name: String },

    /// A factory rejected its configuration.
    #[error("invalid configuration for {provider}: {field}: {message}")]
    Config {
        provider: String,
        field: String,
        message: String,
    },

    /// The underlying vendor call failed.
    #[error("{provider}: {message} (code: {status_code})")]
    Provider {
        provider: String,
        status_code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// JSON (de)serialization failed.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn not_registered(kind: Kind, name: impl Into<String>) -> Self {
        Self::NotRegistered {
            kind,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn provider_not_found(kind: Kind, name: impl Into<String>) -> Self {
        Self::ProviderNotFound {
            kind,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn config(
        provider: impl Into<String>,
        field: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::Config {
            provider: provider.into(),
            field: field.into(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn provider(
        provider: impl Into<String>,
        status_code: u16,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            status_code,
            message: message.to_string(),
            source: None,
        }
    }

    #[must_use]
    pub fn provider_with_source(
        provider: impl Into<String>,
        status_code: u16,
        message: impl std::fmt::Display,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            status_code,
            message: message.to_string(),
            source: Some(Box::new(source)),
        }
    }
}
