//! Already-parsed configuration structures for the relay gateway.
//!
//! Loading (YAML files, environment overrides) happens in the embedding
//! application; this crate only defines the shapes that factories and the
//! dispatch service consume, plus lookup helpers.

pub mod schema;

pub use schema::{GatewayConfig, KindConfig, ProviderConfig};
