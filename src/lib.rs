//! Typed, validated and cached access to the portfolio content API.
//!
//! Layers, bottom up: `client` performs GETs, `schema` validates payloads,
//! `fetchers` combine the two per endpoint, `query` caches results under
//! `keys`, and `hooks::Portfolio` binds everything to the active language.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod fetchers;
pub mod hooks;
pub mod i18n;
pub mod keys;
pub mod query;
pub mod retry;
pub mod schema;

pub use client::ApiClient;
pub use config::Config;
pub use error::{ApiError, ErrorReason, ResourceDomain, ResponseError, TransportError};
pub use hooks::Portfolio;
pub use i18n::{Language, LanguageStore};
pub use keys::QueryKey;
pub use query::{QueryClient, QueryHandle, QueryOptions, QueryState, QueryStatus, QueryStrategy};
