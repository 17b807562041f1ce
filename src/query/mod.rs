//! Caching layer: keyed entries, strategies, observers and guards.

mod cache;
pub mod guard;
mod handle;
mod metrics;
mod state;
mod strategy;

pub use cache::{QueryClient, QueryOptions};
pub use handle::QueryHandle;
pub use metrics::{MetricsReport, QueryMetrics};
pub use state::{QueryState, QueryStatus};
pub use strategy::QueryStrategy;
