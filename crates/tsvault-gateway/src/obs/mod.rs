//! Observability: tracing setup and the in-process metrics registry.

pub mod metrics;

use tracing_subscriber::{fmt, EnvFilter};

pub use metrics::QueryMetrics;

/// Install the global `fmt` subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}
