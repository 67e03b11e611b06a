//! tsvault core: measurement model, query planning, snapshot storage,
//! projection and streaming statistics.
//!
//! This crate is the query engine behind the HTTP gateway. It carries no
//! transport or async runtime dependencies: everything here is synchronous
//! in-memory computation over immutable snapshots, so it can be reused by
//! the gateway, the seeding tool and tests alike.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `TsVaultError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;
pub mod project;
pub mod query;
pub mod stats;
pub mod store;

/// Shared result type.
pub use error::{Result, TsVaultError};
pub use model::{Field, Measurement};
pub use query::{validate_and_build, QueryKind, QuerySpec, TimeRange};
pub use stats::{aggregate, MetricsSummary, Stats};
pub use store::{Scan, SnapshotStore};
