//! Top-level facade crate for tsvault.
//!
//! Re-exports the query engine and the gateway library so users can depend on a single crate.

pub mod core {
    pub use tsvault_core::*;
}

pub mod gateway {
    pub use tsvault_gateway::*;
}
