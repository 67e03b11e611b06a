//! tsvault gateway library entry.
//!
//! This crate wires configuration, the storage backend, the query API and
//! the ops endpoints around the `tsvault-core` engine. It is consumed by the
//! binaries (`tsvault-gateway`, `tsvault-seed`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod obs;
pub mod ops;
pub mod router;
pub mod seed;
pub mod storage;
