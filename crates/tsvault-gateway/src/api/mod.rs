//! Public query API.
//!
//! - `GET /api/measurements`         : field projection over a date range
//! - `GET /api/measurements/metrics` : summary statistics for a field

pub mod measurements;
