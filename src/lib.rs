//! quillpost - users and articles over a small JSON HTTP API.
//!
//! The binary in `main.rs` wires these modules together; integration tests
//! drive the same router in-process.

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod models;
pub mod store;
pub mod telemetry;
