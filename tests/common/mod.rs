//! Integration test common infrastructure.
//!
//! Provides an in-process test server on an ephemeral port and a JSON
//! client for asserting on responses.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::{TestClient, TestResponse};
#[allow(unused_imports)]
pub use server::{BACKENDS, TestServer};
