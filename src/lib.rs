//! CoexBench firmware library.
//!
//! Exposes the pure-logic modules (URL parsing, throughput probe, suite
//! runner, retry policy) for integration testing and external inspection.
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod config;
pub mod ports;
pub mod probe;
pub mod request;
pub mod retry;
pub mod runner;

mod error;

pub use error::{Error, Result};

// Platform adapters — real ESP-IDF implementations are cfg-gated inside,
// with host-side simulation counterparts for testing.
pub mod adapters;
