#![deny(unsafe_code)]

//! Shared test utilities for the crashview workspace.
//!
//! Provides reusable fixtures, config builders, an in-memory reader and
//! tracing helpers so that individual crate tests stay concise and
//! consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! crashview-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod fixtures;
pub mod http;
pub mod reader;
pub mod stack;
pub mod tracing_setup;
