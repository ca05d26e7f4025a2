//! Common types shared across the harness.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Constants:** Default memory map, itrace depth and protocol markers.
//! 2. **Error Handling:** Access faults, loader errors, config errors and the
//!    umbrella `HarnessError` used by the CLI.

/// Default memory map and protocol constants.
pub mod constants;

/// Error types and access fault definitions.
pub mod error;

pub use constants::ITRACE_DEPTH;
pub use error::{AccessFault, ConfigError, HarnessError, LoadError};
