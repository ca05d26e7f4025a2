//! Error and fault definitions.
//!
//! This module defines the failure modes of the harness. It provides:
//! 1. **Access Faults:** Out-of-bounds reads reported by the address space.
//! 2. **Load Errors:** Failures to open or read a program image.
//! 3. **Config Errors:** Malformed or inconsistent harness configuration.
//! 4. **Harness Errors:** An umbrella type for the command-line front end.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A memory access the address space refused.
///
/// Returned as a value, never raised: the driver alone decides that a fault
/// ends the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AccessFault {
    /// A 4-byte read fell partly or wholly outside the memory window.
    #[error("physical memory read out of bounds: {addr:#010x}")]
    ReadOutOfBounds {
        /// The address the DUT tried to read.
        addr: u32,
    },
}

impl AccessFault {
    /// Returns the faulting address.
    pub const fn addr(&self) -> u32 {
        match *self {
            Self::ReadOutOfBounds { addr } => addr,
        }
    }
}

/// Failure to bring a program image into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be opened. Nothing can be simulated.
    #[error("failed to open binary file: {}", path.display())]
    Open {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The image file was opened but reading it failed midway.
    #[error("failed to read binary file: {}", path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Rejected harness configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document did not match the configuration schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The configuration file could not be read.
    #[error("failed to read configuration {}", path.display())]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The memory window has zero length.
    #[error("memory window is empty")]
    EmptyMemory,
    /// `base + size` runs past the 32-bit physical address space.
    #[error("memory window {base:#010x}+{size:#x} exceeds the 32-bit address space")]
    WindowOverflow {
        /// Configured base.
        base: u32,
        /// Configured size.
        size: u32,
    },
    /// A device address lies inside the memory window and would shadow storage.
    #[error("{device} address {addr:#010x} lies inside the memory window")]
    DeviceInsideMemory {
        /// Device name.
        device: &'static str,
        /// Configured device address.
        addr: u32,
    },
    /// The clock and serial devices were given the same address.
    #[error("clock and serial devices share address {0:#010x}")]
    DeviceCollision(u32),
    /// The result register index is `x0` or not a valid GPR.
    #[error("register x{0} cannot hold a result")]
    ResultRegister(usize),
}

/// Top-level error for the command-line front end.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Program image failed to load.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Writing protocol output failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
