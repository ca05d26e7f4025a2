//! # Error Display Tests

use std::io;

use dutbench_core::common::{AccessFault, ConfigError, HarnessError, LoadError};
use pretty_assertions::assert_eq;

#[test]
fn access_fault_message() {
    let fault = AccessFault::ReadOutOfBounds { addr: 0x9000_0010 };
    assert_eq!(fault.to_string(), "physical memory read out of bounds: 0x90000010");
    assert_eq!(fault.addr(), 0x9000_0010);
}

#[test]
fn config_messages() {
    assert_eq!(ConfigError::EmptyMemory.to_string(), "memory window is empty");
    assert_eq!(
        ConfigError::ResultRegister(0).to_string(),
        "register x0 cannot hold a result"
    );
    assert_eq!(
        ConfigError::DeviceInsideMemory { device: "clock", addr: 0x8000_0000 }.to_string(),
        "clock address 0x80000000 lies inside the memory window"
    );
}

#[test]
fn harness_error_wraps_sources() {
    let load = LoadError::Open {
        path: "prog.bin".into(),
        source: io::Error::from(io::ErrorKind::NotFound),
    };
    let err = HarnessError::from(load);
    assert_eq!(err.to_string(), "failed to open binary file: prog.bin");
    assert!(std::error::Error::source(&err).is_some());

    let err = HarnessError::from(ConfigError::EmptyMemory);
    assert_eq!(err.to_string(), "memory window is empty");
}
