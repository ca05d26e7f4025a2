//! Functional test harness for two-phase-clocked RV32 execution cores.
//!
//! This crate drives an externally supplied CPU core (the device under test) and
//! judges its run as pass or fail. It provides:
//! 1. **Address space:** A flat, bounds-checked physical memory window plus a clock
//!    device and a serial-output device at fixed addresses.
//! 2. **Itrace:** A fixed-capacity ring of the most recent `(pc, instr)` fetches.
//! 3. **Loader:** Raw little-endian program images copied to the memory base.
//! 4. **Driver:** Reset sequencing, clock stepping and termination detection.
//! 5. **Reference core:** A single-cycle RV32I model implementing the [`Dut`]
//!    interface, used when no external core is attached.

/// Common types and constants (access faults, error enums, device defaults).
pub mod common;
/// Harness configuration (memory window, device addresses, trace options).
pub mod config;
/// Reference RV32I core implementing the DUT interface.
pub mod core;
/// Instruction set definitions used by the reference core (RV32I subset).
pub mod isa;
/// Program loading, itrace, DUT interface and the simulation driver.
pub mod sim;
/// Address space and memory-mapped devices.
pub mod soc;
/// Run statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `HarnessConfig::default()` or parse from JSON.
pub use crate::config::HarnessConfig;
/// Reference core; drop-in DUT when no external core is attached.
pub use crate::core::RefCore;
/// Interface every device under test implements.
pub use crate::sim::dut::Dut;
/// Simulation driver and its terminal outcome.
pub use crate::sim::driver::{Harness, RunOutcome};
/// Physical address space seen by the DUT.
pub use crate::soc::AddressSpace;
