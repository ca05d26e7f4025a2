//! Simulation: image loading, fetch tracing and clock driving.
//!
//! 1. **Loader:** Raw images into the address space.
//! 2. **Itrace:** Fixed-capacity ring of recent fetches.
//! 3. **DUT:** The signal-level interface of the core under test.
//! 4. **Driver:** Reset sequencing, the run loop and termination reporting.

pub mod driver;
pub mod dut;
pub mod itrace;
pub mod loader;

pub use driver::{FailureCause, Harness, Phase, RunOutcome};
pub use dut::Dut;
pub use itrace::{FetchEvent, TraceBuffer, TraceEntry};
pub use loader::{LoadReport, load_bytes, load_image};
