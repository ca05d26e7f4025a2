//! The DUT's view of the outside world.
//!
//! This module implements everything the device under test can reach:
//! 1. **Memory:** Zeroed backing storage for the physical memory window.
//! 2. **Devices:** The clock and serial-output devices.
//! 3. **Address space:** Decoding, bounds checks and fault latching.
//! 4. **Traits:** The `MemoryPort` interface a DUT drives during evaluation.

/// Address decoding and bounds checking.
pub mod address_space;

/// Memory-mapped devices.
pub mod devices;

/// Backing storage for the memory window.
pub mod memory;

/// Memory port trait.
pub mod traits;

pub use address_space::{AccessStats, AddressSpace};
pub use traits::MemoryPort;
