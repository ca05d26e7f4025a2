//! Memory port trait used by the DUT.
//!
//! This is the narrow channel through which a device under test touches the
//! harness during a clock evaluation: a 4-byte read and a 1-4 byte write. The
//! address space implements it; tests substitute recording ports.

use crate::common::error::AccessFault;

/// Data-side memory interface offered to a DUT.
pub trait MemoryPort {
    /// Reads four little-endian bytes at `addr`.
    ///
    /// # Errors
    ///
    /// Returns an [`AccessFault`] when the read is refused. The DUT sees the
    /// value as zero; the fault is also latched for the driver.
    fn read32(&mut self, addr: u32) -> Result<u32, AccessFault>;

    /// Writes the low `len` bytes of `data` (little-endian) at `addr`.
    ///
    /// Refused writes are diagnosed and dropped; they never fault.
    fn write(&mut self, addr: u32, data: u32, len: u8);

    /// Returns `true` when `addr` is claimed by a memory-mapped device rather
    /// than the memory window.
    fn is_device(&self, _addr: u32) -> bool {
        false
    }
}
