//! Physical address space seen by the DUT.
//!
//! Routes every access either to one of the two devices or to the memory
//! window:
//! 1. **Clock device:** Reads at its address return the microsecond counter.
//!    Writes are diagnosed and ignored. Neither touches storage.
//! 2. **Serial device:** Writes at its address emit the low byte and never touch
//!    storage. Bounds are not checked for this address.
//! 3. **Memory window:** Everything else must fall fully inside
//!    `[base, base + size)`.
//!
//! Out-of-bounds reads are faults: with fault reporting enabled they are
//! diagnosed, latched for the driver and returned as an error. Before the DUT
//! leaves reset, reporting is disabled and such reads quietly return zero.
//! Out-of-bounds writes are diagnosed and dropped regardless of reporting.

use tracing::{error, warn};

use crate::common::error::AccessFault;
use crate::config::HarnessConfig;
use crate::soc::devices::{Rtc, SerialPort};
use crate::soc::memory::PhysMemory;
use crate::soc::traits::MemoryPort;

/// Access counters kept by the address space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessStats {
    /// 4-byte reads issued, including device and faulting reads.
    pub reads: u64,
    /// Writes issued, including device and dropped writes.
    pub writes: u64,
    /// Out-of-bounds reads reported as faults.
    pub faults: u64,
    /// Out-of-bounds reads swallowed while reporting was disabled.
    pub suppressed_faults: u64,
    /// Writes dropped for falling outside the window.
    pub dropped_writes: u64,
}

/// Flat physical address space with two memory-mapped devices.
#[derive(Debug)]
pub struct AddressSpace {
    memory: PhysMemory,
    rtc: Rtc,
    serial: SerialPort,
    /// Whether out-of-bounds reads count as faults.
    fault_reporting: bool,
    /// First fault since the driver last looked.
    pending_fault: Option<AccessFault>,
    stats: AccessStats,
}

impl AddressSpace {
    /// Builds the address space described by `config`, with serial output
    /// going to stdout.
    ///
    /// `config` is expected to have passed [`HarnessConfig::validate`].
    pub fn new(config: &HarnessConfig) -> Self {
        Self::with_serial(config, SerialPort::stdout(config.devices.serial_addr))
    }

    /// Builds the address space with serial output kept in memory.
    pub fn capturing(config: &HarnessConfig) -> Self {
        Self::with_serial(config, SerialPort::capturing(config.devices.serial_addr))
    }

    /// Builds the address space around an explicit serial device.
    pub fn with_serial(config: &HarnessConfig, serial: SerialPort) -> Self {
        Self {
            memory: PhysMemory::new(config.memory.base, config.memory.size),
            rtc: Rtc::new(config.devices.rtc_addr),
            serial,
            fault_reporting: true,
            pending_fault: None,
            stats: AccessStats::default(),
        }
    }

    /// Returns the first address of the memory window.
    pub const fn base(&self) -> u32 {
        self.memory.base()
    }

    /// Returns the memory window length in bytes.
    pub fn size(&self) -> u32 {
        self.memory.size()
    }

    /// Returns one past the last window address.
    pub fn end(&self) -> u64 {
        self.memory.end()
    }

    /// Enables or disables fault reporting for out-of-bounds reads.
    pub const fn set_fault_reporting(&mut self, enabled: bool) {
        self.fault_reporting = enabled;
    }

    /// Returns whether out-of-bounds reads are currently reported.
    pub const fn fault_reporting(&self) -> bool {
        self.fault_reporting
    }

    /// Takes the latched fault, if any access faulted since the last call.
    pub const fn take_fault(&mut self) -> Option<AccessFault> {
        self.pending_fault.take()
    }

    /// Returns `true` when a fault is latched and not yet taken.
    pub const fn has_fault(&self) -> bool {
        self.pending_fault.is_some()
    }

    /// Reads four bytes at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessFault::ReadOutOfBounds`] when `[addr, addr + 4)` leaves the
    /// window and fault reporting is enabled.
    pub fn read32(&mut self, addr: u32) -> Result<u32, AccessFault> {
        self.stats.reads += 1;
        if addr == self.rtc.addr() {
            return Ok(self.rtc.read_u32());
        }
        let Some(offset) = self.memory.offset(addr, 4) else {
            if !self.fault_reporting {
                self.stats.suppressed_faults += 1;
                return Ok(0);
            }
            let fault = AccessFault::ReadOutOfBounds { addr };
            error!("{fault}");
            self.stats.faults += 1;
            let _ = self.pending_fault.get_or_insert(fault);
            return Err(fault);
        };
        Ok(self.memory.read_u32(offset))
    }

    /// Writes the low `len` bytes of `data` at `addr`, little-endian.
    ///
    /// `len` must be 1 to 4. Writes to the serial device emit one character.
    /// Anything else outside the window is diagnosed and dropped.
    pub fn write(&mut self, addr: u32, data: u32, len: u8) {
        self.stats.writes += 1;
        if addr == self.serial.addr() {
            self.serial.write_u32(data);
            return;
        }
        if addr == self.rtc.addr() {
            warn!("write to read-only clock device at {addr:#010x} ignored");
            self.stats.dropped_writes += 1;
            return;
        }
        if !(1..=4).contains(&len) {
            warn!("invalid write length {len} at {addr:#010x}, write dropped");
            self.stats.dropped_writes += 1;
            return;
        }
        let Some(offset) = self.memory.offset(addr, u32::from(len)) else {
            warn!("physical memory write out of bounds: {addr:#010x}");
            self.stats.dropped_writes += 1;
            return;
        };
        self.memory.write_le(offset, data, usize::from(len));
    }

    /// Returns `true` for the clock and serial device addresses.
    pub const fn is_device(&self, addr: u32) -> bool {
        addr == self.rtc.addr() || addr == self.serial.addr()
    }

    /// Returns the byte at `addr` without counting an access.
    pub fn peek(&self, addr: u32) -> Option<u8> {
        self.memory.peek(addr)
    }

    /// Returns the word at `addr` without counting an access or faulting.
    pub fn peek_u32(&self, addr: u32) -> Option<u32> {
        self.memory
            .offset(addr, 4)
            .map(|off| self.memory.read_u32(off))
    }

    /// Returns the whole memory window.
    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    /// Returns the serial device.
    pub const fn serial(&self) -> &SerialPort {
        &self.serial
    }

    /// Returns the serial device mutably (for flushing).
    pub const fn serial_mut(&mut self) -> &mut SerialPort {
        &mut self.serial
    }

    /// Returns the clock device.
    pub const fn rtc(&self) -> &Rtc {
        &self.rtc
    }

    /// Returns the access counters.
    pub const fn stats(&self) -> AccessStats {
        self.stats
    }
}

impl MemoryPort for AddressSpace {
    fn read32(&mut self, addr: u32) -> Result<u32, AccessFault> {
        Self::read32(self, addr)
    }

    fn write(&mut self, addr: u32, data: u32, len: u8) {
        Self::write(self, addr, data, len);
    }

    fn is_device(&self, addr: u32) -> bool {
        Self::is_device(self, addr)
    }
}
