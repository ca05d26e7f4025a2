//! Clock device.
//!
//! A read-only device at a single fixed address. Each 32-bit read returns the
//! low 32 bits of a microsecond counter. The counter is taken from a monotonic
//! host clock started when the device is created, so two reads in sequence
//! never go backwards (until the counter wraps after roughly 71 minutes).
//!
//! The device owns no storage; reads and writes at its address never reach
//! the memory window.

use std::time::Instant;

/// Microsecond clock device.
#[derive(Debug)]
pub struct Rtc {
    /// Address the device answers on.
    addr: u32,
    /// Host instant that counts as time zero.
    epoch: Instant,
}

impl Rtc {
    /// Creates a clock device at `addr`, starting the counter now.
    pub fn new(addr: u32) -> Self {
        Self {
            addr,
            epoch: Instant::now(),
        }
    }

    /// Returns the device address.
    pub const fn addr(&self) -> u32 {
        self.addr
    }

    /// Returns the full microsecond count since the device was created.
    pub fn micros(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }

    /// Reads the counter as the DUT sees it: the low 32 bits.
    pub fn read_u32(&self) -> u32 {
        self.micros() as u32
    }
}
