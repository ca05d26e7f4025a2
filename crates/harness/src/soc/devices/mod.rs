//! Memory-mapped devices visible to the DUT.
//!
//! Both devices occupy a single address outside the memory window:
//! 1. **Rtc:** Read-only microsecond counter.
//! 2. **SerialPort:** Write-only character output.

/// Microsecond clock device.
pub mod rtc;

/// Character output device.
pub mod serial;

pub use rtc::Rtc;
pub use serial::SerialPort;
