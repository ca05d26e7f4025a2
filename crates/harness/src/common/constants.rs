//! Global Harness Constants.
//!
//! This module defines the fixed values of the harness. It includes:
//! 1. **Memory Map:** Physical memory window and device addresses.
//! 2. **Itrace:** Depth of the fetch history ring.
//! 3. **Protocol:** Result register and the pass/fail markers printed at exit.

/// Base address of the physical memory window.
pub const PHYS_MEM_BASE: u32 = 0x8000_0000;

/// Size of the physical memory window in bytes (256 MiB).
pub const PHYS_MEM_SIZE: u32 = 0x1000_0000;

/// Clock device address. Reads return the low 32 bits of a microsecond counter.
pub const RTC_ADDR: u32 = 0xa000_0048;

/// Serial-output device address. The low byte of each write is emitted.
pub const SERIAL_PORT: u32 = 0xa000_03f8;

/// Number of fetch events retained by the itrace ring.
pub const ITRACE_DEPTH: usize = 32;

/// Register read at halt to decide pass or fail (`a0`).
pub const RESULT_REG: usize = 10;

/// Size of one image word in bytes.
pub const WORD_BYTES: u32 = 4;

/// Image loaded when neither the command line nor `IMG` names one.
pub const DEFAULT_IMAGE_PATH: &str = "build/dummy-minirv-npc.bin";

/// Environment variable overriding the default image path.
pub const IMAGE_ENV_VAR: &str = "IMG";

/// Printed when the DUT halts with a zero result register.
pub const GOOD_TRAP_MARKER: &str = "HIT GOOD TRAP";

/// Printed when the run fails (bad trap or memory fault).
pub const BAD_TRAP_MARKER: &str = "HIT BAD TRAP";

/// Process exit status for a passing run.
pub const EXIT_PASS: i32 = 0;

/// Process exit status for a failing run or a fatal load error.
pub const EXIT_FAIL: i32 = 1;
