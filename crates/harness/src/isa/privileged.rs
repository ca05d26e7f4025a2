//! System instruction encodings.
//!
//! The reference core runs in a single privilege level without CSRs; only the
//! environment call and breakpoint encodings are recognised.

/// System instruction opcode (0b1110011).
pub const OP_SYSTEM: u32 = 0b1110011;

/// Environment Call (ECALL).
pub const ECALL: u32 = 0x0000_0073;

/// Environment Break (EBREAK). Ends the run; the result register decides the verdict.
pub const EBREAK: u32 = 0x0010_0073;
