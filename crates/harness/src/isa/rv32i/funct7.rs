//! RV32I function codes (funct7, bits 31-25).

/// Default encoding (ADD, SRL, SRLI, ...).
pub const DEFAULT: u32 = 0b0000000;

/// Alternate encoding (SUB, SRA, SRAI).
pub const SUB_SRA: u32 = 0b0100000;
