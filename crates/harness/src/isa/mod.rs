//! Instruction Set Definitions.
//!
//! Opcodes, function codes and decoding logic for the RV32I base integer set
//! executed by the reference core.
//!
//! # Modules
//!
//! * `rv32i`: Base integer opcodes and function codes.
//! * `privileged`: System opcode and the ECALL/EBREAK encodings.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Instruction decoding logic for the R, I, S, B, U and J formats.
pub mod decode;

/// Instruction disassembler for trace output.
pub mod disasm;

/// Instruction field extraction.
pub mod instruction;

/// System instruction encodings.
pub mod privileged;

/// Base integer instruction set (32-bit).
pub mod rv32i;
