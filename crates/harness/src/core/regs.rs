//! General-purpose register file.
//!
//! Thirty-two 32-bit registers with `x0` hardwired to zero.

use std::io::{self, Write};

use crate::isa::abi::{REG_ZERO, reg_name};

/// RV32 integer register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u32; 32],
}

impl RegisterFile {
    /// Creates a register file with every register zero.
    pub const fn new() -> Self {
        Self { regs: [0; 32] }
    }

    /// Reads register `idx`. Out-of-range indices and `x0` read as zero.
    pub fn read(&self, idx: usize) -> u32 {
        self.regs.get(idx).copied().unwrap_or(0)
    }

    /// Writes register `idx`. Writes to `x0` or out-of-range indices are ignored.
    pub fn write(&mut self, idx: usize, val: u32) {
        if idx != REG_ZERO {
            if let Some(reg) = self.regs.get_mut(idx) {
                *reg = val;
            }
        }
    }

    /// Clears every register.
    pub fn clear(&mut self) {
        self.regs = [0; 32];
    }

    /// Writes all registers, four per line, with ABI names.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn dump<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for row in 0..8 {
            for col in 0..4 {
                let idx = row * 4 + col;
                write!(out, "{:>4}: {:#010x}  ", reg_name(idx), self.regs[idx])?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
