//! Device-under-test interface.
//!
//! The harness treats the core as a black box with a handful of signals:
//! clock and reset inputs, program-counter and instruction outputs, a halt
//! notification and a register read-back port. Between signal changes the
//! harness calls [`Dut::eval`], during which the core settles and may issue
//! reads and writes through the supplied [`MemoryPort`].
//!
//! Any core can sit behind this trait: the bundled [`RefCore`](crate::RefCore),
//! a scripted test double, or a binding to an RTL simulator.

use crate::soc::MemoryPort;

/// Signal-level interface of a two-phase clocked core.
pub trait Dut {
    /// Drives the clock input.
    fn set_clk(&mut self, level: bool);

    /// Drives the synchronous reset input (active high).
    fn set_rst(&mut self, level: bool);

    /// Settles the core after an input change.
    ///
    /// Memory traffic issued while settling goes through `mem`.
    fn eval(&mut self, mem: &mut dyn MemoryPort);

    /// Program counter output.
    fn pc(&self) -> u32;

    /// Last fetched instruction output.
    fn instr(&self) -> u32;

    /// Returns `true` once the core has executed its halt (breakpoint) instruction.
    fn halted(&self) -> bool;

    /// Reads general-purpose register `index` for result inspection.
    fn read_reg(&self, index: usize) -> u32;
}

impl<D: Dut + ?Sized> Dut for Box<D> {
    fn set_clk(&mut self, level: bool) {
        (**self).set_clk(level);
    }

    fn set_rst(&mut self, level: bool) {
        (**self).set_rst(level);
    }

    fn eval(&mut self, mem: &mut dyn MemoryPort) {
        (**self).eval(mem);
    }

    fn pc(&self) -> u32 {
        (**self).pc()
    }

    fn instr(&self) -> u32 {
        (**self).instr()
    }

    fn halted(&self) -> bool {
        (**self).halted()
    }

    fn read_reg(&self, index: usize) -> u32 {
        (**self).read_reg(index)
    }
}
