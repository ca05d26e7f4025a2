//! Reference RV32I core.
//!
//! A single-cycle model of the kind of core the harness is built to test. It
//! implements [`Dut`] so the harness can run end to end without an external
//! RTL simulator, and so the driver can be exercised against real encodings.
//!
//! It is a stand-in DUT, not a conformance model. Only the RV32I base set is
//! decoded; extension encodings (M, A, C, Zicsr) take the illegal path below.
//!
//! # Timing
//!
//! * **Posedge:** With reset high the PC returns to the reset vector and the
//!   register file clears. Otherwise the latched instruction executes, once
//!   the core has seen its first reset.
//! * **Every evaluation:** Unless halted, the instruction at the PC is fetched
//!   combinationally and presented on the `instr` output.
//!
//! # Memory
//!
//! Loads and stores both drive the data port with a 4-byte read of the
//! effective address; stores then write 1, 2 or 4 bytes. A store outside the
//! memory window therefore faults through its read. Device addresses skip the
//! read on stores, so writing the serial port is clean.
//!
//! # Halting
//!
//! `ebreak` raises the halt output. An unimplemented encoding also halts, with
//! the result register forced to a non-zero value so the run fails.

/// General-purpose register file.
pub mod regs;

use tracing::{error, trace};

use crate::common::constants::RESULT_REG;
use crate::config::HarnessConfig;
use crate::isa::decode::decode;
use crate::isa::disasm::disassemble;
use crate::isa::instruction::Decoded;
use crate::isa::privileged::{EBREAK, ECALL, OP_SYSTEM};
use crate::isa::rv32i::{funct3 as f3, funct7 as f7, opcodes as op};
use crate::sim::dut::Dut;
use crate::soc::MemoryPort;

pub use regs::RegisterFile;

/// Result register value left behind by an unimplemented instruction.
pub const ILLEGAL_INSTRUCTION_RESULT: u32 = 0xFFFF_FFFF;

/// Single-cycle RV32I reference core.
#[derive(Clone, Debug)]
pub struct RefCore {
    clk: bool,
    prev_clk: bool,
    rst: bool,
    pc: u32,
    instr: u32,
    regs: RegisterFile,
    halted: bool,
    /// Set by the first reset; nothing executes before it.
    out_of_reset: bool,
    reset_vector: u32,
    result_reg: usize,
    trace: bool,
    retired: u64,
}

impl RefCore {
    /// Creates a core that resets to `reset_vector`.
    ///
    /// Before the first reset the PC is zero, as an uninitialised core would be.
    pub const fn new(reset_vector: u32) -> Self {
        Self {
            clk: false,
            prev_clk: false,
            rst: false,
            pc: 0,
            instr: 0,
            regs: RegisterFile::new(),
            halted: false,
            out_of_reset: false,
            reset_vector,
            result_reg: RESULT_REG,
            trace: false,
            retired: 0,
        }
    }

    /// Creates a core matching `config`: reset vector at the memory base.
    ///
    /// `config` is expected to have passed [`HarnessConfig::validate`].
    pub const fn from_config(config: &HarnessConfig) -> Self {
        let mut core = Self::new(config.memory.base);
        core.result_reg = config.general.result_reg;
        core.trace = config.general.trace_instructions;
        core
    }

    /// Enables per-instruction `trace` level logging.
    #[must_use]
    pub const fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    /// Returns the register file.
    pub const fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    /// Overwrites a register, e.g. to preset a result before a run.
    pub fn set_reg(&mut self, idx: usize, val: u32) {
        self.regs.write(idx, val);
    }

    /// Returns the number of instructions executed since reset.
    pub const fn retired(&self) -> u64 {
        self.retired
    }

    fn reset(&mut self) {
        self.pc = self.reset_vector;
        self.regs.clear();
        self.halted = false;
        self.out_of_reset = true;
        self.retired = 0;
    }

    /// Executes the latched instruction and updates the PC.
    fn execute(&mut self, mem: &mut dyn MemoryPort) {
        let d = decode(self.instr);
        if self.trace {
            trace!(pc = self.pc, "{}", disassemble(d.raw));
        }

        let next_pc = match self.exec_one(&d, mem) {
            Some(next) => next,
            None => {
                error!(
                    "illegal instruction {:#010x} at pc={:#010x}",
                    d.raw, self.pc
                );
                self.regs.write(self.result_reg, ILLEGAL_INSTRUCTION_RESULT);
                self.halted = true;
                return;
            }
        };
        self.retired += 1;
        if !self.halted {
            self.pc = next_pc;
        }
    }

    /// Returns the next PC, or `None` for an unimplemented encoding.
    fn exec_one(&mut self, d: &Decoded, mem: &mut dyn MemoryPort) -> Option<u32> {
        let pc = self.pc;
        let seq = pc.wrapping_add(4);
        let rs1 = self.regs.read(d.rs1);
        let rs2 = self.regs.read(d.rs2);
        let imm = d.imm as u32;

        match d.opcode {
            op::OP_LUI => self.regs.write(d.rd, imm),
            op::OP_AUIPC => self.regs.write(d.rd, pc.wrapping_add(imm)),
            op::OP_JAL => {
                self.regs.write(d.rd, seq);
                return Some(pc.wrapping_add(imm));
            }
            op::OP_JALR => {
                let target = rs1.wrapping_add(imm) & !1;
                self.regs.write(d.rd, seq);
                return Some(target);
            }
            op::OP_BRANCH => {
                let taken = match d.funct3 {
                    f3::BEQ => rs1 == rs2,
                    f3::BNE => rs1 != rs2,
                    f3::BLT => (rs1 as i32) < (rs2 as i32),
                    f3::BGE => (rs1 as i32) >= (rs2 as i32),
                    f3::BLTU => rs1 < rs2,
                    f3::BGEU => rs1 >= rs2,
                    _ => return None,
                };
                if taken {
                    return Some(pc.wrapping_add(imm));
                }
            }
            op::OP_LOAD => {
                let addr = rs1.wrapping_add(imm);
                let raw = mem.read32(addr).unwrap_or(0);
                let val = match d.funct3 {
                    f3::LB => raw as u8 as i8 as i32 as u32,
                    f3::LH => raw as u16 as i16 as i32 as u32,
                    f3::LW => raw,
                    f3::LBU => raw & 0xFF,
                    f3::LHU => raw & 0xFFFF,
                    _ => return None,
                };
                self.regs.write(d.rd, val);
            }
            op::OP_STORE => {
                let len = match d.funct3 {
                    f3::SB => 1,
                    f3::SH => 2,
                    f3::SW => 4,
                    _ => return None,
                };
                let addr = rs1.wrapping_add(imm);
                if !mem.is_device(addr) {
                    let _ = mem.read32(addr);
                }
                mem.write(addr, rs2, len);
            }
            op::OP_IMM => {
                let shamt = d.rs2 as u32;
                let val = match (d.funct3, d.funct7) {
                    (f3::ADD_SUB, _) => rs1.wrapping_add(imm),
                    (f3::SLT, _) => u32::from((rs1 as i32) < d.imm),
                    (f3::SLTU, _) => u32::from(rs1 < imm),
                    (f3::XOR, _) => rs1 ^ imm,
                    (f3::OR, _) => rs1 | imm,
                    (f3::AND, _) => rs1 & imm,
                    (f3::SLL, f7::DEFAULT) => rs1 << shamt,
                    (f3::SRL_SRA, f7::DEFAULT) => rs1 >> shamt,
                    (f3::SRL_SRA, f7::SUB_SRA) => ((rs1 as i32) >> shamt) as u32,
                    _ => return None,
                };
                self.regs.write(d.rd, val);
            }
            op::OP_REG => {
                let shamt = rs2 & 0x1F;
                let val = match (d.funct3, d.funct7) {
                    (f3::ADD_SUB, f7::DEFAULT) => rs1.wrapping_add(rs2),
                    (f3::ADD_SUB, f7::SUB_SRA) => rs1.wrapping_sub(rs2),
                    (f3::SLL, f7::DEFAULT) => rs1 << shamt,
                    (f3::SLT, f7::DEFAULT) => u32::from((rs1 as i32) < (rs2 as i32)),
                    (f3::SLTU, f7::DEFAULT) => u32::from(rs1 < rs2),
                    (f3::XOR, f7::DEFAULT) => rs1 ^ rs2,
                    (f3::SRL_SRA, f7::DEFAULT) => rs1 >> shamt,
                    (f3::SRL_SRA, f7::SUB_SRA) => ((rs1 as i32) >> shamt) as u32,
                    (f3::OR, f7::DEFAULT) => rs1 | rs2,
                    (f3::AND, f7::DEFAULT) => rs1 & rs2,
                    _ => return None,
                };
                self.regs.write(d.rd, val);
            }
            op::OP_MISC_MEM => {}
            OP_SYSTEM => match d.raw {
                EBREAK => self.halted = true,
                ECALL => {}
                _ => return None,
            },
            _ => return None,
        }
        Some(seq)
    }
}

impl Dut for RefCore {
    fn set_clk(&mut self, level: bool) {
        self.clk = level;
    }

    fn set_rst(&mut self, level: bool) {
        self.rst = level;
    }

    fn eval(&mut self, mem: &mut dyn MemoryPort) {
        let posedge = self.clk && !self.prev_clk;
        self.prev_clk = self.clk;

        if posedge {
            if self.rst {
                self.reset();
            } else if self.out_of_reset && !self.halted {
                self.execute(mem);
            }
        }

        if !self.halted {
            self.instr = mem.read32(self.pc).unwrap_or(0);
        }
    }

    fn pc(&self) -> u32 {
        self.pc
    }

    fn instr(&self) -> u32 {
        self.instr
    }

    fn halted(&self) -> bool {
        self.halted
    }

    fn read_reg(&self, index: usize) -> u32 {
        self.regs.read(index)
    }
}
