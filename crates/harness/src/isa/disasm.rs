//! Instruction disassembler for RV32I.
//!
//! Turns a 32-bit encoding into a mnemonic string for instruction tracing.
//!
//! ```
//! use dutbench_core::isa::disasm::disassemble;
//! assert_eq!(disassemble(0x00A00513), "addi a0, zero, 10");
//! assert_eq!(disassemble(0x00100073), "ebreak");
//! ```

use crate::isa::abi::reg_name;
use crate::isa::decode::decode;
use crate::isa::privileged::{self as sys_op, OP_SYSTEM};
use crate::isa::rv32i::{funct3 as f3, funct7 as f7, opcodes as op};

/// Disassembles a 32-bit RV32I instruction.
///
/// Returns `"unknown"` for encodings the reference core does not implement.
pub fn disassemble(inst: u32) -> String {
    let d = decode(inst);
    let (rd, rs1, rs2) = (reg_name(d.rd), reg_name(d.rs1), reg_name(d.rs2));
    let imm = d.imm;

    match d.opcode {
        op::OP_LUI => format!("lui {rd}, {:#x}", (imm as u32) >> 12),
        op::OP_AUIPC => format!("auipc {rd}, {:#x}", (imm as u32) >> 12),
        op::OP_JAL => format!("jal {rd}, {imm}"),
        op::OP_JALR => format!("jalr {rd}, {imm}({rs1})"),
        op::OP_BRANCH => {
            let name = match d.funct3 {
                f3::BEQ => "beq",
                f3::BNE => "bne",
                f3::BLT => "blt",
                f3::BGE => "bge",
                f3::BLTU => "bltu",
                f3::BGEU => "bgeu",
                _ => return "unknown".into(),
            };
            format!("{name} {rs1}, {rs2}, {imm}")
        }
        op::OP_LOAD => {
            let name = match d.funct3 {
                f3::LB => "lb",
                f3::LH => "lh",
                f3::LW => "lw",
                f3::LBU => "lbu",
                f3::LHU => "lhu",
                _ => return "unknown".into(),
            };
            format!("{name} {rd}, {imm}({rs1})")
        }
        op::OP_STORE => {
            let name = match d.funct3 {
                f3::SB => "sb",
                f3::SH => "sh",
                f3::SW => "sw",
                _ => return "unknown".into(),
            };
            format!("{name} {rs2}, {imm}({rs1})")
        }
        op::OP_IMM => {
            let shamt = d.rs2;
            match d.funct3 {
                f3::ADD_SUB => format!("addi {rd}, {rs1}, {imm}"),
                f3::SLT => format!("slti {rd}, {rs1}, {imm}"),
                f3::SLTU => format!("sltiu {rd}, {rs1}, {imm}"),
                f3::XOR => format!("xori {rd}, {rs1}, {imm}"),
                f3::OR => format!("ori {rd}, {rs1}, {imm}"),
                f3::AND => format!("andi {rd}, {rs1}, {imm}"),
                f3::SLL => format!("slli {rd}, {rs1}, {shamt}"),
                f3::SRL_SRA if d.funct7 == f7::SUB_SRA => format!("srai {rd}, {rs1}, {shamt}"),
                f3::SRL_SRA => format!("srli {rd}, {rs1}, {shamt}"),
                _ => "unknown".into(),
            }
        }
        op::OP_REG => {
            let name = match (d.funct3, d.funct7) {
                (f3::ADD_SUB, f7::DEFAULT) => "add",
                (f3::ADD_SUB, f7::SUB_SRA) => "sub",
                (f3::SLL, f7::DEFAULT) => "sll",
                (f3::SLT, f7::DEFAULT) => "slt",
                (f3::SLTU, f7::DEFAULT) => "sltu",
                (f3::XOR, f7::DEFAULT) => "xor",
                (f3::SRL_SRA, f7::DEFAULT) => "srl",
                (f3::SRL_SRA, f7::SUB_SRA) => "sra",
                (f3::OR, f7::DEFAULT) => "or",
                (f3::AND, f7::DEFAULT) => "and",
                _ => return "unknown".into(),
            };
            format!("{name} {rd}, {rs1}, {rs2}")
        }
        op::OP_MISC_MEM => "fence".into(),
        OP_SYSTEM => match inst {
            sys_op::ECALL => "ecall".into(),
            sys_op::EBREAK => "ebreak".into(),
            _ => "unknown".into(),
        },
        _ => "unknown".into(),
    }
}
