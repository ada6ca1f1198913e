// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::cpu::alu::{add_with_carry, shift_with_carry, sub_with_carry};
use crate::cpu::{Apsr, Reg, Registers};
use crate::decoder::arm::{Instruction, Operand, Operation};
use thumbcore_config::PcReadConvention;

/// Per-call execution context supplied by the owning fetch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecContext {
    pub in_it_block: bool,
    pub pc_read: PcReadConvention,
}

impl ExecContext {
    pub fn new(pc_read: PcReadConvention) -> Self {
        Self {
            in_it_block: false,
            pc_read,
        }
    }

    pub fn in_it_block(self, in_it_block: bool) -> Self {
        Self {
            in_it_block,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Fall through; the fetch loop advances PC.
    Continue,
    /// PC was written. The fetch loop must not advance it.
    Branch { target: u32 },
}

fn read_operand(regs: &Registers, reg: Reg, ctx: ExecContext) -> u32 {
    match reg {
        Reg::Pc => regs.pc.wrapping_add(ctx.pc_read.read_offset()),
        r => regs.read(r),
    }
}

/// Applies one decoded instruction to `regs`.
///
/// Only the destination (or the selected SP bank) and, when the encoding's policy
/// allows it, the APSR are modified.
pub fn execute(instr: &Instruction, regs: &mut Registers, ctx: ExecContext) -> ExecOutcome {
    let ops = instr.operands();
    let op1 = read_operand(regs, ops.rn, ctx);
    let op2 = match ops.operand {
        Operand::Reg(r) => read_operand(regs, r, ctx),
        Operand::Imm(imm) => imm,
    };

    let (result, carry, overflow) = match instr.operation() {
        Operation::Add => {
            let (res, c, v) = add_with_carry(op1, op2, false);
            (res, c, Some(v))
        }
        Operation::Sub => {
            let (res, c, v) = sub_with_carry(op1, op2);
            (res, c, Some(v))
        }
        Operation::Shift(kind) => {
            // Register amounts use the bottom byte of Rm
            let (res, c) = shift_with_carry(op1, kind, op2 & 0xFF, regs.apsr.c());
            (res, c, None)
        }
    };

    let outcome = match ops.rd {
        Some(Reg::Pc) => {
            let target = regs.branch_write_pc(result);
            tracing::debug!("{} -> branch to {:#x}", instr, target);
            ExecOutcome::Branch { target }
        }
        Some(rd) => {
            regs.write(rd, result);
            ExecOutcome::Continue
        }
        None => ExecOutcome::Continue,
    };

    if ops.setflags.resolve(ctx.in_it_block) {
        regs.apsr.set_nz(result);
        regs.apsr.set(Apsr::C, carry);
        if let Some(v) = overflow {
            regs.apsr.set(Apsr::V, v);
        }
    }

    tracing::trace!("{} = {:#010x} flags={:?}", instr, result, regs.apsr);
    outcome
}
