// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::cpu::{execute, ExecContext, ExecOutcome, Registers};
use crate::decoder::arm::{FetchedInstr, Instruction};
use crate::DecodeResult;
use thumbcore_config::{CoreConfig, PcReadConvention};

/// Identify -> Decode -> Execute for one core.
///
/// Holds no machine state; the register file is owned by the caller and passed in
/// on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pipeline {
    pc_read: PcReadConvention,
}

impl Pipeline {
    pub fn new(pc_read: PcReadConvention) -> Self {
        Self { pc_read }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.pc_read)
    }

    pub fn pc_read(&self) -> PcReadConvention {
        self.pc_read
    }

    pub fn context(&self, in_it_block: bool) -> ExecContext {
        ExecContext::new(self.pc_read).in_it_block(in_it_block)
    }

    pub fn decode(&self, fetched: FetchedInstr) -> DecodeResult<Instruction> {
        fetched.decode()
    }

    pub fn execute(
        &self,
        instr: &Instruction,
        regs: &mut Registers,
        in_it_block: bool,
    ) -> ExecOutcome {
        execute(instr, regs, self.context(in_it_block))
    }

    /// Decode then execute. A word that fails to decode leaves `regs` untouched.
    pub fn step(
        &self,
        fetched: FetchedInstr,
        regs: &mut Registers,
        in_it_block: bool,
    ) -> DecodeResult<ExecOutcome> {
        let instr = self.decode(fetched)?;
        Ok(self.execute(&instr, regs, in_it_block))
    }
}
