// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::snapshot::RegisterSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use thumbcore_config::CoreConfig;

pub use thumbcore_config::StackSelect;

/// Architectural register name as encoded in an instruction field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reg {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    Sp,
    Lr,
    Pc,
}

impl Reg {
    const ALL: [Reg; 16] = [
        Reg::R0,
        Reg::R1,
        Reg::R2,
        Reg::R3,
        Reg::R4,
        Reg::R5,
        Reg::R6,
        Reg::R7,
        Reg::R8,
        Reg::R9,
        Reg::R10,
        Reg::R11,
        Reg::R12,
        Reg::Sp,
        Reg::Lr,
        Reg::Pc,
    ];

    /// Register named by a 4-bit field. Bits above bit 3 are ignored.
    pub const fn from_index(n: u8) -> Self {
        Self::ALL[(n & 0xF) as usize]
    }

    /// Register named by a 3-bit field (r0-r7). Bits above bit 2 are ignored.
    pub const fn low(n: u8) -> Self {
        Self::ALL[(n & 0x7) as usize]
    }

    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reg::Sp => f.write_str("sp"),
            Reg::Lr => f.write_str("lr"),
            Reg::Pc => f.write_str("pc"),
            r => write!(f, "r{}", r.index()),
        }
    }
}

bitflags::bitflags! {
    /// APSR condition flags, held at their xPSR bit positions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Apsr: u32 {
        const N = 1 << 31;
        const Z = 1 << 30;
        const C = 1 << 29;
        const V = 1 << 28;
    }
}

impl Apsr {
    pub fn n(self) -> bool {
        self.contains(Apsr::N)
    }

    pub fn z(self) -> bool {
        self.contains(Apsr::Z)
    }

    pub fn c(self) -> bool {
        self.contains(Apsr::C)
    }

    pub fn v(self) -> bool {
        self.contains(Apsr::V)
    }

    /// N and Z from a result, leaving C and V alone.
    pub fn set_nz(&mut self, result: u32) {
        self.set(Apsr::N, result >> 31 == 1);
        self.set(Apsr::Z, result == 0);
    }
}

/// Register file of one Cortex-M core.
///
/// SP is not stored directly: `sp_select` picks `sp_main` or `sp_process` on
/// every access through [`Reg::Sp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub general: [u32; 13],
    pub pc: u32,
    pub lr: u32,
    pub sp_main: u32,
    pub sp_process: u32,
    pub sp_select: StackSelect,
    pub apsr: Apsr,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        let reset = &config.reset;
        Self {
            pc: reset.pc,
            lr: reset.lr,
            sp_main: reset.msp,
            sp_process: reset.psp,
            sp_select: reset.stack,
            ..Self::default()
        }
    }

    /// Fixture helper: a register file with the given r0-r12.
    pub fn with_general(general: [u32; 13]) -> Self {
        Self {
            general,
            ..Self::default()
        }
    }

    pub fn read(&self, reg: Reg) -> u32 {
        match reg {
            Reg::Sp => self.sp(),
            Reg::Lr => self.lr,
            Reg::Pc => self.pc,
            r => self.general[r.index() as usize],
        }
    }

    /// Raw write. PC writes are stored as given; see [`Registers::branch_write_pc`].
    pub fn write(&mut self, reg: Reg, val: u32) {
        match reg {
            Reg::Sp => self.set_sp(val),
            Reg::Lr => self.lr = val,
            Reg::Pc => self.pc = val,
            r => self.general[r.index() as usize] = val,
        }
    }

    pub fn sp(&self) -> u32 {
        match self.sp_select {
            StackSelect::Main => self.sp_main,
            StackSelect::Process => self.sp_process,
        }
    }

    pub fn set_sp(&mut self, val: u32) {
        match self.sp_select {
            StackSelect::Main => self.sp_main = val,
            StackSelect::Process => self.sp_process = val,
        }
    }

    /// `BranchWritePC`: bit 0 of the target is dropped. Returns the stored PC.
    pub fn branch_write_pc(&mut self, target: u32) -> u32 {
        self.pc = target & !1;
        self.pc
    }

    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            general: self.general,
            pc: self.pc,
            lr: self.lr,
            msp: self.sp_main,
            psp: self.sp_process,
            sp_select: self.sp_select,
            xpsr: self.apsr.bits(),
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: &RegisterSnapshot) {
        self.general = snapshot.general;
        self.pc = snapshot.pc;
        self.lr = snapshot.lr;
        self.sp_main = snapshot.msp;
        self.sp_process = snapshot.psp;
        self.sp_select = snapshot.sp_select;
        self.apsr = Apsr::from_bits_truncate(snapshot.xpsr);
    }
}
