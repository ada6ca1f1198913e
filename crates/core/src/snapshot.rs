// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::cpu::StackSelect;
use serde::{Deserialize, Serialize};

/// Serializable copy of a register file. Flags are packed at their xPSR positions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterSnapshot {
    pub general: [u32; 13],
    #[serde(default)]
    pub pc: u32,
    #[serde(default)]
    pub lr: u32,
    #[serde(default)]
    pub msp: u32,
    #[serde(default)]
    pub psp: u32,
    #[serde(default)]
    pub sp_select: StackSelect,
    #[serde(default)]
    pub xpsr: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::{Apsr, Registers};

    #[test]
    fn test_snapshot_packs_flags() {
        let mut regs = Registers::with_general([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13]);
        regs.apsr = Apsr::Z | Apsr::C;
        regs.sp_process = 0x40;
        regs.sp_select = StackSelect::Process;

        let snap = regs.snapshot();
        assert_eq!(snap.xpsr, 0x6000_0000);
        assert_eq!(snap.psp, 0x40);

        let mut restored = Registers::new();
        restored.apply_snapshot(&snap);
        assert_eq!(restored, regs);
    }

    #[test]
    fn test_snapshot_drops_non_flag_bits() {
        let snap = RegisterSnapshot {
            xpsr: 0x0100_0000 | Apsr::N.bits(),
            ..RegisterSnapshot::default()
        };
        let mut regs = Registers::new();
        regs.apply_snapshot(&snap);
        assert_eq!(regs.apsr, Apsr::N);
    }
}
