// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

#[cfg(test)]
mod integration_tests {
    use crate::cpu::{Apsr, ExecOutcome, Reg, Registers, StackSelect};
    use crate::decoder::arm::{FetchedInstr, Instruction};
    use crate::{CoreConfig, DecodeError, PcReadConvention, Pipeline};
    use pretty_assertions::assert_eq;

    const GENERAL: [u32; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];

    fn create_pipeline() -> Pipeline {
        Pipeline::from_config(&CoreConfig::default())
    }

    #[test]
    fn test_step_adds_low_registers() {
        let pipeline = create_pipeline();
        let mut regs = Registers::with_general(GENERAL);

        // ADDS R1, R2, R3
        let fetched = FetchedInstr::from(0x18D1u16);
        let outcome = pipeline.step(fetched, &mut regs, false).unwrap();

        assert_eq!(outcome, ExecOutcome::Continue);
        assert_eq!(regs.general[1], 7);
        assert_eq!(regs.apsr, Apsr::empty());
    }

    #[test]
    fn test_step_add_pc_lr_branches() {
        let pipeline = create_pipeline();
        let mut regs = Registers::with_general(GENERAL);
        regs.pc = 1000;
        regs.lr = 2000;

        // ADD PC, LR
        let fetched = FetchedInstr(0x44F7);
        let outcome = pipeline.step(fetched, &mut regs, false).unwrap();

        assert_eq!(outcome, ExecOutcome::Branch { target: 3000 });
        assert_eq!(regs.pc, 3000);
        assert_eq!(regs.lr, 2000);
    }

    #[test]
    fn test_step_add_pc_lr_pipeline_ahead() {
        let mut config = CoreConfig::default();
        config.pc_read = PcReadConvention::PipelineAhead;
        let pipeline = Pipeline::from_config(&config);
        assert_eq!(pipeline.pc_read(), PcReadConvention::PipelineAhead);

        let mut regs = Registers::with_general(GENERAL);
        regs.pc = 1000;
        regs.lr = 2000;

        let fetched = FetchedInstr(0x44F7);
        let outcome = pipeline.step(fetched, &mut regs, false).unwrap();
        assert_eq!(outcome, ExecOutcome::Branch { target: 3004 });
    }

    #[test]
    fn test_decode_failure_leaves_registers_untouched() {
        let pipeline = create_pipeline();
        let mut regs = Registers::with_general(GENERAL);
        regs.apsr = Apsr::C;
        let before = regs;

        // MOVS R0, #0 is outside the catalog
        let fetched = FetchedInstr(0x2000);
        let err = pipeline.step(fetched, &mut regs, false).unwrap_err();

        assert_eq!(err, DecodeError::UnrecognizedInstruction(0x2000));
        assert_eq!(err.to_string(), "Unrecognized instruction 0x2000");
        assert_eq!(regs, before);
    }

    #[test]
    fn test_sp_bank_isolation() {
        let pipeline = create_pipeline();
        // ADD SP, R0 / ADD R1, SP, R1 / ADD SP, SP, #16 / SUB SP, SP, #8
        let words = [0x4485u16, 0x4469, 0xB004, 0xB082];

        for select in [StackSelect::Main, StackSelect::Process] {
            for &word in &words {
                let mut regs = Registers::with_general(GENERAL);
                regs.sp_main = 0x2000_1000;
                regs.sp_process = 0x2000_0800;
                regs.sp_select = select;
                let before = regs;

                let fetched = FetchedInstr(word);
                pipeline.step(fetched, &mut regs, false).unwrap();

                match select {
                    StackSelect::Main => assert_eq!(regs.sp_process, before.sp_process),
                    StackSelect::Process => assert_eq!(regs.sp_main, before.sp_main),
                }
                assert_eq!(regs.apsr, before.apsr, "{:#06x}", word);
            }
        }
    }

    #[test]
    fn test_only_destination_changes() {
        let pipeline = create_pipeline();
        let mut regs = Registers::with_general(GENERAL);
        regs.pc = 0x0800_0000;
        regs.lr = 0x0800_0101;
        regs.sp_main = 0x2000_1000;
        regs.sp_process = 0x2000_0800;
        let before = regs;

        // SUBS R5, R6, R7
        let fetched = FetchedInstr(0x1BF5);
        pipeline.step(fetched, &mut regs, false).unwrap();

        let mut expected = before;
        expected.general[5] = 0xFFFF_FFFF;
        expected.apsr = Apsr::N;
        assert_eq!(regs, expected);
    }

    #[test]
    fn test_execution_is_deterministic() {
        let pipeline = create_pipeline();
        let words = [
            0x1800u16, 0x19FF, 0x1AD1, 0x4468, 0x44ED, 0x01E7, 0x0800, 0x40BC, 0x3280,
        ];

        for &word in &words {
            let mut first = Registers::with_general([
                0x7FFF_FFFF, 0x8000_0000, 3, 0xFFFF_FFFF, 5, 6, 7, 8, 9, 10, 11, 12, 13,
            ]);
            first.sp_main = 0x2000_0000;
            let mut second = first;

            let a = pipeline.step(FetchedInstr(word), &mut first, false);
            let b = pipeline.step(FetchedInstr(word), &mut second, false);
            assert_eq!(a, b);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_it_block_flag_is_per_call() {
        let pipeline = create_pipeline();
        let mut regs = Registers::with_general([0; 13]);

        // ADDS R0, R0, #0 inside an IT block: Z stays clear
        let fetched = FetchedInstr(0x1C00);
        pipeline.step(fetched, &mut regs, true).unwrap();
        assert_eq!(regs.apsr, Apsr::empty());

        // Same word outside the block sets Z
        pipeline.step(fetched, &mut regs, false).unwrap();
        assert_eq!(regs.apsr, Apsr::Z);
    }

    #[test]
    fn test_decode_then_execute_later() {
        let pipeline = create_pipeline();
        let instr = pipeline.decode(FetchedInstr(0x44ED)).unwrap();
        assert_eq!(instr, Instruction::AddSpReg { rdm: Reg::Sp });

        let mut regs = Registers::new();
        regs.sp_main = 4;
        pipeline.execute(&instr, &mut regs, false);
        pipeline.execute(&instr, &mut regs, false);
        assert_eq!(regs.sp_main, 16);
    }

    #[test]
    fn test_reset_state_from_config() {
        let yaml = r#"
reset:
  msp: 0x20001000
  psp: 0x20000800
  pc: 0x08000100
  stack: process
"#;
        let config = CoreConfig::from_yaml(yaml).unwrap();
        let mut regs = Registers::from_config(&config);
        let pipeline = Pipeline::from_config(&config);

        // ADD R0, SP, #4
        let fetched = FetchedInstr(0xA801);
        pipeline.step(fetched, &mut regs, false).unwrap();
        assert_eq!(regs.general[0], 0x2000_0804);
        assert_eq!(regs.pc, 0x0800_0100);
    }
}
