// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::Context;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::path::PathBuf;
use thumbcore_core::snapshot::RegisterSnapshot;
use thumbcore_core::{CoreConfig, FetchedInstr, Pipeline, Registers};

#[derive(Debug, Deserialize)]
struct GoldenCase {
    asm: String,
    word: String,
    #[serde(default)]
    in_it_block: bool,
    before: RegisterSnapshot,
    after: RegisterSnapshot,
}

fn load_cases() -> anyhow::Result<Vec<GoldenCase>> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/thumb16_vectors.json");
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read golden vectors at {:?}", path))?;
    serde_json::from_str(&contents).context("Failed to parse golden vectors")
}

fn parse_word(text: &str) -> anyhow::Result<u16> {
    let hex = text.trim_start_matches("0x");
    u16::from_str_radix(hex, 16).with_context(|| format!("Bad instruction word '{}'", text))
}

#[test]
fn test_golden_vectors() -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(&CoreConfig::default());
    let cases = load_cases()?;
    assert!(!cases.is_empty());

    for case in cases {
        let word = parse_word(&case.word)?;
        let instr = FetchedInstr(word)
            .decode()
            .with_context(|| format!("{} ({})", case.asm, case.word))?;
        assert_eq!(instr.to_string(), case.asm);

        let mut regs = Registers::new();
        regs.apply_snapshot(&case.before);
        pipeline.execute(&instr, &mut regs, case.in_it_block);

        assert_eq!(regs.snapshot(), case.after, "{}", case.asm);
    }

    Ok(())
}

#[test]
fn test_snapshot_json_shape() -> anyhow::Result<()> {
    let mut regs = Registers::with_general([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13]);
    regs.sp_process = 0x100;
    regs.sp_select = thumbcore_core::StackSelect::Process;

    let value = serde_json::to_value(regs.snapshot())?;
    assert_eq!(value["sp_select"], "process");
    assert_eq!(value["psp"], 0x100);
    assert_eq!(value["general"][12], 13);
    Ok(())
}
