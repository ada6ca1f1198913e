// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Thumb16 arithmetic and shift catalog.
//!
//! Every supported encoding is one row of [`CATALOG`]: a mask/pattern pair and the
//! field extractor for that form. Rows are tried top to bottom and the first hit wins,
//! so the row order *is* the priority. Forms naming SP in a fixed field sit above the
//! generic high-register ADD whose pattern also covers them.

use crate::cpu::alu::ShiftKind;
use crate::cpu::Reg;
use crate::{DecodeError, DecodeResult};
use std::fmt;

/// One raw 16-bit instruction word as fetched from memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchedInstr(pub u16);

impl FetchedInstr {
    pub fn decode(self) -> DecodeResult<Instruction> {
        decode_thumb_16(self.0)
    }
}

impl From<u16> for FetchedInstr {
    fn from(word: u16) -> Self {
        Self(word)
    }
}

/// When an encoding updates the APSR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetFlags {
    Always,
    Never,
    /// Narrow encodings: flags are set only outside an IT block.
    NotInItBlock,
}

impl SetFlags {
    pub const fn resolve(self, in_it_block: bool) -> bool {
        match self {
            SetFlags::Always => true,
            SetFlags::Never => false,
            SetFlags::NotInItBlock => !in_it_block,
        }
    }
}

/// Identity of a catalog row, independent of the operand values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    AddReg,
    AddRegHigh,
    AddSpReg,
    AddSpRegToSp,
    AddImm3,
    AddImm8,
    AddSpImm,
    AddSp,
    SubReg,
    SubImm3,
    SubImm8,
    SubSp,
    CmpReg,
    CmpRegHigh,
    CmpImm,
    Lsl,
    Lsr,
    Asr,
    LslReg,
    LsrReg,
    AsrReg,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Instruction {
    AddReg {
        rd: Reg,
        rn: Reg,
        rm: Reg,
    }, // ADDS Rd, Rn, Rm
    AddRegHigh {
        rdn: Reg,
        rm: Reg,
    }, // ADD Rdn, Rm
    AddSpReg {
        rdm: Reg,
    }, // ADD Rdm, SP, Rdm
    AddSpRegToSp {
        rm: Reg,
    }, // ADD SP, Rm
    AddImm3 {
        rd: Reg,
        rn: Reg,
        imm: u32,
    }, // ADDS Rd, Rn, #imm3
    AddImm8 {
        rdn: Reg,
        imm: u32,
    }, // ADDS Rdn, #imm8
    AddSpImm {
        rd: Reg,
        imm: u32,
    }, // ADD Rd, SP, #imm (imm8 * 4)
    AddSp {
        imm: u32,
    }, // ADD SP, SP, #imm (imm7 * 4)

    SubReg {
        rd: Reg,
        rn: Reg,
        rm: Reg,
    }, // SUBS Rd, Rn, Rm
    SubImm3 {
        rd: Reg,
        rn: Reg,
        imm: u32,
    }, // SUBS Rd, Rn, #imm3
    SubImm8 {
        rdn: Reg,
        imm: u32,
    }, // SUBS Rdn, #imm8
    SubSp {
        imm: u32,
    }, // SUB SP, SP, #imm (imm7 * 4)

    CmpReg {
        rn: Reg,
        rm: Reg,
    }, // CMP Rn, Rm (low registers)
    CmpRegHigh {
        rn: Reg,
        rm: Reg,
    }, // CMP Rn, Rm (any registers)
    CmpImm {
        rn: Reg,
        imm: u32,
    }, // CMP Rn, #imm8

    // Shifts. Immediate amounts are already decoded (LSR/ASR #0 field means 32).
    Lsl {
        rd: Reg,
        rm: Reg,
        imm: u8,
    }, // LSLS Rd, Rm, #imm5
    Lsr {
        rd: Reg,
        rm: Reg,
        imm: u8,
    }, // LSRS Rd, Rm, #imm5
    Asr {
        rd: Reg,
        rm: Reg,
        imm: u8,
    }, // ASRS Rd, Rm, #imm5
    LslReg {
        rdn: Reg,
        rm: Reg,
    }, // LSLS Rdn, Rm
    LsrReg {
        rdn: Reg,
        rm: Reg,
    }, // LSRS Rdn, Rm
    AsrReg {
        rdn: Reg,
        rm: Reg,
    }, // ASRS Rdn, Rm
}

/// What the executor computes from the operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Shift(ShiftKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Imm(u32),
}

/// Normalized operand view: `rd <- rn <op> operand`.
///
/// `rd` is `None` for compares. For shifts `rn` is the value being shifted and
/// `operand` the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operands {
    pub rd: Option<Reg>,
    pub rn: Reg,
    pub operand: Operand,
    pub setflags: SetFlags,
}

impl Instruction {
    pub fn form(&self) -> Form {
        match self {
            Instruction::AddReg { .. } => Form::AddReg,
            Instruction::AddRegHigh { .. } => Form::AddRegHigh,
            Instruction::AddSpReg { .. } => Form::AddSpReg,
            Instruction::AddSpRegToSp { .. } => Form::AddSpRegToSp,
            Instruction::AddImm3 { .. } => Form::AddImm3,
            Instruction::AddImm8 { .. } => Form::AddImm8,
            Instruction::AddSpImm { .. } => Form::AddSpImm,
            Instruction::AddSp { .. } => Form::AddSp,
            Instruction::SubReg { .. } => Form::SubReg,
            Instruction::SubImm3 { .. } => Form::SubImm3,
            Instruction::SubImm8 { .. } => Form::SubImm8,
            Instruction::SubSp { .. } => Form::SubSp,
            Instruction::CmpReg { .. } => Form::CmpReg,
            Instruction::CmpRegHigh { .. } => Form::CmpRegHigh,
            Instruction::CmpImm { .. } => Form::CmpImm,
            Instruction::Lsl { .. } => Form::Lsl,
            Instruction::Lsr { .. } => Form::Lsr,
            Instruction::Asr { .. } => Form::Asr,
            Instruction::LslReg { .. } => Form::LslReg,
            Instruction::LsrReg { .. } => Form::LsrReg,
            Instruction::AsrReg { .. } => Form::AsrReg,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Instruction::AddReg { .. }
            | Instruction::AddRegHigh { .. }
            | Instruction::AddSpReg { .. }
            | Instruction::AddSpRegToSp { .. }
            | Instruction::AddImm3 { .. }
            | Instruction::AddImm8 { .. }
            | Instruction::AddSpImm { .. }
            | Instruction::AddSp { .. } => Operation::Add,
            Instruction::SubReg { .. }
            | Instruction::SubImm3 { .. }
            | Instruction::SubImm8 { .. }
            | Instruction::SubSp { .. }
            | Instruction::CmpReg { .. }
            | Instruction::CmpRegHigh { .. }
            | Instruction::CmpImm { .. } => Operation::Sub,
            Instruction::Lsl { .. } | Instruction::LslReg { .. } => {
                Operation::Shift(ShiftKind::Lsl)
            }
            Instruction::Lsr { .. } | Instruction::LsrReg { .. } => {
                Operation::Shift(ShiftKind::Lsr)
            }
            Instruction::Asr { .. } | Instruction::AsrReg { .. } => {
                Operation::Shift(ShiftKind::Asr)
            }
        }
    }

    /// Flag policy fixed by the encoding.
    pub fn setflags(&self) -> SetFlags {
        match self {
            Instruction::AddRegHigh { .. }
            | Instruction::AddSpReg { .. }
            | Instruction::AddSpRegToSp { .. }
            | Instruction::AddSpImm { .. }
            | Instruction::AddSp { .. }
            | Instruction::SubSp { .. } => SetFlags::Never,
            Instruction::CmpReg { .. }
            | Instruction::CmpRegHigh { .. }
            | Instruction::CmpImm { .. } => SetFlags::Always,
            _ => SetFlags::NotInItBlock,
        }
    }

    pub fn operands(&self) -> Operands {
        let (rd, rn, operand) = match *self {
            Instruction::AddReg { rd, rn, rm } | Instruction::SubReg { rd, rn, rm } => {
                (Some(rd), rn, Operand::Reg(rm))
            }
            Instruction::AddRegHigh { rdn, rm } => (Some(rdn), rdn, Operand::Reg(rm)),
            Instruction::AddSpReg { rdm } => (Some(rdm), Reg::Sp, Operand::Reg(rdm)),
            Instruction::AddSpRegToSp { rm } => (Some(Reg::Sp), Reg::Sp, Operand::Reg(rm)),
            Instruction::AddImm3 { rd, rn, imm } | Instruction::SubImm3 { rd, rn, imm } => {
                (Some(rd), rn, Operand::Imm(imm))
            }
            Instruction::AddImm8 { rdn, imm } | Instruction::SubImm8 { rdn, imm } => {
                (Some(rdn), rdn, Operand::Imm(imm))
            }
            Instruction::AddSpImm { rd, imm } => (Some(rd), Reg::Sp, Operand::Imm(imm)),
            Instruction::AddSp { imm } | Instruction::SubSp { imm } => {
                (Some(Reg::Sp), Reg::Sp, Operand::Imm(imm))
            }
            Instruction::CmpReg { rn, rm } | Instruction::CmpRegHigh { rn, rm } => {
                (None, rn, Operand::Reg(rm))
            }
            Instruction::CmpImm { rn, imm } => (None, rn, Operand::Imm(imm)),
            Instruction::Lsl { rd, rm, imm }
            | Instruction::Lsr { rd, rm, imm }
            | Instruction::Asr { rd, rm, imm } => (Some(rd), rm, Operand::Imm(imm as u32)),
            Instruction::LslReg { rdn, rm }
            | Instruction::LsrReg { rdn, rm }
            | Instruction::AsrReg { rdn, rm } => (Some(rdn), rdn, Operand::Reg(rm)),
        };

        Operands {
            rd,
            rn,
            operand,
            setflags: self.setflags(),
        }
    }

    fn mnemonic(&self) -> &'static str {
        match self.operation() {
            Operation::Add => "add",
            Operation::Sub if self.operands().rd.is_none() => "cmp",
            Operation::Sub => "sub",
            Operation::Shift(ShiftKind::Lsl) => "lsl",
            Operation::Shift(ShiftKind::Lsr) => "lsr",
            Operation::Shift(ShiftKind::Asr) => "asr",
        }
    }
}

/// Lower-case UAL, as written outside an IT block.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.setflags() {
            SetFlags::NotInItBlock => "s",
            SetFlags::Always | SetFlags::Never => "",
        };
        write!(f, "{}{} ", self.mnemonic(), suffix)?;

        match *self {
            Instruction::AddReg { rd, rn, rm } | Instruction::SubReg { rd, rn, rm } => {
                write!(f, "{}, {}, {}", rd, rn, rm)
            }
            Instruction::AddRegHigh { rdn: a, rm: b }
            | Instruction::CmpReg { rn: a, rm: b }
            | Instruction::CmpRegHigh { rn: a, rm: b }
            | Instruction::LslReg { rdn: a, rm: b }
            | Instruction::LsrReg { rdn: a, rm: b }
            | Instruction::AsrReg { rdn: a, rm: b } => write!(f, "{}, {}", a, b),
            Instruction::AddSpReg { rdm } => write!(f, "{}, sp, {}", rdm, rdm),
            Instruction::AddSpRegToSp { rm } => write!(f, "sp, {}", rm),
            Instruction::AddImm3 { rd, rn, imm } | Instruction::SubImm3 { rd, rn, imm } => {
                write!(f, "{}, {}, #{}", rd, rn, imm)
            }
            Instruction::AddImm8 { rdn: r, imm }
            | Instruction::SubImm8 { rdn: r, imm }
            | Instruction::CmpImm { rn: r, imm } => write!(f, "{}, #{}", r, imm),
            Instruction::AddSpImm { rd, imm } => write!(f, "{}, sp, #{}", rd, imm),
            Instruction::AddSp { imm } | Instruction::SubSp { imm } => {
                write!(f, "sp, sp, #{}", imm)
            }
            Instruction::Lsl { rd, rm, imm }
            | Instruction::Lsr { rd, rm, imm }
            | Instruction::Asr { rd, rm, imm } => write!(f, "{}, {}, #{}", rd, rm, imm),
        }
    }
}

/// One catalog row: `(word & mask) == pattern` selects `decode`.
#[derive(Clone, Copy)]
pub struct Encoding {
    pub form: Form,
    pub mask: u16,
    pub pattern: u16,
    pub decode: fn(u16) -> Instruction,
}

impl Encoding {
    /// Raw bit-pattern match, ignoring priority.
    #[inline(always)]
    pub fn matches(&self, word: u16) -> bool {
        (word & self.mask) == self.pattern
    }

    /// True if some word satisfies both rows' patterns.
    pub fn overlaps(&self, other: &Encoding) -> bool {
        (self.pattern ^ other.pattern) & self.mask & other.mask == 0
    }
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoding")
            .field("form", &self.form)
            .field("mask", &format_args!("{:#06x}", self.mask))
            .field("pattern", &format_args!("{:#06x}", self.pattern))
            .finish()
    }
}

#[inline(always)]
fn low_reg(word: u16, lsb: u32) -> Reg {
    Reg::low((word >> lsb) as u8)
}

#[inline(always)]
fn field(word: u16, lsb: u32, width: u32) -> u32 {
    ((word >> lsb) as u32) & ((1 << width) - 1)
}

/// Immediate shift amount: a zero field means 32 for LSR/ASR.
#[inline(always)]
fn shift_imm5(word: u16, zero_is_32: bool) -> u8 {
    match field(word, 6, 5) {
        0 if zero_is_32 => 32,
        n => n as u8,
    }
}

// 0001 100 mmm nnn ddd
fn add_reg(w: u16) -> Instruction {
    Instruction::AddReg {
        rd: low_reg(w, 0),
        rn: low_reg(w, 3),
        rm: low_reg(w, 6),
    }
}

// 0100 0100 D mmmm ddd
fn add_reg_high(w: u16) -> Instruction {
    Instruction::AddRegHigh {
        rdn: Reg::from_index(((w >> 4) & 0x8 | (w & 0x7)) as u8),
        rm: Reg::from_index(field(w, 3, 4) as u8),
    }
}

// 0100 0100 D 1101 ddd
fn add_sp_reg(w: u16) -> Instruction {
    Instruction::AddSpReg {
        rdm: Reg::from_index(((w >> 4) & 0x8 | (w & 0x7)) as u8),
    }
}

// 0100 0100 1 mmmm 101
fn add_sp_reg_to_sp(w: u16) -> Instruction {
    Instruction::AddSpRegToSp {
        rm: Reg::from_index(field(w, 3, 4) as u8),
    }
}

// 0001 110 iii nnn ddd
fn add_imm3(w: u16) -> Instruction {
    Instruction::AddImm3 {
        rd: low_reg(w, 0),
        rn: low_reg(w, 3),
        imm: field(w, 6, 3),
    }
}

// 0011 0ddd iiii iiii
fn add_imm8(w: u16) -> Instruction {
    Instruction::AddImm8 {
        rdn: low_reg(w, 8),
        imm: field(w, 0, 8),
    }
}

// 1010 1ddd iiii iiii
fn add_sp_imm(w: u16) -> Instruction {
    Instruction::AddSpImm {
        rd: low_reg(w, 8),
        imm: field(w, 0, 8) << 2,
    }
}

// 1011 0000 0iii iiii
fn add_sp(w: u16) -> Instruction {
    Instruction::AddSp {
        imm: field(w, 0, 7) << 2,
    }
}

// 0001 101 mmm nnn ddd
fn sub_reg(w: u16) -> Instruction {
    Instruction::SubReg {
        rd: low_reg(w, 0),
        rn: low_reg(w, 3),
        rm: low_reg(w, 6),
    }
}

// 0001 111 iii nnn ddd
fn sub_imm3(w: u16) -> Instruction {
    Instruction::SubImm3 {
        rd: low_reg(w, 0),
        rn: low_reg(w, 3),
        imm: field(w, 6, 3),
    }
}

// 0011 1ddd iiii iiii
fn sub_imm8(w: u16) -> Instruction {
    Instruction::SubImm8 {
        rdn: low_reg(w, 8),
        imm: field(w, 0, 8),
    }
}

// 1011 0000 1iii iiii
fn sub_sp(w: u16) -> Instruction {
    Instruction::SubSp {
        imm: field(w, 0, 7) << 2,
    }
}

// 0100 0010 10 mmm nnn
fn cmp_reg(w: u16) -> Instruction {
    Instruction::CmpReg {
        rn: low_reg(w, 0),
        rm: low_reg(w, 3),
    }
}

// 0100 0101 N mmmm nnn
fn cmp_reg_high(w: u16) -> Instruction {
    Instruction::CmpRegHigh {
        rn: Reg::from_index(((w >> 4) & 0x8 | (w & 0x7)) as u8),
        rm: Reg::from_index(field(w, 3, 4) as u8),
    }
}

// 0010 1nnn iiii iiii
fn cmp_imm(w: u16) -> Instruction {
    Instruction::CmpImm {
        rn: low_reg(w, 8),
        imm: field(w, 0, 8),
    }
}

// 000 oo iiiii mmm ddd
fn lsl_imm(w: u16) -> Instruction {
    Instruction::Lsl {
        rd: low_reg(w, 0),
        rm: low_reg(w, 3),
        imm: shift_imm5(w, false),
    }
}

fn lsr_imm(w: u16) -> Instruction {
    Instruction::Lsr {
        rd: low_reg(w, 0),
        rm: low_reg(w, 3),
        imm: shift_imm5(w, true),
    }
}

fn asr_imm(w: u16) -> Instruction {
    Instruction::Asr {
        rd: low_reg(w, 0),
        rm: low_reg(w, 3),
        imm: shift_imm5(w, true),
    }
}

// 0100 00oo oo mmm ddd
fn lsl_reg(w: u16) -> Instruction {
    Instruction::LslReg {
        rdn: low_reg(w, 0),
        rm: low_reg(w, 3),
    }
}

fn lsr_reg(w: u16) -> Instruction {
    Instruction::LsrReg {
        rdn: low_reg(w, 0),
        rm: low_reg(w, 3),
    }
}

fn asr_reg(w: u16) -> Instruction {
    Instruction::AsrReg {
        rdn: low_reg(w, 0),
        rm: low_reg(w, 3),
    }
}

const fn row(form: Form, mask: u16, pattern: u16, decode: fn(u16) -> Instruction) -> Encoding {
    Encoding {
        form,
        mask,
        pattern,
        decode,
    }
}

/// Decode table in priority order.
pub static CATALOG: [Encoding; 21] = [
    // SP forms first: both are special cases of the ADD (register) T2 layout, and
    // `add sp, sp, sp` (0x44ED) matches both of them, resolving to ADD Rdm, SP, Rdm.
    row(Form::AddSpReg, 0xFF78, 0x4468, add_sp_reg),
    row(Form::AddSpRegToSp, 0xFF87, 0x4485, add_sp_reg_to_sp),
    row(Form::AddRegHigh, 0xFF00, 0x4400, add_reg_high),
    row(Form::CmpRegHigh, 0xFF00, 0x4500, cmp_reg_high),
    // Shift (immediate), add, subtract
    row(Form::Lsl, 0xF800, 0x0000, lsl_imm),
    row(Form::Lsr, 0xF800, 0x0800, lsr_imm),
    row(Form::Asr, 0xF800, 0x1000, asr_imm),
    row(Form::AddReg, 0xFE00, 0x1800, add_reg),
    row(Form::SubReg, 0xFE00, 0x1A00, sub_reg),
    row(Form::AddImm3, 0xFE00, 0x1C00, add_imm3),
    row(Form::SubImm3, 0xFE00, 0x1E00, sub_imm3),
    // Compare / add / subtract (imm8)
    row(Form::CmpImm, 0xF800, 0x2800, cmp_imm),
    row(Form::AddImm8, 0xF800, 0x3000, add_imm8),
    row(Form::SubImm8, 0xF800, 0x3800, sub_imm8),
    // Data processing (register)
    row(Form::LslReg, 0xFFC0, 0x4080, lsl_reg),
    row(Form::LsrReg, 0xFFC0, 0x40C0, lsr_reg),
    row(Form::AsrReg, 0xFFC0, 0x4100, asr_reg),
    row(Form::CmpReg, 0xFFC0, 0x4280, cmp_reg),
    // SP arithmetic
    row(Form::AddSpImm, 0xF800, 0xA800, add_sp_imm),
    row(Form::AddSp, 0xFF80, 0xB000, add_sp),
    row(Form::SubSp, 0xFF80, 0xB080, sub_sp),
];

/// First catalog row matching `word`.
pub fn lookup(word: u16) -> Option<&'static Encoding> {
    CATALOG.iter().find(|enc| enc.matches(word))
}

/// True iff `word` decodes to `form` once priority is applied.
pub fn identify(form: Form, word: u16) -> bool {
    lookup(word).is_some_and(|enc| enc.form == form)
}

/// Decodes a 16-bit Thumb instruction
pub fn decode_thumb_16(opcode: u16) -> DecodeResult<Instruction> {
    lookup(opcode)
        .map(|enc| (enc.decode)(opcode))
        .ok_or(DecodeError::UnrecognizedInstruction(opcode))
}
