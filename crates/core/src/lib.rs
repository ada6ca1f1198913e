// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod cpu;
pub mod decoder;
pub mod pipeline;
pub mod snapshot;

mod tests;

pub use cpu::{execute, Apsr, ExecContext, ExecOutcome, Reg, Registers, StackSelect};
pub use decoder::arm::{decode_thumb_16, FetchedInstr, Instruction};
pub use pipeline::Pipeline;
pub use thumbcore_config::{CoreConfig, PcReadConvention};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Unrecognized instruction {0:#06x}")]
    UnrecognizedInstruction(u16),
}

pub type DecodeResult<T> = Result<T, DecodeError>;
