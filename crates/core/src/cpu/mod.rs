// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod alu;
pub mod executor;
pub mod registers;

pub use executor::{execute, ExecContext, ExecOutcome};
pub use registers::{Apsr, Reg, Registers, StackSelect};
