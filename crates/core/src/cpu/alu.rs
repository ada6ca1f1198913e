// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Condition-flag arithmetic shared by every data-processing instruction.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftKind {
    Lsl,
    Lsr,
    Asr,
}

/// `AddWithCarry(x, y, carry_in)` returning `(result, carry_out, overflow)`.
///
/// Subtraction is `add_with_carry(x, !y, true)`.
pub fn add_with_carry(x: u32, y: u32, carry_in: bool) -> (u32, bool, bool) {
    let unsigned_sum = x as u64 + y as u64 + carry_in as u64;
    let signed_sum = x as i32 as i64 + y as i32 as i64 + carry_in as i64;
    let result = unsigned_sum as u32;
    let carry = result as u64 != unsigned_sum;
    let overflow = result as i32 as i64 != signed_sum;
    (result, carry, overflow)
}

/// `x - y` with ARM borrow semantics (carry set means no borrow).
#[inline]
pub fn sub_with_carry(x: u32, y: u32) -> (u32, bool, bool) {
    add_with_carry(x, !y, true)
}

/// `Shift_C(value, kind, amount, carry_in)` returning `(result, carry_out)`.
///
/// A zero amount passes `carry_in` through untouched.
pub fn shift_with_carry(value: u32, kind: ShiftKind, amount: u32, carry_in: bool) -> (u32, bool) {
    if amount == 0 {
        return (value, carry_in);
    }

    match kind {
        ShiftKind::Lsl => match amount {
            1..=31 => (value << amount, (value >> (32 - amount)) & 1 == 1),
            32 => (0, value & 1 == 1),
            _ => (0, false),
        },
        ShiftKind::Lsr => match amount {
            1..=31 => (value >> amount, (value >> (amount - 1)) & 1 == 1),
            32 => (0, value >> 31 == 1),
            _ => (0, false),
        },
        ShiftKind::Asr => {
            let signed = value as i32;
            if amount >= 32 {
                ((signed >> 31) as u32, signed < 0)
            } else {
                ((signed >> amount) as u32, (value >> (amount - 1)) & 1 == 1)
            }
        }
    }
}
