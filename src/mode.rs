// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Parameter modes and mode-digit decoding

use std::fmt::{self, Display};

use crate::{CpuError, Memory, Registers};

/// Parameter mode for an Intcode instruction
///
/// Intcode instruction parameters each have a mode:  [positional], [immediate], or [relative].
///
/// When executing an intcode instruction, the instruction's parameters are interpreted in
/// accordance with their associated modes.
///
/// [positional]: ParameterMode::Positional
/// [immediate]: ParameterMode::Immediate
/// [relative]: ParameterMode::Relative
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum ParameterMode {
    /// Positional Mode
    ///
    /// A parameter in positional mode evaluates to the value at the address specified by the
    /// parameter.
    #[default]
    Positional = 0,
    /// Immediate Mode
    ///
    /// A parameter in immediate mode evaluates directly to the value specified. Instructions which
    /// write to memory may not use immediate mode for their destinations.
    #[doc(alias = "#")]
    Immediate = 1,
    /// Relative Mode
    ///
    /// A parameter in relative mode evaluates to the value at the address specified by the
    /// parameter, added to the [relative base](Registers::relative_base), which starts out as `0`
    /// but can be modified throughout the program's execution.
    #[doc(alias = "@")]
    Relative = 2,
}

impl Display for ParameterMode {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterMode::Positional => Ok(()),
            ParameterMode::Immediate => write!(fmt, "#"),
            ParameterMode::Relative => write!(fmt, "@"),
        }
    }
}

impl TryFrom<i64> for ParameterMode {
    type Error = CpuError;
    fn try_from(i: i64) -> Result<Self, Self::Error> {
        match i {
            0 => Ok(ParameterMode::Positional),
            1 => Ok(ParameterMode::Immediate),
            2 => Ok(ParameterMode::Relative),
            _ => Err(CpuError::UnknownMode(i)),
        }
    }
}

impl ParameterMode {
    /// Resolve a raw operand word into a value
    pub fn get(self, memory: &mut Memory, raw: i64, registers: &Registers) -> Result<i64, CpuError> {
        match self {
            ParameterMode::Positional => memory.read(raw),
            ParameterMode::Immediate => Ok(raw),
            ParameterMode::Relative => {
                let address = Self::relative(memory, raw, registers)?;
                memory.read(address)
            }
        }
    }

    /// Add the relative base to a raw operand, failing instead of overflowing
    fn relative(memory: &Memory, raw: i64, registers: &Registers) -> Result<i64, CpuError> {
        raw.checked_add(registers.relative_base).ok_or(if raw < 0 {
            CpuError::NegativeAddress(raw)
        } else {
            CpuError::MemoryLimit {
                address: raw,
                limit: memory.limit(),
            }
        })
    }

    /// The address a raw operand word refers to when written through.
    ///
    /// Fails with [`CpuError::IllegalWrite`] in immediate mode.
    pub fn target(self, memory: &Memory, raw: i64, registers: &Registers) -> Result<i64, CpuError> {
        match self {
            ParameterMode::Positional => Ok(raw),
            ParameterMode::Immediate => Err(CpuError::IllegalWrite(raw)),
            ParameterMode::Relative => Self::relative(memory, raw, registers),
        }
    }

    /// Store `value` at the address a raw operand word refers to.
    ///
    /// Fails with [`CpuError::IllegalWrite`] in immediate mode.
    pub fn set(
        self,
        memory: &mut Memory,
        raw: i64,
        value: i64,
        registers: &Registers,
    ) -> Result<(), CpuError> {
        let address = self.target(memory, raw, registers)?;
        memory.write(address, value)
    }

    /// Decode the modes of the first `count` parameters of an instruction word
    ///
    /// Given the word `ABCDE`, `DE` is the opcode, `C` is the first parameter's mode, `B` the
    /// second's, and `A` the third's. Digits past the start of the word are `0`, so `1002` decodes
    /// as positional, immediate, positional.
    pub fn decode(word: i64, count: usize) -> Result<Vec<Self>, CpuError> {
        let mut digits = word / 100;
        let mut modes = Vec::with_capacity(count);
        for _ in 0..count {
            modes.push(Self::try_from(digits % 10)?);
            digits /= 10;
        }
        Ok(modes)
    }
}
