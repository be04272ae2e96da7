// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD
#![warn(missing_docs)]

//! Library providing an Intcode CPU with a pluggable opcode table
//!
//! The CPU knows nothing about what its opcodes do. It fetches the word at its program counter,
//! splits it into an opcode id and [parameter modes], looks the id up in its [`OpcodeTable`], and
//! lets the resulting [`BoundInstruction`] do the rest. The [baseline table] covers every opcode
//! of the completed Intcode computer from [Day 9], and callers can merge in their own entries.
//!
//! # Example
//!
//! ```rust
//! use intcode_cpu::prelude::*;
//!
//! let mut cpu = Cpu::new(OpcodeTable::base());
//! cpu.reset([1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]).execute().unwrap();
//! assert_eq!(cpu.memory().peek(0), 3500);
//! ```
//!
//! Input and output are wired in by building the opcode table, not by touching the CPU:
//!
//! ```rust
//! use intcode_cpu::prelude::*;
//!
//! let (outputs, table) = bind_io([8], None);
//! Cpu::new(table)
//!     .reset([3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8])
//!     .execute()
//!     .unwrap();
//! assert_eq!(outputs.take(), vec![1]);
//! ```
//!
//! [parameter modes]: ParameterMode
//! [baseline table]: OpcodeTable::base
//! [Day 9]: https://adventofcode.com/2019/day/9

pub mod bound;
pub mod cpu;
pub mod instruction;
pub mod io;
pub mod memory;
pub mod mode;
pub mod program;
pub mod registers;
pub mod trace;

use std::error::Error;
use std::fmt::{self, Display};
use std::io as stdio;

pub use bound::{BoundInstruction, StepOutcome};
pub use cpu::{Cpu, CpuConfig, State};
pub use instruction::{Instruction, OpcodeTable, Operation};
pub use memory::Memory;
pub use mode::ParameterMode;
pub use registers::Registers;

/// A small module that re-exports items needed when working with the Intcode CPU
pub mod prelude {
    pub use crate::io::{Outputs, Queue, bind_io, bind_io_with};
    pub use crate::{Cpu, CpuConfig, CpuError, Instruction, OpcodeTable, State};
    pub use std::iter::empty;
}

#[derive(Debug)]
/// An error that ended execution abnormally
///
/// Halting is not an error, and is reported as [`StepOutcome::Halted`] instead.
pub enum CpuError {
    /// A negative memory address was accessed or jumped to
    NegativeAddress(i64),
    /// An opcode with no entry in the opcode table was encountered
    UnknownOpcode {
        /// the opcode id (the low two digits of the instruction word)
        opcode: i64,
        /// the position of the instruction word
        pos: i64,
    },
    /// A parameter mode digit other than 0, 1, or 2 was encountered
    UnknownMode(i64),
    /// An instruction tried to write through an immediate mode parameter
    IllegalWrite(i64),
    /// An input instruction ran with no input left to consume
    InputExhausted,
    /// Memory would have grown past the configured limit
    MemoryLimit {
        /// the address that was accessed
        address: i64,
        /// the configured limit, in cells
        limit: usize,
    },
    /// An interactive source, output sink, or logger failed
    Io(stdio::Error),
    /// An error raised by a caller-supplied operation
    Custom(Box<str>),
}

impl PartialEq for CpuError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NegativeAddress(lhs), Self::NegativeAddress(rhs))
            | (Self::UnknownMode(lhs), Self::UnknownMode(rhs))
            | (Self::IllegalWrite(lhs), Self::IllegalWrite(rhs)) => lhs == rhs,
            (
                Self::UnknownOpcode { opcode: a, pos: b },
                Self::UnknownOpcode { opcode: c, pos: d },
            ) => a == c && b == d,
            (Self::InputExhausted, Self::InputExhausted) => true,
            (
                Self::MemoryLimit { address: a, limit: b },
                Self::MemoryLimit { address: c, limit: d },
            ) => a == c && b == d,
            (Self::Custom(lhs), Self::Custom(rhs)) => lhs == rhs,
            // io::Error isn't comparable
            _ => false,
        }
    }
}

impl Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::NegativeAddress(i) => write!(f, "attempted to access negative address {i}"),
            CpuError::UnknownOpcode { opcode, pos } => {
                write!(f, "encountered unknown opcode {opcode} at position {pos}")
            }
            CpuError::UnknownMode(mode) => write!(f, "encountered unknown parameter mode {mode}"),
            CpuError::IllegalWrite(i) => write!(f, "code attempted to write to immediate {i}"),
            CpuError::InputExhausted => write!(f, "input instruction ran with no input left"),
            CpuError::MemoryLimit { address, limit } => write!(
                f,
                "access to address {address} exceeds the memory limit of {limit} cells"
            ),
            CpuError::Io(e) => write!(f, "an I/O error occured: {e}"),
            CpuError::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl Error for CpuError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CpuError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<stdio::Error> for CpuError {
    fn from(err: stdio::Error) -> Self {
        Self::Io(err)
    }
}

impl CpuError {
    /// Build a [`CpuError::Custom`] from anything that can be displayed
    pub fn custom(msg: impl Display) -> Self {
        Self::Custom(msg.to_string().into_boxed_str())
    }
}
