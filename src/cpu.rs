// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! The fetch-decode-execute loop

use std::fmt;
use std::io;

use crate::bound::{BoundInstruction, StepOutcome};
use crate::memory::{DEFAULT_LIMIT, Memory};
use crate::trace::{Trace, TracedInstr};
use crate::{CpuError, OpcodeTable, Registers};

/// Whether a [Cpu] can execute more instructions
///
/// [Halted](State::Halted) means that a halt instruction has been executed. Once it's been
/// reached, no more instructions will be executed until the next [`Cpu::reset`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// More instructions can be executed
    Running,
    /// Execution has halted
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Settings applied to a [Cpu] on every [reset](Cpu::reset)
pub struct CpuConfig {
    /// Maximum number of memory cells, see [`Memory::with_limit`]
    pub memory_limit: usize,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            memory_limit: DEFAULT_LIMIT,
        }
    }
}

impl CpuConfig {
    /// Set [`memory_limit`](CpuConfig::memory_limit)
    #[must_use]
    pub fn memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = limit;
        self
    }
}

/// An Intcode CPU
///
/// Owns its memory, program counter, and registers. The opcode table is fixed at construction and
/// kept across [resets](Cpu::reset), so one CPU can run any number of programs.
pub struct Cpu {
    memory: Memory,
    pos: i64,
    registers: Registers,
    opcodes: OpcodeTable,
    state: State,
    config: CpuConfig,
    pub(crate) trace: Option<Trace>,
    pub(crate) logger: Option<Box<dyn io::Write>>,
}

// ignore the opcode table, trace, and logger
impl PartialEq for Cpu {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
            && self.state == other.state
            && self.registers == other.registers
            && self.memory == other.memory
    }
}

impl fmt::Debug for Cpu {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Cpu")
            .field("memory", &self.memory)
            .field("pos", &self.pos)
            .field("registers", &self.registers)
            .field("state", &self.state)
            .field("opcodes", &self.opcodes)
            .field("tracing", &self.trace.is_some())
            .field("logging", &self.logger.is_some())
            .finish()
    }
}

// loggers can't be cloned, so clones start out without one
impl Clone for Cpu {
    fn clone(&self) -> Self {
        Self {
            memory: self.memory.clone(),
            pos: self.pos,
            registers: self.registers.clone(),
            opcodes: self.opcodes.clone(),
            state: self.state,
            config: self.config,
            trace: self.trace.clone(),
            logger: None,
        }
    }
}

impl Cpu {
    /// Create a CPU using `opcodes`, with empty memory
    pub fn new(opcodes: OpcodeTable) -> Self {
        Self::with_config(opcodes, CpuConfig::default())
    }

    /// Create a CPU using `opcodes` and `config`, with empty memory
    pub fn with_config(opcodes: OpcodeTable, config: CpuConfig) -> Self {
        Self {
            memory: Memory::with_limit(config.memory_limit),
            pos: 0,
            registers: Registers::default(),
            opcodes,
            state: State::Running,
            config,
            trace: None,
            logger: None,
        }
    }

    /// Load `program` into fresh memory, and reset the position and registers.
    ///
    /// Returns `self` so it can be chained with [`execute`](Cpu::execute).
    pub fn reset(&mut self, program: impl IntoIterator<Item = i64>) -> &mut Self {
        self.memory = program.into_iter().collect();
        self.memory.set_limit(self.config.memory_limit);
        self.pos = 0;
        self.registers = Registers::default();
        self.state = State::Running;
        self
    }

    /// Fetch, decode, and execute a single instruction.
    ///
    /// Once halted, this does nothing and keeps returning [`StepOutcome::Halted`].
    ///
    /// The opcode is the word's remainder mod 100 with the sign kept, so a negative word like `-99`
    /// fails with [`CpuError::UnknownOpcode`] rather than running as opcode `1`.
    pub fn step(&mut self) -> Result<StepOutcome, CpuError> {
        if self.state == State::Halted {
            return Ok(StepOutcome::Halted);
        }
        let pos = self.pos;
        let word = self.memory.read(pos)?;
        let opcode = word % 100;
        let instruction = self
            .opcodes
            .get(opcode)
            .ok_or(CpuError::UnknownOpcode { opcode, pos })?;
        let name = instruction.name();
        let rel_base = self.registers.relative_base;

        let executed =
            BoundInstruction::bind(word, instruction, pos, &mut self.memory, &mut self.registers)?
                .execute()?;

        match executed.outcome {
            StepOutcome::Continue(next) => self.pos = next,
            StepOutcome::Halted => self.state = State::Halted,
        }
        // the step is committed before the logger can fail
        if self.is_recording() {
            self.record(TracedInstr::build(word, pos, rel_base, name, &executed))?;
        }
        Ok(executed.outcome)
    }

    /// Execute until a halt instruction runs.
    ///
    /// A program that never halts keeps this running forever; use [`run_for`](Cpu::run_for) to
    /// bound it.
    pub fn execute(&mut self) -> Result<(), CpuError> {
        while self.step()? != StepOutcome::Halted {}
        Ok(())
    }

    /// Execute at most `max_steps` instructions, returning whether the CPU halted
    pub fn run_for(&mut self, max_steps: usize) -> Result<State, CpuError> {
        for _ in 0..max_steps {
            if self.step()? == StepOutcome::Halted {
                break;
            }
        }
        Ok(self.state)
    }

    /// The CPU's memory
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable access to the CPU's memory, e.g. to patch a program before running it
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// The program counter
    pub fn pos(&self) -> i64 {
        self.pos
    }

    /// The CPU's registers
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Mutable access to the CPU's registers
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    /// The opcode table
    pub fn opcodes(&self) -> &OpcodeTable {
        &self.opcodes
    }

    /// Current [State]
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether a halt instruction has run since the last reset
    pub fn is_halted(&self) -> bool {
        self.state == State::Halted
    }

    /// The configuration applied on reset
    pub fn config(&self) -> CpuConfig {
        self.config
    }
}
