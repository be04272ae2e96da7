// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! One-shot pairing of an [`Instruction`] with the memory it runs against

use crate::{CpuError, Instruction, Memory, Operation, ParameterMode, Registers};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Result of executing a single instruction
pub enum StepOutcome {
    /// Execution continues at the contained position
    Continue(i64),
    /// A halt instruction ran
    Halted,
}

#[derive(Debug, PartialEq, Clone)]
/// What a [`BoundInstruction`] did, for the caller's bookkeeping
pub struct Executed {
    /// Where execution goes next
    pub outcome: StepOutcome,
    /// `(raw word, resolved value)` for each parameter. For the write target, the resolved value
    /// is the address written to.
    pub params: Vec<(i64, i64)>,
    /// The value written through the final parameter, if any
    pub stored: Option<i64>,
    /// Whether a jump was taken, even if it landed where execution would have gone anyway
    pub jumped: bool,
}

/// A decoded instruction bound to the position it was fetched from, ready to run once
///
/// Built fresh for every step by [`Cpu::step`](crate::Cpu::step), which hands it disjoint borrows
/// of its memory and registers.
pub struct BoundInstruction<'c> {
    instruction: &'c Instruction,
    modes: Vec<ParameterMode>,
    pos: i64,
    memory: &'c mut Memory,
    registers: &'c mut Registers,
}

impl<'c> BoundInstruction<'c> {
    /// Decode the parameter modes of `word` for `instruction`, which was fetched from `pos`
    pub fn bind(
        word: i64,
        instruction: &'c Instruction,
        pos: i64,
        memory: &'c mut Memory,
        registers: &'c mut Registers,
    ) -> Result<Self, CpuError> {
        let modes = ParameterMode::decode(word, instruction.param_count())?;
        Ok(Self {
            instruction,
            modes,
            pos,
            memory,
            registers,
        })
    }

    /// The parameter modes, one per parameter
    pub fn modes(&self) -> &[ParameterMode] {
        &self.modes
    }

    /// Address of the first parameter word
    pub fn offset(&self) -> i64 {
        self.pos + 1
    }

    /// Run the instruction
    pub fn execute(self) -> Result<Executed, CpuError> {
        let Self {
            instruction,
            modes,
            pos,
            memory,
            registers,
        } = self;
        let arg_count = instruction.arg_count();
        let offset = pos + 1;
        let next = offset + instruction.param_count() as i64;

        let mut params = Vec::with_capacity(modes.len());
        for (i, mode) in modes.iter().take(arg_count).enumerate() {
            let raw = memory.read(offset + i as i64)?;
            params.push((raw, mode.get(memory, raw, registers)?));
        }
        let args: Vec<i64> = params.iter().map(|&(_, val)| val).collect();
        let args = args.as_slice();

        let result = match instruction.operation() {
            Operation::Halt => {
                return Ok(Executed {
                    outcome: StepOutcome::Halted,
                    params,
                    stored: None,
                    jumped: false,
                });
            }
            Operation::Compute(f) => f(args)?,
            Operation::WithRegisters(f) => f(args, registers)?,
            Operation::AdjustRelativeBase => {
                registers.relative_base = registers
                    .relative_base
                    .checked_add(args[0])
                    .ok_or_else(|| CpuError::custom("relative base overflowed"))?;
                registers.relative_base
            }
            Operation::Jump(predicate) => {
                let (tested, target) = args.split_at(arg_count - 1);
                let target = target[0];
                if !predicate(tested) {
                    return Ok(Executed {
                        outcome: StepOutcome::Continue(next),
                        params,
                        stored: None,
                        jumped: false,
                    });
                }
                if target < 0 {
                    return Err(CpuError::NegativeAddress(target));
                }
                return Ok(Executed {
                    outcome: StepOutcome::Continue(target),
                    params,
                    stored: None,
                    jumped: true,
                });
            }
        };

        let mut stored = None;
        if instruction.has_output() {
            // the destination word is always an address, never a value
            let raw = memory.read(offset + arg_count as i64)?;
            let address = modes[arg_count].target(memory, raw, registers)?;
            memory.write(address, result)?;
            params.push((raw, address));
            stored = Some(result);
        }

        Ok(Executed {
            outcome: StepOutcome::Continue(next),
            params,
            stored,
            jumped: false,
        })
    }
}
