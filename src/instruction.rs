// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Instruction descriptors and opcode tables
//!
//! An [`Instruction`] says how many operands an opcode reads, whether it writes a result, and what
//! it does with them. The [`Cpu`](crate::Cpu) looks instructions up in an [`OpcodeTable`] by opcode
//! id, so adding or replacing an opcode never requires changing the CPU.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::io::{InputProvider, Interactive, OutputConsumer, Stdout};
use crate::{CpuError, Registers};

/// A function from read operands to a result
pub type ComputeFn = Rc<dyn Fn(&[i64]) -> Result<i64, CpuError>>;
/// A predicate deciding whether a jump is taken
pub type JumpFn = Rc<dyn Fn(&[i64]) -> bool>;
/// A function from read operands to a result, with access to the registers
pub type RegisterFn = Rc<dyn Fn(&[i64], &mut Registers) -> Result<i64, CpuError>>;

#[derive(Clone)]
/// What an [`Instruction`] does once its operands are resolved
pub enum Operation {
    /// Compute a value from the operands. If the instruction has an output, the value is written
    /// through the final parameter; otherwise it's discarded.
    Compute(ComputeFn),
    /// Test every operand but the last. If the predicate holds, the last operand's resolved value
    /// becomes the new position, otherwise the position advances normally.
    Jump(JumpFn),
    /// Add the single operand to the relative base
    AdjustRelativeBase,
    /// Like [`Compute`](Operation::Compute), but with mutable access to the registers
    WithRegisters(RegisterFn),
    /// Stop execution
    Halt,
}

#[derive(Clone)]
/// Behavior of a single opcode
pub struct Instruction {
    name: &'static str,
    arg_count: usize,
    has_output: bool,
    operation: Operation,
}

impl Instruction {
    /// An instruction that reads `arg_count` operands and computes a value from them
    pub fn compute(
        name: &'static str,
        arg_count: usize,
        has_output: bool,
        f: impl Fn(&[i64]) -> Result<i64, CpuError> + 'static,
    ) -> Self {
        Self {
            name,
            arg_count,
            has_output,
            operation: Operation::Compute(Rc::new(f)),
        }
    }

    /// A jump instruction reading `arg_count` operands, the last of which is the jump target.
    ///
    /// `predicate` receives the other `arg_count - 1` operands.
    ///
    /// # Panics
    ///
    /// Panics if `arg_count` is `0`, as there'd be no jump target
    pub fn jump(
        name: &'static str,
        arg_count: usize,
        predicate: impl Fn(&[i64]) -> bool + 'static,
    ) -> Self {
        assert!(arg_count > 0, "jump instructions need a target operand");
        Self {
            name,
            arg_count,
            has_output: false,
            operation: Operation::Jump(Rc::new(predicate)),
        }
    }

    /// An instruction that can read and modify the registers
    pub fn with_registers(
        name: &'static str,
        arg_count: usize,
        has_output: bool,
        f: impl Fn(&[i64], &mut Registers) -> Result<i64, CpuError> + 'static,
    ) -> Self {
        Self {
            name,
            arg_count,
            has_output,
            operation: Operation::WithRegisters(Rc::new(f)),
        }
    }

    /// Add the single operand to the relative base
    pub fn adjust_relative_base() -> Self {
        Self {
            name: "rbo",
            arg_count: 1,
            has_output: false,
            operation: Operation::AdjustRelativeBase,
        }
    }

    /// Stop execution
    pub fn halt() -> Self {
        Self {
            name: "halt",
            arg_count: 0,
            has_output: false,
            operation: Operation::Halt,
        }
    }

    /// Store the next value from `provider`
    pub fn input(provider: impl InputProvider + 'static) -> Self {
        let provider = RefCell::new(provider);
        Self::compute("in", 0, true, move |_| provider.borrow_mut().next_input())
    }

    /// Pass the single operand to `consumer`
    pub fn output(consumer: impl OutputConsumer + 'static) -> Self {
        let consumer = RefCell::new(consumer);
        Self::compute("out", 1, false, move |args| {
            consumer.borrow_mut().consume(args[0])?;
            Ok(args[0])
        })
    }

    /// Mnemonic used in logs and traces
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of operands that are read
    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    /// Whether a result is written through a final parameter
    pub fn has_output(&self) -> bool {
        self.has_output
    }

    /// Total number of parameters following the instruction word
    pub fn param_count(&self) -> usize {
        self.arg_count + usize::from(self.has_output)
    }

    /// The operation performed
    pub fn operation(&self) -> &Operation {
        &self.operation
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.operation {
            Operation::Compute(_) => "Compute",
            Operation::Jump(_) => "Jump",
            Operation::AdjustRelativeBase => "AdjustRelativeBase",
            Operation::WithRegisters(_) => "WithRegisters",
            Operation::Halt => "Halt",
        };
        f.debug_struct("Instruction")
            .field("name", &self.name)
            .field("arg_count", &self.arg_count)
            .field("has_output", &self.has_output)
            .field("operation", &format_args!("{kind}"))
            .finish()
    }
}

/// A comparison result as an Intcode value
macro_rules! comp {
    ($op: expr) => {{ i64::from($op) }};
}

fn overflow(a: i64, op: char, b: i64) -> CpuError {
    CpuError::custom(format_args!("{a} {op} {b} overflows a 64-bit word"))
}

#[derive(Clone, Default)]
/// Mapping from opcode id (`0..=99`) to [`Instruction`]
pub struct OpcodeTable {
    opcodes: BTreeMap<u8, Instruction>,
}

impl OpcodeTable {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The arithmetic, comparison, jump, relative base, and halt opcodes, without I/O.
    ///
    /// | id | operands | output | behavior |
    /// |----|----------|--------|----------|
    /// | 1  | 2 | yes | add |
    /// | 2  | 2 | yes | multiply |
    /// | 5  | 2 | no  | jump if non-zero |
    /// | 6  | 2 | no  | jump if zero |
    /// | 7  | 2 | yes | less than |
    /// | 8  | 2 | yes | equals |
    /// | 9  | 1 | no  | adjust relative base |
    /// | 99 | 0 | no  | halt |
    pub fn core() -> Self {
        let mut opcodes = BTreeMap::new();
        opcodes.insert(
            1,
            Instruction::compute("add", 2, true, |a| {
                a[0].checked_add(a[1]).ok_or_else(|| overflow(a[0], '+', a[1]))
            }),
        );
        opcodes.insert(
            2,
            Instruction::compute("mul", 2, true, |a| {
                a[0].checked_mul(a[1]).ok_or_else(|| overflow(a[0], '*', a[1]))
            }),
        );
        opcodes.insert(5, Instruction::jump("jnz", 2, |a| a[0] != 0));
        opcodes.insert(6, Instruction::jump("jz", 2, |a| a[0] == 0));
        opcodes.insert(7, Instruction::compute("lt", 2, true, |a| Ok(comp!(a[0] < a[1]))));
        opcodes.insert(8, Instruction::compute("eq", 2, true, |a| Ok(comp!(a[0] == a[1]))));
        opcodes.insert(9, Instruction::adjust_relative_base());
        opcodes.insert(99, Instruction::halt());
        Self { opcodes }
    }

    /// The [core](OpcodeTable::core) opcodes, plus input (3) read interactively from stdin and
    /// output (4) printed to stdout.
    ///
    /// Use [`bind_io`](crate::io::bind_io) to wire 3 and 4 to something else.
    pub fn base() -> Self {
        let mut table = Self::core();
        table.opcodes.insert(3, Instruction::input(Interactive::stdio()));
        table.opcodes.insert(4, Instruction::output(Stdout));
        table
    }

    /// Add or replace the instruction for `id`, returning the one it replaced.
    ///
    /// Fails with [`CpuError::UnknownOpcode`] if `id` isn't in `0..=99`, as it could never be
    /// decoded from an instruction word.
    pub fn insert(
        &mut self,
        id: i64,
        instruction: Instruction,
    ) -> Result<Option<Instruction>, CpuError> {
        match u8::try_from(id) {
            Ok(key @ 0..=99) => Ok(self.opcodes.insert(key, instruction)),
            _ => Err(CpuError::UnknownOpcode { opcode: id, pos: -1 }),
        }
    }

    /// Builder-style [`insert`](OpcodeTable::insert)
    pub fn with(mut self, id: i64, instruction: Instruction) -> Result<Self, CpuError> {
        self.insert(id, instruction)?;
        Ok(self)
    }

    /// Merge `other` into `self`. Entries from `other` replace existing ones.
    pub fn extend(&mut self, other: OpcodeTable) {
        self.opcodes.extend(other.opcodes);
    }

    /// Look up the instruction for an opcode id
    pub fn get(&self, id: i64) -> Option<&Instruction> {
        u8::try_from(id).ok().and_then(|id| self.opcodes.get(&id))
    }

    /// Whether the table has an entry for `id`
    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// Remove the entry for `id`
    pub fn remove(&mut self, id: i64) -> Option<Instruction> {
        u8::try_from(id).ok().and_then(|id| self.opcodes.remove(&id))
    }

    /// Iterate over entries in opcode order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Instruction)> {
        self.opcodes.iter().map(|(&id, instr)| (id, instr))
    }

    /// Number of opcodes defined
    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    /// Whether no opcodes are defined
    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }
}

impl fmt::Debug for OpcodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.opcodes.iter().map(|(id, instr)| (id, instr.name)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_table_shape() {
        let table = OpcodeTable::base();
        let shape: Vec<_> = table
            .iter()
            .map(|(id, i)| (id, i.arg_count(), i.has_output()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (1, 2, true),
                (2, 2, true),
                (3, 0, true),
                (4, 1, false),
                (5, 2, false),
                (6, 2, false),
                (7, 2, true),
                (8, 2, true),
                (9, 1, false),
                (99, 0, false),
            ]
        );
    }

    #[test]
    fn insert_rejects_undecodable_ids() {
        let mut table = OpcodeTable::new();
        assert!(table.insert(100, Instruction::halt()).is_err());
        assert!(table.insert(-1, Instruction::halt()).is_err());
        assert!(table.insert(0, Instruction::halt()).unwrap().is_none());
        assert!(table.insert(0, Instruction::halt()).unwrap().is_some());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn extend_prefers_new_entries() {
        let mut table = OpcodeTable::core();
        let extra = OpcodeTable::new()
            .with(1, Instruction::compute("sub", 2, true, |a| Ok(a[0] - a[1])))
            .unwrap()
            .with(10, Instruction::compute("neg", 1, true, |a| Ok(-a[0])))
            .unwrap();
        table.extend(extra);
        assert_eq!(table.get(1).unwrap().name(), "sub");
        assert_eq!(table.get(10).unwrap().name(), "neg");
        assert!(table.contains(99));
        assert!(!table.contains(3));
    }

    #[test]
    fn arithmetic_overflow_is_an_error() {
        let table = OpcodeTable::core();
        let Operation::Compute(add) = table.get(1).unwrap().operation() else {
            panic!("add should be a compute instruction");
        };
        assert_eq!(add(&[2, 3]), Ok(5));
        assert!(matches!(add(&[i64::MAX, 1]), Err(CpuError::Custom(_))));
    }
}
