// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Tracing and logging of executed instructions
use std::fmt::{self, Display};
use std::io;

use super::{Cpu, ParameterMode};
use crate::bound::Executed;

#[derive(Debug, Clone, PartialEq)]
/// Information about an instruction that was executed, which can be queried with its various
/// methods, or converted into a [String] using its [Display] impl.
pub struct TracedInstr {
    op_int: i64,
    instr_ptr: i64,
    rel_base: i64,
    name: &'static str,
    modes: Vec<ParameterMode>,
    params: Vec<(i64, i64)>,
    stored_val: Option<i64>,
    jumped: bool,
}

impl TracedInstr {
    pub(crate) fn build(
        op_int: i64,
        instr_ptr: i64,
        rel_base: i64,
        name: &'static str,
        executed: &Executed,
    ) -> Self {
        let modes = ParameterMode::decode(op_int, executed.params.len())
            .expect("previously decoded successfully");
        Self {
            op_int,
            instr_ptr,
            rel_base,
            name,
            modes,
            params: executed.params.clone(),
            stored_val: executed.stored,
            jumped: executed.jumped,
        }
    }

    /// Return the relative base at the time the traced instruction was executed
    pub fn rel_base(&self) -> i64 {
        self.rel_base
    }

    /// Return the instruction pointer's position when the traced instruction was executed
    pub fn instr_ptr(&self) -> i64 {
        self.instr_ptr
    }

    /// Return the actual integer of the traced instruction
    pub fn op_int(&self) -> i64 {
        self.op_int
    }

    /// Return the opcode id of the traced instruction
    pub fn opcode(&self) -> i64 {
        self.op_int % 100
    }

    /// Return the mnemonic of the traced instruction
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// If the instruction stored a value, return that value
    pub fn stored_val(&self) -> Option<i64> {
        self.stored_val
    }

    /// Return the parameter modes of the traced instruction
    pub fn param_modes(&self) -> &[ParameterMode] {
        &self.modes
    }

    /// Return `(raw, resolved)` pairs for each parameter
    pub fn params(&self) -> &[(i64, i64)] {
        &self.params
    }

    /// Whether execution continued somewhere other than the next instruction
    pub fn jumped(&self) -> bool {
        self.jumped
    }
}

impl Display for TracedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ran instruction at {:0>4}: op int {: <5} | rb {: <5} | [{}",
            self.instr_ptr, self.op_int, self.rel_base, self.name
        )?;
        let stored_at = self.stored_val.map(|_| self.params.len() - 1);
        for (i, (mode, (raw, val))) in self.modes.iter().zip(&self.params).enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            if stored_at == Some(i) {
                write!(f, "{sep}{mode}{raw} (stored to {val})")?;
            } else {
                write!(f, "{sep}{mode}{raw} (resolves to {val})")?;
            }
        }
        write!(f, "]")?;
        if let Some(v) = self.stored_val {
            write!(f, " => {v}")?;
        }
        if self.jumped {
            write!(f, " (jumped)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
/// A log of instructions that a [Cpu] has executed since a call to [Cpu::start_trace]
pub struct Trace(pub Vec<TracedInstr>);

impl Trace {
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of traced instructions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been traced
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.0 {
            writeln!(f, "{instr}")?;
        }
        Ok(())
    }
}

impl Cpu {
    /// Begin a [Trace] of executed instructions. If a trace is already running, this replaces that
    /// trace and returns it in a [`Some`], otherwise, it returns [`None`].
    ///
    /// # Example
    /// ```
    /// # use intcode_cpu::prelude::*;
    /// let mut cpu = Cpu::new(OpcodeTable::core());
    /// cpu.reset([1101, 90, 9, 4]);
    /// cpu.start_trace();
    /// cpu.execute().unwrap();
    /// let trace = cpu.end_trace().unwrap();
    /// assert_eq!(trace.0[0].stored_val(), Some(99));
    /// assert_eq!(trace.0[1].name(), "halt");
    /// ```
    pub fn start_trace(&mut self) -> Option<Trace> {
        self.trace.replace(Trace::new())
    }

    /// Stop tracing executed instructions into a [Trace]. If no trace was active, returns [`None`]
    ///
    /// see [Cpu::start_trace]
    pub fn end_trace(&mut self) -> Option<Trace> {
        self.trace.take()
    }

    /// Get a view of the current trace
    pub fn show_trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Log every executed instruction to `logger`, one line each
    pub fn log_with(&mut self, logger: impl io::Write + 'static) {
        self.logger = Some(Box::new(logger));
    }

    /// Stop logging, returning the logger if there was one
    pub fn stop_logging(&mut self) -> Option<Box<dyn io::Write>> {
        self.logger.take()
    }

    pub(crate) fn record(&mut self, traced: TracedInstr) -> io::Result<()> {
        let logged = match self.logger {
            Some(ref mut logger) => writeln!(logger, "{traced}"),
            None => Ok(()),
        };
        if let Some(ref mut trace) = self.trace {
            trace.0.push(traced);
        }
        logged
    }

    pub(crate) fn is_recording(&self) -> bool {
        self.logger.is_some() || self.trace.is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn display_marks_stores_and_jumps() {
        let mut cpu = Cpu::new(OpcodeTable::core());
        cpu.reset([1101, 2, 3, 9, 1105, 1, 8, 0, 99]);
        cpu.start_trace();
        cpu.execute().unwrap();
        let trace = cpu.end_trace().unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(
            trace.0[0].to_string(),
            "ran instruction at 0000: op int 1101  | rb 0     | \
             [add #2 (resolves to 2), #3 (resolves to 3), 9 (stored to 9)] => 5"
        );
        assert!(trace.0[1].jumped());
        assert!(trace.0[1].to_string().ends_with("(jumped)"));
        assert_eq!(trace.0[2].instr_ptr(), 8);
    }

    #[test]
    fn jump_to_next_instruction_is_still_a_jump() {
        let mut cpu = Cpu::new(OpcodeTable::core());
        cpu.reset([1105, 1, 3, 99]);
        cpu.start_trace();
        cpu.execute().unwrap();
        let trace = cpu.end_trace().unwrap();
        assert_eq!(trace.0[1].instr_ptr(), 3);
        assert!(trace.0[0].jumped());
        assert!(!trace.0[1].jumped());

        // a jump that isn't taken falls through without being marked
        cpu.reset([1106, 1, 0, 99]);
        cpu.start_trace();
        cpu.execute().unwrap();
        assert!(!cpu.end_trace().unwrap().0[0].jumped());
    }

    #[test]
    fn logger_gets_one_line_per_instruction() {
        use std::cell::RefCell;
        use std::io::{self, Write};
        use std::rc::Rc;

        #[derive(Clone, Default)]
        struct SharedBuf(Rc<RefCell<Vec<u8>>>);
        impl Write for SharedBuf {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.borrow_mut().write(buf)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let buf = SharedBuf::default();
        let mut cpu = Cpu::new(OpcodeTable::core());
        cpu.log_with(buf.clone());
        cpu.reset([1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]).execute().unwrap();
        let log = String::from_utf8(buf.0.borrow().clone()).unwrap();
        assert_eq!(log.lines().count(), 3);
        assert!(log.lines().last().unwrap().contains("[halt]"));
    }
}
