// SPDX-FileCopyrightText: 2025 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Wiring input and output into the opcode table
//!
//! The input (3) and output (4) opcodes don't know where their values come from or go to. They
//! close over an [`InputProvider`] and an [`OutputConsumer`] chosen when the opcode table is built,
//! so the same [`Cpu`](crate::Cpu) can read from a fixed list, from another CPU's output, or
//! interactively from stdin.
//!
//! # Example
//!
//! Two CPUs chained through a [Queue], the first doubling its input and the second adding 1:
//!
//! ```rust
//! use intcode_cpu::prelude::*;
//!
//! let double = [3, 9, 1002, 9, 2, 9, 4, 9, 99, 0];
//! let inc = [3, 9, 1001, 9, 1, 9, 4, 9, 99, 0];
//!
//! let first_in = Queue::from_iter([20]);
//! let between = Queue::default();
//! let last_out = Outputs::default();
//!
//! Cpu::new(bind_io_with(first_in, between.clone(), None)).reset(double).execute().unwrap();
//! Cpu::new(bind_io_with(between, last_out.clone(), None)).reset(inc).execute().unwrap();
//! assert_eq!(last_out.take(), vec![41]);
//! ```

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::sync::mpsc;

use crate::{CpuError, Instruction, OpcodeTable};

/// A source of values for the input opcode
pub trait InputProvider {
    /// Produce the next input value, or [`CpuError::InputExhausted`] if there is none
    fn next_input(&mut self) -> Result<i64, CpuError>;
}

/// A sink for values emitted by the output opcode
pub trait OutputConsumer {
    /// Accept an output value
    fn consume(&mut self, value: i64) -> Result<(), CpuError>;
}

impl<T: InputProvider + ?Sized> InputProvider for Box<T> {
    fn next_input(&mut self) -> Result<i64, CpuError> {
        (**self).next_input()
    }
}

impl<T: OutputConsumer + ?Sized> OutputConsumer for Box<T> {
    fn consume(&mut self, value: i64) -> Result<(), CpuError> {
        (**self).consume(value)
    }
}

/// Input drawn from an iterator, which may be finite or infinite
pub struct IterInput<I>(I);

impl<I: Iterator<Item = i64>> IterInput<I> {
    /// Wrap anything that can be iterated over
    pub fn new(inputs: impl IntoIterator<IntoIter = I>) -> Self {
        Self(inputs.into_iter())
    }
}

impl<I: Iterator<Item = i64>> InputProvider for IterInput<I> {
    fn next_input(&mut self) -> Result<i64, CpuError> {
        self.0.next().ok_or(CpuError::InputExhausted)
    }
}

#[derive(Debug, Default, Clone)]
/// A shared FIFO queue
///
/// Clones share the same queue, so one clone can be the output of one CPU while another is the
/// input of the next.
pub struct Queue(Rc<RefCell<VecDeque<i64>>>);

impl Queue {
    /// Add a value to the back of the queue
    pub fn push(&self, value: i64) {
        self.0.borrow_mut().push_back(value);
    }

    /// Remove the value at the front of the queue
    pub fn pop(&self) -> Option<i64> {
        self.0.borrow_mut().pop_front()
    }

    /// Number of queued values
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Remove and return every queued value
    pub fn take(&self) -> Vec<i64> {
        self.0.borrow_mut().drain(..).collect()
    }
}

impl FromIterator<i64> for Queue {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(Rc::new(RefCell::new(iter.into_iter().collect())))
    }
}

impl InputProvider for Queue {
    fn next_input(&mut self) -> Result<i64, CpuError> {
        self.pop().ok_or(CpuError::InputExhausted)
    }
}

impl OutputConsumer for Queue {
    fn consume(&mut self, value: i64) -> Result<(), CpuError> {
        self.push(value);
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
/// A shared, growable collection of every value output
pub struct Outputs(Rc<RefCell<Vec<i64>>>);

impl Outputs {
    /// Remove and return everything collected so far
    pub fn take(&self) -> Vec<i64> {
        self.0.take()
    }

    /// Copy everything collected so far
    pub fn to_vec(&self) -> Vec<i64> {
        self.0.borrow().clone()
    }

    /// The most recent output
    pub fn last(&self) -> Option<i64> {
        self.0.borrow().last().copied()
    }

    /// Number of values collected
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether nothing has been collected
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl OutputConsumer for Outputs {
    fn consume(&mut self, value: i64) -> Result<(), CpuError> {
        self.0.borrow_mut().push(value);
        Ok(())
    }
}

/// Input read a line at a time from a reader, blocking until a line is available
///
/// A prompt is written before each read. Blank lines are skipped, and end of input becomes
/// [`CpuError::InputExhausted`].
pub struct Interactive<R, W> {
    reader: R,
    prompt_to: W,
    prompt: Cow<'static, str>,
}

impl Interactive<io::BufReader<io::Stdin>, io::Stdout> {
    /// Read from stdin, prompting with `i> ` on stdout
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout(), "i> ")
    }
}

impl<R: BufRead, W: Write> Interactive<R, W> {
    /// Read from `reader`, writing `prompt` to `prompt_to` before each read
    pub fn new(reader: R, prompt_to: W, prompt: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reader,
            prompt_to,
            prompt: prompt.into(),
        }
    }
}

impl<R: BufRead, W: Write> InputProvider for Interactive<R, W> {
    fn next_input(&mut self) -> Result<i64, CpuError> {
        let mut buf = String::new();
        loop {
            write!(self.prompt_to, "{}", self.prompt)?;
            self.prompt_to.flush()?;
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                return Err(CpuError::InputExhausted);
            }
            let line = buf.trim();
            if !line.is_empty() {
                return line.parse().map_err(|e| {
                    CpuError::Io(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("{line:?} is not an integer: {e}"),
                    ))
                });
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
/// Output printed to stdout, one value per line
pub struct Stdout;

impl OutputConsumer for Stdout {
    fn consume(&mut self, value: i64) -> Result<(), CpuError> {
        writeln!(io::stdout().lock(), "{value}")?;
        Ok(())
    }
}

impl InputProvider for mpsc::Receiver<i64> {
    /// Blocks until a value is sent. Once every sender is gone, input is exhausted.
    fn next_input(&mut self) -> Result<i64, CpuError> {
        self.recv().map_err(|_| CpuError::InputExhausted)
    }
}

impl OutputConsumer for mpsc::Sender<i64> {
    fn consume(&mut self, value: i64) -> Result<(), CpuError> {
        self.send(value)
            .map_err(|e| CpuError::custom(format_args!("output receiver is gone: {e}")))
    }
}

/// Build an opcode table with input (3) bound to `provider` and output (4) bound to `consumer`.
///
/// The table starts from [`OpcodeTable::core`], then merges in `base` if given, and finally binds
/// the I/O opcodes, so any 3 or 4 in `base` is replaced.
pub fn bind_io_with(
    provider: impl InputProvider + 'static,
    consumer: impl OutputConsumer + 'static,
    base: Option<&OpcodeTable>,
) -> OpcodeTable {
    let mut table = OpcodeTable::core();
    if let Some(base) = base {
        table.extend(base.clone());
    }
    table
        .insert(3, Instruction::input(provider))
        .expect("3 is a valid opcode");
    table
        .insert(4, Instruction::output(consumer))
        .expect("4 is a valid opcode");
    table
}

/// Build an opcode table that reads from `inputs` and collects outputs.
///
/// Returns the [Outputs] that every output instruction appends to, along with the table. See
/// [`bind_io_with`] for how `base` is used.
///
/// # Example
///
/// ```rust
/// use intcode_cpu::prelude::*;
///
/// let (outputs, table) = bind_io([], None);
/// let mut cpu = Cpu::new(table);
/// cpu.reset([104, 1125899906842624, 99]).execute().unwrap();
/// assert_eq!(outputs.take(), vec![1125899906842624]);
///
/// assert_eq!(cpu.reset([3, 0, 99]).execute(), Err(CpuError::InputExhausted));
/// ```
pub fn bind_io<I>(inputs: I, base: Option<&OpcodeTable>) -> (Outputs, OpcodeTable)
where
    I: IntoIterator<Item = i64>,
    I::IntoIter: 'static,
{
    let outputs = Outputs::default();
    let table = bind_io_with(IterInput::new(inputs), outputs.clone(), base);
    (outputs, table)
}
