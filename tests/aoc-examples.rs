//! Test that examples from Advent of Code problem descriptions behave as described.
// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use either::Either;
use intcode_cpu::ParameterMode;
use intcode_cpu::prelude::*;
use intcode_cpu::trace::{Trace, TracedInstr};
use itertools::Itertools;

// first, some groundwork for common elements of different tests

/// Construct a new CPU with the core opcodes and the given starting code
macro_rules! cpu {
    [$($i:expr),*] => {{
        let mut cpu = Cpu::new(OpcodeTable::core());
        cpu.reset([$($i),*]);
        cpu
    }}
}

/// Run `code` to the end with `inputs`, returning its output.
///
/// If it doesn't halt within a million steps, returns what it output so far instead.
fn run_to_end(
    code: &[i64],
    inputs: impl IntoIterator<Item = i64, IntoIter: 'static>,
) -> Result<Vec<i64>, Either<CpuError, Unfinished>> {
    let (outputs, table) = bind_io(inputs, None);
    let mut cpu = Cpu::new(table);
    cpu.reset(code.iter().copied());
    match cpu.run_for(1_000_000).map_err(Either::Left)? {
        State::Halted => Ok(outputs.take()),
        State::Running => Err(Either::Right(Unfinished {
            output: outputs.take(),
        })),
    }
}

/// A struct with the information about expected traced instruction
struct ExpectedOp {
    op_int: i64,
    instr_ptr: i64,
    stored_val: Option<i64>,
}

impl ExpectedOp {
    const fn new(op_int: i64, instr_ptr: i64, stored_val: Option<i64>) -> Self {
        Self {
            op_int,
            instr_ptr,
            stored_val,
        }
    }

    fn validate(self, traced: TracedInstr) {
        assert_eq!(self.op_int, traced.op_int());
        assert_eq!(self.instr_ptr, traced.instr_ptr());
        assert_eq!(self.stored_val, traced.stored_val());
    }
}

fn validate_trace(expected: impl IntoIterator<Item = ExpectedOp>, Trace(trace): Trace) {
    expected
        .into_iter()
        .zip_eq(trace)
        .for_each(|(op, instr)| op.validate(instr));
}

mod day2_examples {
    use crate::*;

    /// the extended example used to help illustrate the basics
    #[test]
    fn extended_example() {
        let mut cpu = cpu![1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50];
        cpu.start_trace();
        cpu.execute().unwrap();
        assert_eq!(cpu.memory().peek(0), 3500);
        const EXPECTED: [ExpectedOp; 3] = [
            ExpectedOp::new(1, 0, Some(70)),
            ExpectedOp::new(2, 4, Some(3500)),
            ExpectedOp::new(99, 8, None),
        ];
        validate_trace(EXPECTED, cpu.end_trace().unwrap());
    }

    /// the extra, smaller examples that are listed after the extended example
    #[test]
    fn small_examples() {
        macro_rules! example {
            ($($code: literal),+ becomes $($output: literal),+) => {{
                let mut cpu = cpu![$($code),*];
                cpu.execute().unwrap();
                assert_eq!(cpu.memory().as_slice(), &[$($output),+]);
            }}
        }
        example!(1,0,0,0,99 becomes 2,0,0,0,99);
        example!(2,3,0,3,99 becomes 2,3,0,6,99);
        example!(2,4,4,5,99,0 becomes 2,4,4,5,99,9801);
        example!(1,1,1,4,99,5,6,0,99 becomes 30,1,1,4,2,5,6,0,99);
    }
}

mod day5_examples {
    mod part1 {
        use crate::*;

        #[test]
        fn echo_input() {
            for i in -128..128 {
                assert_eq!(run_to_end(&[3, 0, 4, 0, 99], [i]).unwrap(), vec![i]);
            }
        }

        #[test]
        fn immediate_mode_example() {
            let mut cpu = cpu![1002, 4, 3, 4, 33];
            cpu.start_trace();
            cpu.execute().unwrap();
            const EXPECTED: [ExpectedOp; 2] = [
                ExpectedOp::new(1002, 0, Some(99)),
                ExpectedOp::new(99, 4, None),
            ];
            let trace = cpu.end_trace().unwrap();
            assert_eq!(
                trace.0[0].param_modes(),
                [
                    ParameterMode::Positional,
                    ParameterMode::Immediate,
                    ParameterMode::Positional
                ]
            );
            validate_trace(EXPECTED, trace);
        }

        #[test]
        fn negative_values() {
            let mut cpu = cpu![1101, 100, -1, 4, 0];
            cpu.execute().unwrap();
            assert_eq!(cpu.memory().peek(4), 99);
        }
    }

    mod part2 {
        use crate::*;

        #[test]
        fn comparison_examples() {
            const EQ_POSITIONAL: &[i64] = &[3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8];
            const LT_POSITIONAL: &[i64] = &[3, 9, 7, 9, 10, 9, 4, 9, 99, -1, 8];
            const EQ_IMMEDIATE: &[i64] = &[3, 3, 1108, -1, 8, 3, 4, 3, 99];
            const LT_IMMEDIATE: &[i64] = &[3, 3, 1107, -1, 8, 3, 4, 3, 99];

            for input in [7, 8, 9] {
                let eq = i64::from(input == 8);
                let lt = i64::from(input < 8);
                assert_eq!(run_to_end(EQ_POSITIONAL, [input]).unwrap(), vec![eq]);
                assert_eq!(run_to_end(LT_POSITIONAL, [input]).unwrap(), vec![lt]);
                assert_eq!(run_to_end(EQ_IMMEDIATE, [input]).unwrap(), vec![eq]);
                assert_eq!(run_to_end(LT_IMMEDIATE, [input]).unwrap(), vec![lt]);
            }
        }

        #[test]
        fn jump_examples() {
            const POSITIONAL: &[i64] = &[3, 12, 6, 12, 15, 1, 13, 14, 13, 4, 13, 99, -1, 0, 1, 9];
            const IMMEDIATE: &[i64] = &[3, 3, 1105, -1, 9, 1101, 0, 0, 12, 4, 12, 99, 1];
            for (input, expected) in [(0, 0), (1, 1), (-5, 1)] {
                assert_eq!(run_to_end(POSITIONAL, [input]).unwrap(), vec![expected]);
                assert_eq!(run_to_end(IMMEDIATE, [input]).unwrap(), vec![expected]);
            }
        }

        /// outputs 999 below 8, 1000 at 8, and 1001 above 8
        #[test]
        fn larger_example() {
            const CODE: &[i64] = &[
                3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31, 1106, 0, 36,
                98, 0, 0, 1002, 21, 125, 20, 4, 20, 1105, 1, 46, 104, 999, 1105, 1, 46, 1101, 1000,
                1, 20, 4, 20, 1105, 1, 46, 98, 99,
            ];
            for (input, expected) in [(7, 999), (8, 1000), (42, 1001)] {
                assert_eq!(run_to_end(CODE, [input]).unwrap(), vec![expected]);
            }
        }
    }
}

mod day9_examples {
    use crate::*;

    /// > takes no input and produces a copy of itself as output.
    #[test]
    fn quine() {
        let quine_code = [
            109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99,
        ];
        let output = run_to_end(&quine_code, empty()).unwrap();
        assert_eq!(output.as_slice(), quine_code.as_slice());
    }

    /// > should output a 16-digit number
    #[test]
    fn output_sixteen_digit() {
        let output = run_to_end(&[1102, 34915192, 34915192, 7, 4, 7, 99, 0], empty()).unwrap();
        assert_eq!(output, vec![34915192 * 34915192], "{output:?}");
        assert_eq!(output[0].to_string().len(), 16, "{output:?}");
    }

    /// > should output the large number in the middle
    #[test]
    fn large_number() {
        let output = run_to_end(&[104, 1125899906842624, 99], empty()).unwrap();
        assert_eq!(output, vec![1125899906842624]);
    }

    #[test]
    fn relative_mode_write() {
        // set the relative base to 10, read an input into @5, and output address 15
        let output = run_to_end(&[109, 10, 203, 5, 4, 15, 99], [77]).unwrap();
        assert_eq!(output, vec![77]);
    }
}

mod failures {
    use crate::*;

    #[test]
    fn missing_input() {
        assert_eq!(
            run_to_end(&[3, 99], empty()).unwrap_err().left(),
            Some(CpuError::InputExhausted)
        );
    }

    #[test]
    fn write_to_immediate() {
        assert_eq!(
            run_to_end(&[11101, 1, 1, 0, 99], empty()).unwrap_err().left(),
            Some(CpuError::IllegalWrite(0))
        );
    }

    #[test]
    fn negative_address() {
        assert_eq!(
            run_to_end(&[4, -1, 99], empty()).unwrap_err().left(),
            Some(CpuError::NegativeAddress(-1))
        );
    }

    #[test]
    fn unknown_mode() {
        assert_eq!(
            run_to_end(&[304, 0, 99], empty()).unwrap_err().left(),
            Some(CpuError::UnknownMode(3))
        );
    }

    #[test]
    fn never_halts() {
        let Either::Right(unfinished) = run_to_end(&[104, 1, 1105, 1, 0], empty()).unwrap_err()
        else {
            panic!("should not have halted or failed");
        };
        assert!(unfinished.output.iter().all(|&i| i == 1));
        assert!(!unfinished.output.is_empty());
    }
}

#[derive(Debug)]
struct Unfinished {
    output: Vec<i64>,
}
