// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 2 built using the `intcode_cpu` library.

use intcode_cpu::prelude::*;
use intcode_cpu::program::parse_program;

/// Run `code` with the noun and verb patched in, returning address 0
fn run(cpu: &mut Cpu, code: &[i64], noun: i64, verb: i64) -> i64 {
    cpu.reset(code.iter().copied());
    cpu.memory_mut().write(1, noun).unwrap();
    cpu.memory_mut().write(2, verb).unwrap();
    cpu.execute().expect("intcode did not run to completion");
    cpu.memory().peek(0)
}

fn part2(cpu: &mut Cpu, code: &[i64]) -> i64 {
    for noun in 0..=99 {
        for verb in 0..=99 {
            #[allow(clippy::unreadable_literal, reason = "from Advent of Code")]
            if run(cpu, code, noun, verb) == 19690720 {
                return 100 * noun + verb;
            }
        }
    }
    panic!("no answer found for part 2");
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");
    let code = parse_program(&input).unwrap();

    // one CPU, reset for every attempt
    let mut cpu = Cpu::new(OpcodeTable::core());
    println!("part 1: {}", run(&mut cpu, &code, 12, 2));
    println!("part 2: {}", part2(&mut cpu, &code));
}
