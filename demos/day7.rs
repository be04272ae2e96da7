// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 7 part 1 built using the `intcode_cpu` library.
//!
//! Each amplifier is its own [Cpu], and they're chained through [Queue]s: the queue an amplifier
//! writes to is the queue the next one reads from.

use intcode_cpu::prelude::*;
use intcode_cpu::program::parse_program;
use itertools::Itertools;

fn thruster_signal(code: &[i64], phases: &[i64]) -> i64 {
    let queues: Vec<Queue> = phases.iter().map(|&p| Queue::from_iter([p])).collect();
    let result = Outputs::default();
    queues[0].push(0);

    for (i, input) in queues.iter().enumerate() {
        let table = match queues.get(i + 1) {
            Some(next) => bind_io_with(input.clone(), next.clone(), None),
            None => bind_io_with(input.clone(), result.clone(), None),
        };
        Cpu::new(table)
            .reset(code.iter().copied())
            .execute()
            .unwrap();
    }
    result.last().expect("last amplifier produced output")
}

fn part1(code: &[i64]) -> i64 {
    (0..5)
        .permutations(5)
        .map(|phases| thruster_signal(code, &phases))
        .max()
        .unwrap()
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");
    let code = parse_program(&input).unwrap();
    println!("part 1: {}", part1(&code));
}
