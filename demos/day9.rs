// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 9 built using the `intcode_cpu` library.

use intcode_cpu::prelude::*;
use intcode_cpu::program::parse_program;

fn boost(code: &[i64], mode: i64) -> i64 {
    let (outputs, table) = bind_io([mode], None);
    Cpu::new(table)
        .reset(code.iter().copied())
        .execute()
        .unwrap();
    let output = outputs.take();
    assert_eq!(output.len(), 1, "{output:?}");
    output[0]
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");
    let code = parse_program(&input).unwrap();
    println!("part 1: {}", boost(&code, 1));
    println!("part 2: {}", boost(&code, 2));
}
