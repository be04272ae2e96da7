// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 5 built using the `intcode_cpu` library.

use intcode_cpu::prelude::*;
use intcode_cpu::program::parse_program;

fn diagnostic(code: &[i64], system_id: i64) -> i64 {
    let (outputs, table) = bind_io([system_id], None);
    Cpu::new(table)
        .reset(code.iter().copied())
        .execute()
        .unwrap();
    let mut outputs = outputs.take();
    let diagnostic = outputs.pop().unwrap();
    assert!(outputs.into_iter().all(|i| i == 0), "diagnostic failed");

    diagnostic
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");
    let code = parse_program(&input).unwrap();
    println!("part 1: {}", diagnostic(&code, 1));
    println!("part 2: {}", diagnostic(&code, 5));
}
