//! Run the `intcode` binary against small programs.
// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use std::fs;
use std::path::PathBuf;
use assert_cmd::Command;

/// Write `contents` to a file named `name` in cargo's scratch directory
fn program_file(name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn intcode() -> Command {
    Command::cargo_bin("intcode").unwrap()
}

#[test]
fn inputs_from_arguments() {
    let path = program_file("cmp8.int", "3,9,8,9,10,9,4,9,99,-1,8\n");
    intcode()
        .arg(&path)
        .args(["--input", "8"])
        .assert()
        .success()
        .stdout("1\n");
    intcode()
        .arg(&path)
        .args(["--input", "-3"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn interactive_input() {
    let path = program_file("echo.int", "3,0,4,0,99");
    intcode()
        .arg(&path)
        .arg("--interactive")
        .write_stdin("\n42\n")
        .assert()
        .success()
        .stdout("i> i> 42\n");
}

#[test]
fn ascii_output() {
    let path = program_file("hi.int", "104,72,104,105,104,10,99");
    intcode()
        .arg(&path)
        .arg("--ascii")
        .assert()
        .success()
        .stdout("Hi\n");
}

#[test]
fn binary_program_and_dump() {
    let bytes: Vec<u8> = [1101_i64, 2, 3, 5, 99, 0]
        .into_iter()
        .flat_map(i64::to_le_bytes)
        .collect();
    let path = program_file("add.bin", bytes);
    intcode()
        .arg(&path)
        .args(["--format", "binle", "--dump"])
        .assert()
        .success()
        .stdout("1101,2,3,5,99,5\n");
}

#[test]
fn missing_input_fails() {
    let path = program_file("needs-input.int", "3,0,99");
    intcode().arg(&path).assert().failure();
}

#[test]
fn memory_limit_is_configurable() {
    let path = program_file("far-write.int", "1101,1,1,5000,99");
    intcode().arg(&path).assert().success();
    intcode()
        .arg(&path)
        .args(["--memory-limit", "100"])
        .assert()
        .failure();
}
