// SPDX-FileCopyrightText: 2025 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Run an Intcode program, with inputs from the command line or interactively from stdin

use intcode_cpu::io::{Interactive, IterInput, OutputConsumer, Stdout};
use intcode_cpu::prelude::*;
use intcode_cpu::program::{self, parse_program};
use std::error::Error;
use std::fs::{self, read_to_string};
use std::io::{self, Write, stderr};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use itertools::Itertools;

#[derive(PartialEq, Clone, Copy, ValueEnum)]
enum CodeFormat {
    /// comma-separated ASCII-encoded decimal numbers
    #[value(alias("text"))]
    #[value(alias("aoc"))]
    Ascii,
    /// little-endian 64-bit integers
    #[cfg_attr(target_endian = "little", value(alias("binary-native")))]
    #[value(name("binary-little-endian"), alias("binle"))]
    LittleEndian,
    #[cfg_attr(target_endian = "big", value(alias("binary-native")))]
    #[value(name("binary-big-endian"), alias("binbe"))]
    /// big-endian 64-bit integers
    BigEndian,
}

const VERSION: &str = concat!(env!("CARGO_CRATE_NAME"), '-', env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = VERSION)]
#[command(about = "Intcode CPU", long_about = None)]
struct Args {
    #[arg(help = "The program to run")]
    source: PathBuf,
    #[arg(help = "Input format for the program")]
    #[arg(short, long)]
    #[arg(default_value = "ascii")]
    format: CodeFormat,
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    #[arg(help = "Comma-separated input values")]
    #[arg(conflicts_with = "interactive")]
    input: Vec<i64>,
    #[arg(short = 'I', long)]
    #[arg(help = "Prompt for input values on stdin")]
    interactive: bool,
    #[arg(short, long)]
    #[arg(help = "Print outputs in 0..=127 as ASCII characters")]
    ascii: bool,
    #[arg(short, long)]
    #[arg(help = "Print a trace of executed instructions to stderr")]
    trace: bool,
    #[arg(short = 'm', long, default_value_t = CpuConfig::default().memory_limit)]
    #[arg(help = "Maximum number of memory cells")]
    memory_limit: usize,
    #[arg(short, long)]
    #[arg(help = "Print the final memory state as comma-separated integers")]
    dump: bool,
}

/// Prints outputs as they happen, as characters when they're ASCII
struct AsciiStdout;

impl OutputConsumer for AsciiStdout {
    fn consume(&mut self, value: i64) -> Result<(), CpuError> {
        let mut stdout = io::stdout().lock();
        match u8::try_from(value) {
            Ok(c @ 0..=127) => write!(stdout, "{}", char::from(c))?,
            _ => writeln!(stdout, "{value}")?,
        }
        Ok(())
    }
}

fn load(args: &Args) -> Result<Vec<i64>, Box<dyn Error>> {
    let prog = match args.format {
        CodeFormat::Ascii => parse_program(&read_to_string(&args.source)?)?,
        CodeFormat::LittleEndian => program::from_le_bytes(&fs::read(&args.source)?)?,
        CodeFormat::BigEndian => program::from_be_bytes(&fs::read(&args.source)?)?,
    };
    Ok(prog)
}

fn build_table(args: &Args) -> OpcodeTable {
    macro_rules! with_output {
        ($input: expr) => {{
            if args.ascii {
                bind_io_with($input, AsciiStdout, None)
            } else {
                bind_io_with($input, Stdout, None)
            }
        }};
    }
    if args.interactive {
        with_output!(Interactive::stdio())
    } else {
        with_output!(IterInput::new(args.input.clone()))
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let code = load(args)?;
    let config = CpuConfig::default().memory_limit(args.memory_limit);
    let mut cpu = Cpu::with_config(build_table(args), config);
    cpu.reset(code);
    if args.trace {
        cpu.start_trace();
    }

    let result = cpu.execute();

    if let Some(trace) = cpu.end_trace() {
        write!(stderr(), "{trace}")?;
    }
    if let Err(err) = result {
        eprintln!("CPU ERROR at position {}", cpu.pos());
        return Err(err.into());
    }
    if args.dump {
        println!("{}", cpu.memory().as_slice().iter().join(","));
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", args.source.display());
            ExitCode::FAILURE
        }
    }
}
