// SPDX-FileCopyrightText: 2025 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Loading programs from text or binary

use std::error::Error;
use std::fmt::{self, Display};
use std::num::ParseIntError;

#[derive(Debug, PartialEq)]
/// A program couldn't be loaded
pub enum ProgramError {
    /// A comma-separated entry wasn't a valid integer
    BadInt {
        /// zero-based index of the entry
        index: usize,
        /// the entry's text, with surrounding whitespace removed
        token: Box<str>,
        /// why it failed to parse
        source: ParseIntError,
    },
    /// Binary input ended partway through a word
    IncompleteWord(Box<[u8]>),
}

impl Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::BadInt {
                index,
                token,
                source,
            } => write!(f, "entry {index} ({token:?}) is not a valid integer: {source}"),
            ProgramError::IncompleteWord(bytes) => {
                write!(f, "expected 8 bytes, got {}: {:02x?}", bytes.len(), bytes)
            }
        }
    }
}

impl Error for ProgramError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProgramError::BadInt { source, .. } => Some(source),
            ProgramError::IncompleteWord(_) => None,
        }
    }
}

/// Parse comma-separated integers, as used by Advent of Code puzzle inputs.
///
/// Whitespace around entries is ignored, so a trailing newline is fine. A string that's empty
/// apart from whitespace is an empty program.
///
/// # Example
///
/// ```
/// use intcode_cpu::program::parse_program;
/// assert_eq!(parse_program("1,0,0,3,99\n").unwrap(), vec![1, 0, 0, 3, 99]);
/// assert!(parse_program("1,,99").is_err());
/// ```
pub fn parse_program(text: &str) -> Result<Vec<i64>, ProgramError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(index, token)| {
            token.parse().map_err(|source| ProgramError::BadInt {
                index,
                token: Box::from(token),
                source,
            })
        })
        .collect()
}

fn from_bytes(bytes: &[u8], func: impl Fn([u8; 8]) -> i64) -> Result<Vec<i64>, ProgramError> {
    let (chunks, remainder) = bytes.as_chunks::<8>();
    if !remainder.is_empty() {
        return Err(ProgramError::IncompleteWord(Box::from(remainder)));
    }
    Ok(chunks.iter().map(|c| func(*c)).collect())
}

/// Decode little-endian 64-bit words
pub fn from_le_bytes(bytes: &[u8]) -> Result<Vec<i64>, ProgramError> {
    from_bytes(bytes, i64::from_le_bytes)
}

/// Decode big-endian 64-bit words
pub fn from_be_bytes(bytes: &[u8]) -> Result<Vec<i64>, ProgramError> {
    from_bytes(bytes, i64::from_be_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_puzzle_input() {
        assert_eq!(
            parse_program("109, 1,204,-1\n").unwrap(),
            vec![109, 1, 204, -1]
        );
        assert_eq!(parse_program(" \n").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn reports_bad_entry() {
        let Err(ProgramError::BadInt { index, token, .. }) = parse_program("1,2,x3,4") else {
            panic!("should have failed");
        };
        assert_eq!(index, 2);
        assert_eq!(&*token, "x3");
    }

    #[test]
    fn binary_words() {
        let mut bytes = Vec::new();
        for i in [104_i64, -5, 99] {
            bytes.extend_from_slice(&i.to_be_bytes());
        }
        assert_eq!(from_be_bytes(&bytes).unwrap(), vec![104, -5, 99]);
        assert_ne!(from_le_bytes(&bytes).unwrap(), vec![104, -5, 99]);
        assert_eq!(
            from_le_bytes(&bytes[..10]),
            Err(ProgramError::IncompleteWord(Box::from(&bytes[8..10])))
        );
    }
}
