// SPDX-FileCopyrightText: 2025 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Auto-growing Intcode memory
//!
//! Every access at a non-negative address succeeds: reading or writing past the end first
//! zero-extends the backing storage so that the address exists. Negative addresses are rejected
//! with [`CpuError::NegativeAddress`].

use itertools::Itertools;
use std::fmt;

use crate::CpuError;

/// Default cap on the number of cells, see [`Memory::with_limit`]
pub const DEFAULT_LIMIT: usize = 1 << 16;

#[derive(Clone)]
/// Zero-indexed, zero-filled memory that grows on access
pub struct Memory {
    cells: Vec<i64>,
    limit: usize,
}

impl Memory {
    /// Create empty memory with the [default limit](DEFAULT_LIMIT)
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }

    /// Create empty memory that refuses to grow past `limit` cells.
    ///
    /// Legitimate programs rarely need more than a few thousand cells, so the limit exists to turn
    /// runaway addressing into a [`CpuError::MemoryLimit`] instead of an allocation failure. Pass
    /// [`usize::MAX`] to disable it.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            cells: Vec::new(),
            limit,
        }
    }

    /// Replace the limit, keeping the current contents
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    /// The configured growth limit
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Make sure `address` is backed by storage, returning it as an index
    fn ensure(&mut self, address: i64) -> Result<usize, CpuError> {
        let index = usize::try_from(address).map_err(|_| CpuError::NegativeAddress(address))?;
        if index >= self.cells.len() {
            if index >= self.limit {
                return Err(CpuError::MemoryLimit {
                    address,
                    limit: self.limit,
                });
            }
            self.cells.resize(index + 1, 0);
        }
        Ok(index)
    }

    /// Read the value at `address`, growing memory to include it if needed
    #[doc(alias = "get")]
    pub fn read(&mut self, address: i64) -> Result<i64, CpuError> {
        let index = self.ensure(address)?;
        Ok(self.cells[index])
    }

    /// Write `value` at `address`, growing memory to include it if needed
    #[doc(alias("set", "poke"))]
    pub fn write(&mut self, address: i64, value: i64) -> Result<(), CpuError> {
        let index = self.ensure(address)?;
        self.cells[index] = value;
        Ok(())
    }

    /// Look at the value at `address` without growing memory.
    ///
    /// Addresses past the end, and negative addresses, read as `0`.
    pub fn peek(&self, address: i64) -> i64 {
        usize::try_from(address)
            .ok()
            .and_then(|i| self.cells.get(i).copied())
            .unwrap_or_default()
    }

    /// Number of cells currently backed by storage
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cells are backed by storage
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// View the backed cells
    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

// the limit is configuration, not contents
impl PartialEq for Memory {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl FromIterator<i64> for Memory {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl IntoIterator for Memory {
    type Item = i64;
    type IntoIter = std::vec::IntoIter<i64>;
    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a> IntoIterator for &'a Memory {
    type Item = &'a i64;
    type IntoIter = std::slice::Iter<'a, i64>;
    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fmtstruct = fmt.debug_map();
        for (row, chunk) in self.cells.chunks(16).enumerate() {
            // all-zero rows are noise
            if chunk.iter().any(|&c| c != 0) {
                fmtstruct.entry(
                    &format_args!("{:04}", row * 16),
                    &format_args!("[{}]", chunk.iter().format(", ")),
                );
            }
        }
        fmtstruct.finish()
    }
}
