// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! CPU registers

use std::collections::BTreeMap;

/// Name under which [`Registers::relative_base`] is reachable through [`Registers::get`]
pub const RELATIVE_BASE: &str = "relative_base";

#[derive(Debug, Default, Clone, PartialEq)]
/// Named integer registers owned by a [`Cpu`](crate::Cpu)
///
/// The relative base is always present. Caller-supplied opcodes may keep their own state in
/// additional named registers, which start out absent and read as `0`.
pub struct Registers {
    /// Added to relative mode operands before addressing memory
    pub relative_base: i64,
    extra: BTreeMap<Box<str>, i64>,
}

impl Registers {
    /// Read a register by name
    pub fn get(&self, name: &str) -> i64 {
        if name == RELATIVE_BASE {
            self.relative_base
        } else {
            self.extra.get(name).copied().unwrap_or_default()
        }
    }

    /// Set a register by name, creating it if needed
    pub fn set(&mut self, name: &str, value: i64) {
        if name == RELATIVE_BASE {
            self.relative_base = value;
        } else if let Some(reg) = self.extra.get_mut(name) {
            *reg = value;
        } else {
            self.extra.insert(Box::from(name), value);
        }
    }

    /// Iterate over every register, the relative base first
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        std::iter::once((RELATIVE_BASE, self.relative_base))
            .chain(self.extra.iter().map(|(k, &v)| (k.as_ref(), v)))
    }
}
