//! Size-legality engine.
//!
//! Every bit length the crate accepts (hash output, key, block, IV, nonce,
//! tag, MAC) is checked against a [`SizeTable`]: an ordered set of
//! `(min, max, step)` ranges. A range with `step == 0` admits exactly `min`.
//! The all-zero range `(0, 0, 0)` therefore means "zero length only", which is
//! how "no IV" is expressed; it never means "any length".

use serde::{Deserialize, Serialize};
use std::fmt;

/// One `(min, max, step)` range of legal bit lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl SizeRange {
    /// The `(0, 0, 0)` range: only the empty size is legal.
    pub const NONE: SizeRange = SizeRange::exact(0);

    pub const fn new(min: u32, max: u32, step: u32) -> Self {
        Self { min, max, step }
    }

    /// A range admitting exactly one value.
    pub const fn exact(bits: u32) -> Self {
        Self {
            min: bits,
            max: bits,
            step: 0,
        }
    }

    pub const fn is_legal(&self, bits: u32) -> bool {
        if self.step == 0 {
            bits == self.min
        } else {
            bits >= self.min && bits <= self.max && (bits - self.min) % self.step == 0
        }
    }

    /// True for the `(0, 0, 0)` range.
    pub const fn is_none(&self) -> bool {
        self.min == 0 && self.max == 0 && self.step == 0
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.step == 0 {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}/{}", self.min, self.max, self.step)
        }
    }
}

/// Ordered set of [`SizeRange`]s. A size is legal if any member admits it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SizeTable {
    ranges: Vec<SizeRange>,
}

impl SizeTable {
    pub fn new(ranges: Vec<SizeRange>) -> Self {
        Self { ranges }
    }

    pub fn single(range: SizeRange) -> Self {
        Self {
            ranges: vec![range],
        }
    }

    pub fn exact(bits: u32) -> Self {
        Self::single(SizeRange::exact(bits))
    }

    /// Table holding only the `(0, 0, 0)` range.
    pub fn none() -> Self {
        Self::single(SizeRange::NONE)
    }

    /// Table of discrete values, one exact range per value.
    pub fn of(values: &[u32]) -> Self {
        Self {
            ranges: values.iter().copied().map(SizeRange::exact).collect(),
        }
    }

    pub fn ranges(&self) -> &[SizeRange] {
        &self.ranges
    }

    pub fn is_legal(&self, bits: u32) -> bool {
        self.ranges.iter().any(|range| range.is_legal(bits))
    }

    /// Checks a byte length, rejecting lengths whose bit count overflows `u32`.
    pub fn is_legal_bytes(&self, len: usize) -> bool {
        len.checked_mul(8)
            .and_then(|bits| u32::try_from(bits).ok())
            .map_or(false, |bits| self.is_legal(bits))
    }

    /// True when the table only admits the empty size.
    pub fn is_none(&self) -> bool {
        !self.ranges.is_empty() && self.ranges.iter().all(SizeRange::is_none)
    }

    /// Smallest legal value across all ranges.
    pub fn min(&self) -> Option<u32> {
        self.ranges.iter().map(|range| range.min).min()
    }

    /// Largest legal value across all ranges.
    pub fn max(&self) -> Option<u32> {
        self.ranges
            .iter()
            .map(|range| if range.step == 0 { range.min } else { range.max })
            .max()
    }
}

impl From<SizeRange> for SizeTable {
    fn from(range: SizeRange) -> Self {
        Self::single(range)
    }
}

impl fmt::Display for SizeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, range) in self.ranges.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

/// Free-function form of [`SizeTable::is_legal`].
pub fn is_legal(table: &SizeTable, bits: u32) -> bool {
    table.is_legal(bits)
}
