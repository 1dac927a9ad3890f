use bitvec::prelude::*;
use std::fmt;

/// Arbitrary-width bitmask of line states across the whole network
///
/// Bit `i` set means line `i` is energised. Indices match the global line
/// numbering shared by every substation and by the adjacency model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineMask {
    bits: BitVec,
}

impl LineMask {
    /// Create a mask with every line switched on
    pub fn all_on(line_count: usize) -> Self {
        Self {
            bits: bitvec![1; line_count],
        }
    }

    /// Create a mask with every line switched off
    pub fn all_off(line_count: usize) -> Self {
        Self {
            bits: bitvec![0; line_count],
        }
    }

    /// Create a mask with every line on except those listed
    ///
    /// Out-of-range line ids are ignored.
    pub fn with_lines_off(line_count: usize, off: &[usize]) -> Self {
        let mut mask = Self::all_on(line_count);
        for &line in off {
            mask.set(line, false);
        }
        mask
    }

    /// Number of lines covered by the mask
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Test if the mask covers no lines at all
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Switch a line on or off
    pub fn set(&mut self, line: usize, on: bool) {
        if line < self.bits.len() {
            self.bits.set(line, on);
        }
    }

    /// Test whether a line carries power
    ///
    /// Lines beyond the mask width are treated as on, matching a mask that
    /// was built before the line existed.
    pub fn is_on(&self, line: usize) -> bool {
        self.bits.get(line).as_deref().copied().unwrap_or(true)
    }

    /// Count energised lines
    pub fn on_count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Count switched-off lines
    pub fn off_count(&self) -> usize {
        self.bits.count_zeros()
    }

    /// Iterate the ids of energised lines in ascending order
    pub fn on_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Iterate the ids of switched-off lines in ascending order
    pub fn off_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_zeros()
    }

    /// Test if every line that is off here is also off in `other`
    ///
    /// Masks of different widths compare over the wider range, with the
    /// missing tail counting as switched on.
    pub fn off_subset_of(&self, other: &Self) -> bool {
        self.off_lines().all(|line| !other.is_on(line))
    }
}

impl fmt::Display for LineMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let off: Vec<usize> = self.off_lines().collect();
        write!(f, "LineMask({} lines, off: {off:?})", self.len())
    }
}
