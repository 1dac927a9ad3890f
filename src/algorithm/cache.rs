use crate::algorithm::validity::BusLayout;
use crate::io::configuration::DENSE_TABLE_MAX_BITS;
use crate::math::bitmask::full_mask;
use bitvec::prelude::*;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Key for caching the legality of one flag under one line state
///
/// `disconnected` is local to the substation: bit `i` refers to its `i`-th
/// line-endpoint slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValidityKey {
    flag: u32,
    disconnected: u32,
}

impl ValidityKey {
    /// Create a key from a bus flag and a local disconnected-line mask
    pub const fn new(flag: u32, disconnected: u32) -> Self {
        Self { flag, disconnected }
    }
}

impl Hash for ValidityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ((u64::from(self.flag) << 32) | u64::from(self.disconnected)).hash(state);
    }
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of answers served from stored results
    pub hits: usize,
    /// Number of rule evaluations performed
    pub misses: usize,
}

#[derive(Debug)]
enum Storage {
    /// Every answer precomputed, indexed by `flag << lines | disconnected`
    Dense {
        admissible: BitVec,
        table: BitVec,
    },
    /// Answers computed on first query and memoized
    Sparse {
        admissible: HashMap<u32, bool>,
        legality: HashMap<ValidityKey, bool>,
    },
}

/// Memoization table for bus-flag legality under every line state
///
/// A flag is *admissible* when it is legal with all lines connected. Flags
/// that are not admissible are never stored as outer keys and are reported
/// invalid under any line state. Small substations get a dense bit table
/// filled at construction; larger ones fall back to lazily filled hash maps.
/// Both forms answer exactly what a direct rule evaluation would.
#[derive(Debug)]
pub struct ValidityCache {
    layout: BusLayout,
    storage: Storage,

    /// Cache performance statistics
    pub stats: CacheStats,
}

impl ValidityCache {
    /// Build a cache, choosing dense storage when the table fits
    pub fn new(layout: BusLayout) -> Self {
        if layout.width() + layout.line_count() <= DENSE_TABLE_MAX_BITS {
            Self::dense(layout)
        } else {
            Self::sparse(layout)
        }
    }

    /// Build a fully precomputed cache
    ///
    /// Costs `2^n · 2^L` rule evaluations for `n` slots and `L` line slots.
    pub fn dense(layout: BusLayout) -> Self {
        let width = layout.width();
        let lines = layout.line_count();
        let flag_count = 1_usize << width;
        let mask_count = 1_usize << lines;

        let mut admissible = bitvec![0; flag_count];
        let mut table = bitvec![0; flag_count * mask_count];
        let mut stats = CacheStats::default();

        for flag in (0..flag_count).rev() {
            stats.misses += 1;
            if !layout.evaluate(flag as u32, 0) {
                continue;
            }
            admissible.set(flag, true);
            table.set(flag * mask_count, true);

            for disconnected in 1..mask_count {
                stats.misses += 1;
                if layout.evaluate(flag as u32, disconnected as u32) {
                    table.set(flag * mask_count + disconnected, true);
                }
            }
        }

        log::debug!(
            "dense validity table: {width} slots, {lines} lines, {} admissible flags",
            admissible.count_ones()
        );

        Self {
            layout,
            storage: Storage::Dense { admissible, table },
            stats,
        }
    }

    /// Build an empty cache that evaluates on demand
    pub fn sparse(layout: BusLayout) -> Self {
        log::debug!(
            "sparse validity cache: {} slots, {} lines",
            layout.width(),
            layout.line_count()
        );
        Self {
            layout,
            storage: Storage::Sparse {
                admissible: HashMap::new(),
                legality: HashMap::new(),
            },
            stats: CacheStats::default(),
        }
    }

    /// Test if the answers were precomputed
    pub const fn is_dense(&self) -> bool {
        matches!(self.storage, Storage::Dense { .. })
    }

    /// Slot roles the cache evaluates against
    pub const fn layout(&self) -> &BusLayout {
        &self.layout
    }

    /// Test if a flag is legal with all lines connected
    pub fn is_admissible(&mut self, flag: u32) -> bool {
        use std::collections::hash_map::Entry;

        let Self {
            layout,
            storage,
            stats,
        } = self;

        match storage {
            Storage::Dense { admissible, .. } => {
                stats.hits += 1;
                admissible.get(flag as usize).as_deref() == Some(&true)
            }
            Storage::Sparse { admissible, .. } => match admissible.entry(flag) {
                Entry::Occupied(entry) => {
                    stats.hits += 1;
                    *entry.get()
                }
                Entry::Vacant(entry) => {
                    stats.misses += 1;
                    *entry.insert(layout.evaluate(flag, 0))
                }
            },
        }
    }

    /// Look up the legality of a flag under a local disconnected-line mask
    pub fn is_valid(&mut self, flag: u32, disconnected: u32) -> bool {
        use std::collections::hash_map::Entry;

        if !self.is_admissible(flag) {
            return false;
        }
        if disconnected == 0 {
            return true;
        }

        let Self {
            layout,
            storage,
            stats,
        } = self;

        match storage {
            Storage::Dense { table, .. } => {
                let mask_count = 1_usize << layout.line_count();
                let disconnected = disconnected as usize;
                if disconnected >= mask_count {
                    stats.misses += 1;
                    return layout.evaluate(flag, disconnected as u32);
                }
                stats.hits += 1;
                table.get(flag as usize * mask_count + disconnected).as_deref() == Some(&true)
            }
            Storage::Sparse { legality, .. } => {
                match legality.entry(ValidityKey::new(flag, disconnected)) {
                    Entry::Occupied(entry) => {
                        stats.hits += 1;
                        *entry.get()
                    }
                    Entry::Vacant(entry) => {
                        stats.misses += 1;
                        *entry.insert(layout.evaluate(flag, disconnected))
                    }
                }
            }
        }
    }

    /// All admissible flags, highest first
    pub fn admissible_flags(&mut self) -> Vec<u32> {
        let full: u32 = full_mask(self.layout.width());
        (0..=full)
            .rev()
            .filter(|&flag| self.is_admissible(flag))
            .collect()
    }
}
