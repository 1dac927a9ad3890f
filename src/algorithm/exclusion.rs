//! Minimal sets of line outages already known to be infeasible
//!
//! An entry `A` dominates a mask `B` when every line off in `A` is also off in
//! `B`: the smaller outage already explains the larger one. The set keeps only
//! undominated entries, so it holds minimal cut sets and nothing else.

use crate::algorithm::bitset::LineMask;

/// Test if some entry's off-lines are a subset of the mask's off-lines
pub fn is_subsumed(mask: &LineMask, excluded: &[LineMask]) -> bool {
    excluded.iter().any(|entry| entry.off_subset_of(mask))
}

/// Add a mask unless it is already explained, dropping entries it explains
///
/// Returns whether the mask was added.
pub fn insert(mask: LineMask, excluded: &mut Vec<LineMask>) -> bool {
    if is_subsumed(&mask, excluded) {
        return false;
    }
    excluded.retain(|entry| !mask.off_subset_of(entry));
    excluded.push(mask);
    true
}

/// Ordered collection of minimal infeasible outage masks
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    entries: Vec<LineMask>,
}

impl ExclusionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Test if a mask is explained by an entry already present
    pub fn is_subsumed(&self, mask: &LineMask) -> bool {
        is_subsumed(mask, &self.entries)
    }

    /// Record an infeasible mask, keeping the set minimal
    ///
    /// Returns `false` when an existing entry already explains the mask.
    pub fn insert(&mut self, mask: LineMask) -> bool {
        let added = insert(mask, &mut self.entries);
        if added {
            log::debug!("exclusion set now holds {} masks", self.entries.len());
        }
        added
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[LineMask] {
        &self.entries
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, LineMask> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Test if the set holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ExclusionSet {
    type Item = &'a LineMask;
    type IntoIter = std::slice::Iter<'a, LineMask>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
