//! Tests for minimal infeasible outage sets

#[cfg(test)]
mod tests {
    use busflag::algorithm::bitset::LineMask;
    use busflag::algorithm::exclusion::{ExclusionSet, insert, is_subsumed};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn off(lines: &[usize]) -> LineMask {
        LineMask::with_lines_off(8, lines)
    }

    // Tests a superset of a recorded outage is subsumed
    // Verified by comparing on-sets instead of off-sets
    #[test]
    fn test_is_subsumed() {
        let mut set = ExclusionSet::new();
        assert!(set.insert(off(&[1, 3])));

        assert!(set.is_subsumed(&off(&[1, 3])));
        assert!(set.is_subsumed(&off(&[1, 2, 3])));
        assert!(!set.is_subsumed(&off(&[1])));
        assert!(!set.is_subsumed(&off(&[3, 4])));
    }

    // Tests inserting a superset is a no-op
    // Verified by appending without the subsumption check
    #[test]
    fn test_insert_superset_is_noop() {
        let mut set = ExclusionSet::new();
        assert!(set.insert(off(&[2])));
        assert!(!set.insert(off(&[2, 5])));
        assert!(!set.insert(off(&[2])));
        assert_eq!(set.len(), 1);
    }

    // Tests inserting a subset evicts the entries it explains
    // Verified by leaving dominated entries in place
    #[test]
    fn test_insert_subset_evicts() {
        let mut set = ExclusionSet::new();
        set.insert(off(&[1, 2]));
        set.insert(off(&[1, 3]));
        set.insert(off(&[4, 5]));
        assert_eq!(set.len(), 3);

        assert!(set.insert(off(&[1])));
        assert_eq!(set.entries(), &[off(&[4, 5]), off(&[1])]);
        assert_eq!(set.iter().count(), 2);
        assert_eq!((&set).into_iter().count(), 2);
    }

    // Tests the free functions agree with the set methods
    // Verified by retaining evicted entries in the free function
    #[test]
    fn test_free_functions() {
        let mut entries = Vec::new();
        assert!(insert(off(&[0, 6]), &mut entries));
        assert!(insert(off(&[6]), &mut entries));
        assert_eq!(entries, vec![off(&[6])]);
        assert!(is_subsumed(&off(&[6, 7]), &entries));
        assert!(!is_subsumed(&off(&[0]), &entries));
    }

    // Tests random insertions keep the set minimal and covering
    // Verified by skipping eviction on insert
    #[test]
    fn test_random_insertions_stay_minimal() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut set = ExclusionSet::new();
        let mut inserted = Vec::new();

        for _ in 0..300 {
            let count = rng.random_range(1..=3);
            let lines: Vec<usize> = (0..count).map(|_| rng.random_range(0..8)).collect();
            let mask = off(&lines);
            set.insert(mask.clone());
            inserted.push(mask);
        }

        assert!(!set.is_empty());
        for (i, a) in set.iter().enumerate() {
            for (j, b) in set.iter().enumerate() {
                if i != j {
                    assert!(!a.off_subset_of(b), "{a} dominates {b}");
                }
            }
        }
        for mask in &inserted {
            assert!(set.is_subsumed(mask), "{mask} is not covered");
        }
    }
}
