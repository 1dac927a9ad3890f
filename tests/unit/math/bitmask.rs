//! Tests for bitmask construction and single-bit removal

#[cfg(test)]
mod tests {
    use busflag::math::bitmask::{bit_is_set, full_mask, mask_from_positions, remove_bit};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn naive_remove_bit(flag: u32, position: usize) -> u32 {
        let mut result = 0;
        let mut target = 0;
        for bit in 0..32 {
            if bit == position {
                continue;
            }
            if flag & (1 << bit) != 0 {
                result |= 1 << target;
            }
            target += 1;
        }
        result
    }

    // Tests full masks at zero, small and saturating widths
    // Verified by returning one bit too many for small widths
    #[test]
    fn test_full_mask_widths() {
        assert_eq!(full_mask::<u32>(0), 0);
        assert_eq!(full_mask::<u32>(3), 0b111);
        assert_eq!(full_mask::<u32>(32), u32::MAX);
        assert_eq!(full_mask::<u8>(40), u8::MAX);
    }

    // Tests bit lookup inside and beyond the type width
    // Verified by dropping the width guard
    #[test]
    fn test_bit_is_set() {
        assert!(bit_is_set(0b100_u32, 2));
        assert!(!bit_is_set(0b100_u32, 1));
        assert!(!bit_is_set(u32::MAX, 32));
    }

    // Tests packing positions ignores out-of-range entries
    // Verified by shifting with wrapping arithmetic
    #[test]
    fn test_mask_from_positions() {
        assert_eq!(mask_from_positions::<u32>(&[0, 2, 3]), 0b1101);
        assert_eq!(mask_from_positions::<u32>(&[1, 1]), 0b10);
        assert_eq!(mask_from_positions::<u32>(&[1, 40]), 0b10);
    }

    // Tests the documented removal example
    // Verified by adding instead of shifting the upper bits
    #[test]
    fn test_remove_bit_example() {
        assert_eq!(remove_bit(0b1011_u32, 1), 0b101);
        assert_eq!(remove_bit(0b1011_u32, 3), 0b011);
        assert_eq!(remove_bit(0b1011_u32, 0), 0b101);
    }

    // Tests positions above the highest set bit return the flag unchanged
    // Verified by removing the early return
    #[test]
    fn test_remove_bit_above_flag() {
        assert_eq!(remove_bit(0b11_u32, 5), 0b11);
        assert_eq!(remove_bit(0b11_u32, 40), 0b11);
        assert_eq!(remove_bit(0_u32, 0), 0);
    }

    // Tests removal of a clear bit keeps the bits below it
    // Verified by computing the lower part as flag minus the upper part
    #[test]
    fn test_remove_clear_bit() {
        assert_eq!(remove_bit(0b1001_u32, 1), 0b101);
        assert_eq!(remove_bit(0b1101_u32, 1), 0b111);
    }

    // Tests removal against a bit-by-bit reference on random flags
    // Verified by off-by-one in the upper shift amount
    #[test]
    fn test_remove_bit_matches_reference() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let flag: u32 = rng.random();
            let position = rng.random_range(0..32);
            if (1_u32 << position) > flag {
                continue;
            }
            assert_eq!(
                remove_bit(flag, position),
                naive_remove_bit(flag, position),
                "flag {flag:#b} position {position}"
            );
        }
    }
}
