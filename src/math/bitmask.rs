//! Integer bitmask primitives shared by the validity engine and the substation cache

use num_traits::{PrimInt, Unsigned};

/// Number of bits in the integer type `T`
fn type_width<T: PrimInt>() -> usize {
    T::zero().count_zeros() as usize
}

/// Build the `n`-bit all-ones value
///
/// Saturates to all ones when `n` reaches the width of `T`.
pub fn full_mask<T: PrimInt + Unsigned>(n: usize) -> T {
    if n == 0 {
        T::zero()
    } else if n >= type_width::<T>() {
        T::max_value()
    } else {
        T::one().unsigned_shl(n as u32) - T::one()
    }
}

/// Test whether bit `position` of `flag` is set
pub fn bit_is_set<T: PrimInt + Unsigned>(flag: T, position: usize) -> bool {
    position < type_width::<T>() && flag & T::one().unsigned_shl(position as u32) != T::zero()
}

/// Pack a list of bit positions into a mask, ignoring positions beyond the type width
pub fn mask_from_positions<T: PrimInt + Unsigned>(positions: &[usize]) -> T {
    positions
        .iter()
        .filter(|&&position| position < type_width::<T>())
        .fold(T::zero(), |mask, &position| {
            mask | T::one().unsigned_shl(position as u32)
        })
}

/// Delete bit `position` from `flag`, shifting every higher bit down by one
///
/// The result is one bit narrower than the input. When `1 << position` already
/// exceeds `flag` nothing above the position is set, so `flag` comes back unchanged.
///
/// ```
/// use busflag::math::bitmask::remove_bit;
///
/// assert_eq!(remove_bit(0b1011_u32, 1), 0b101);
/// assert_eq!(remove_bit(0b0011_u32, 7), 0b11);
/// ```
pub fn remove_bit<T: PrimInt + Unsigned>(flag: T, position: usize) -> T {
    let width = type_width::<T>();
    if position >= width {
        return flag;
    }

    let bit = T::one().unsigned_shl(position as u32);
    if bit > flag {
        return flag;
    }

    let bits_above = if position + 1 >= width {
        T::zero()
    } else {
        let shift = position as u32 + 1;
        flag.unsigned_shr(shift).unsigned_shl(shift)
    };
    let bits_below = flag & (bit - T::one());

    bits_above.unsigned_shr(1) + bits_below
}
