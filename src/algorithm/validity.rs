//! Rule evaluation for two-bus partitions of a substation
//!
//! A flag is legal when it is the canonical representative of its partition,
//! leaves no bus with a single element, does not strand generators or loads
//! on a bus without a live line, and keeps disconnected lines on bus 1 in a
//! way that stays consistent once those lines are removed from the bitset.

use crate::math::bitmask::{bit_is_set, full_mask, mask_from_positions, remove_bit};
use crate::topology::element::Bus;
use std::fmt;

/// Local positions that cannot carry a transmission path by themselves
#[derive(Clone, Copy, Debug, Default)]
pub struct BusExternals<'a> {
    /// Slots holding generators
    pub generators: &'a [usize],
    /// Slots holding loads
    pub loads: &'a [usize],
    /// Slots holding switched-off line endpoints
    pub disconnected: &'a [usize],
}

impl<'a> BusExternals<'a> {
    /// Group the external and disconnected positions of a substation
    pub const fn new(
        generators: &'a [usize],
        loads: &'a [usize],
        disconnected: &'a [usize],
    ) -> Self {
        Self {
            generators,
            loads,
            disconnected,
        }
    }

    fn mask(&self) -> u32 {
        let positions: Vec<usize> = self
            .generators
            .iter()
            .chain(self.loads)
            .chain(self.disconnected)
            .copied()
            .collect();
        mask_from_positions(&positions)
    }
}

/// First rule a flag breaks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusRejection {
    /// The last element is not on bus 1, or bits are set beyond the substation
    Symmetry,
    /// A bus holds exactly one element
    SingleElementBus {
        /// Elements on bus 1
        ones: u32,
        /// Elements on bus 0
        zeros: u32,
    },
    /// A bus holds only generators, loads and disconnected lines
    IslandedExternals {
        /// The stranded bus
        bus: Bus,
    },
    /// A disconnected line sits on bus 0
    DisconnectedOnBusZero {
        /// Slot of the offending line
        position: usize,
    },
    /// Removing a disconnected line leaves an illegal smaller partition
    InconsistentAfterRemoval {
        /// Slot whose removal exposed the problem
        position: usize,
    },
}

impl fmt::Display for BusRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symmetry => write!(f, "leading element is not on bus 1"),
            Self::SingleElementBus { ones, zeros } => {
                write!(f, "{ones} element(s) on bus 1 and {zeros} on bus 0")
            }
            Self::IslandedExternals { bus } => write!(f, "islanded externals on {bus}"),
            Self::DisconnectedOnBusZero { position } => {
                write!(f, "disconnected line at slot {position} is not on bus 1")
            }
            Self::InconsistentAfterRemoval { position } => {
                write!(f, "partition is illegal once slot {position} is removed")
            }
        }
    }
}

/// Check a flag against every bus rule, reporting the first one it breaks
///
/// `width` is the number of elements at the substation. Rules are applied in
/// order and evaluation stops at the first failure.
///
/// # Errors
///
/// Returns the [`BusRejection`] describing the first rule the flag breaks
pub fn evaluate_bus_state(
    flag: u32,
    width: usize,
    externals: &BusExternals<'_>,
) -> Result<(), BusRejection> {
    // Highest set bit must be exactly the last element
    if width == 0 || width > u32::BITS as usize || flag >> (width - 1) != 1 {
        return Err(BusRejection::Symmetry);
    }

    let ones = flag.count_ones();
    let zeros = width as u32 - ones;
    if width > 1 && (ones == 1 || zeros == 1) {
        return Err(BusRejection::SingleElementBus { ones, zeros });
    }

    let stranded = externals.mask();
    if stranded != 0 {
        if flag != 0 && flag & stranded == flag {
            return Err(BusRejection::IslandedExternals { bus: Bus::One });
        }

        let inverted = full_mask::<u32>(width) & !flag;
        if inverted != 0 && inverted & stranded == inverted {
            return Err(BusRejection::IslandedExternals { bus: Bus::Zero });
        }
    }

    if let Some(&position) = externals
        .disconnected
        .iter()
        .find(|&&position| !bit_is_set(flag, position))
    {
        return Err(BusRejection::DisconnectedOnBusZero { position });
    }

    if externals.disconnected.is_empty() {
        return Ok(());
    }

    // Descending order keeps the remaining positions valid after each removal
    let mut removal_order = externals.disconnected.to_vec();
    removal_order.sort_unstable_by(|a, b| b.cmp(a));
    removal_order.dedup();

    let mut reduced = flag;
    for (removed, &position) in removal_order.iter().enumerate() {
        reduced = remove_bit(reduced, position);
        let reduced_width = width - 1 - removed;
        if evaluate_bus_state(reduced, reduced_width, &BusExternals::default()).is_err() {
            return Err(BusRejection::InconsistentAfterRemoval { position });
        }
    }

    Ok(())
}

/// Decide whether a flag is a legal bus assignment
pub fn is_valid_bus_state(flag: u32, width: usize, externals: &BusExternals<'_>) -> bool {
    match evaluate_bus_state(flag, width, externals) {
        Ok(()) => true,
        Err(rejection) => {
            log::trace!("excluding 0b{flag:0width$b}: {rejection}");
            false
        }
    }
}

/// Slot roles of one substation, as far as the bus rules are concerned
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusLayout {
    width: usize,
    generators: Vec<usize>,
    loads: Vec<usize>,
    lines: Vec<usize>,
}

impl BusLayout {
    /// Describe a substation of `width` slots
    ///
    /// `lines` lists line-endpoint slots in ascending order; bit `i` of a
    /// disconnected mask refers to `lines[i]`.
    pub const fn new(
        width: usize,
        generators: Vec<usize>,
        loads: Vec<usize>,
        lines: Vec<usize>,
    ) -> Self {
        Self {
            width,
            generators,
            loads,
            lines,
        }
    }

    /// Number of slots
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of line-endpoint slots
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Slots holding line endpoints
    pub fn line_positions(&self) -> &[usize] {
        &self.lines
    }

    /// Slots holding generators
    pub fn generator_positions(&self) -> &[usize] {
        &self.generators
    }

    /// Slots holding loads
    pub fn load_positions(&self) -> &[usize] {
        &self.loads
    }

    /// Translate a disconnected-line mask into slot positions
    pub fn disconnected_positions(&self, disconnected: u32) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|&(ordinal, _)| bit_is_set(disconnected, ordinal))
            .map(|(_, &position)| position)
            .collect()
    }

    /// Evaluate the bus rules for a flag with the given lines disconnected
    pub fn evaluate(&self, flag: u32, disconnected: u32) -> bool {
        let disconnected_positions = self.disconnected_positions(disconnected);
        let externals =
            BusExternals::new(&self.generators, &self.loads, &disconnected_positions);
        is_valid_bus_state(flag, self.width, &externals)
    }
}
