//! One substation: its slot layout, current bus flag and validity cache

use crate::algorithm::adjacency::AdjacencyModel;
use crate::algorithm::bitset::LineMask;
use crate::algorithm::cache::{CacheStats, ValidityCache};
use crate::algorithm::validity::BusLayout;
use crate::io::configuration::MAX_SUBSTATION_ELEMENTS;
use crate::io::error::{GridError, Result};
use crate::math::bitmask::{bit_is_set, full_mask};
use crate::topology::element::{Bus, Element, ElementKind};

/// A substation whose elements are split across two buses
///
/// Slot order is significant: element `i` is bit `i` of every bus flag.
/// The nominal flag puts every element on bus 1.
#[derive(Debug)]
pub struct Substation {
    id: usize,
    elements: Vec<Element>,
    current: u32,
    cache: ValidityCache,
}

impl Substation {
    /// Build a substation and its validity cache
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SubstationTooLarge`] if the element count exceeds
    /// [`MAX_SUBSTATION_ELEMENTS`]
    pub fn new(id: usize, elements: Vec<Element>) -> Result<Self> {
        if elements.len() > MAX_SUBSTATION_ELEMENTS {
            return Err(GridError::SubstationTooLarge {
                substation: id,
                elements: elements.len(),
                max: MAX_SUBSTATION_ELEMENTS,
            });
        }

        let positions_where = |keep: fn(ElementKind) -> bool| -> Vec<usize> {
            elements
                .iter()
                .enumerate()
                .filter(|(_, element)| keep(element.kind))
                .map(|(position, _)| position)
                .collect()
        };
        let layout = BusLayout::new(
            elements.len(),
            positions_where(|kind| kind == ElementKind::Generator),
            positions_where(|kind| kind == ElementKind::Load),
            positions_where(ElementKind::is_line),
        );

        let cache = ValidityCache::new(layout);
        let current = full_mask(elements.len());

        Ok(Self {
            id,
            elements,
            current,
            cache,
        })
    }

    /// Substation id
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Elements in slot order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of slots
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Current bus flag
    pub const fn current_bus_config(&self) -> u32 {
        self.current
    }

    /// Bus currently holding the element in `position`
    pub fn bus_of(&self, position: usize) -> Option<Bus> {
        (position < self.elements.len())
            .then(|| Bus::from_flag_bit(bit_is_set(self.current, position)))
    }

    /// Slots holding elements of one kind, in ascending order
    pub fn local_indices_of_kind(&self, kind: ElementKind) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.kind == kind)
            .map(|(position, _)| position)
            .collect()
    }

    /// Slots holding line endpoints of either direction, in ascending order
    pub fn local_line_indices(&self) -> &[usize] {
        self.cache.layout().line_positions()
    }

    /// Set the current flag without validating it
    pub const fn set_bus_config(&mut self, flag: u32) {
        self.current = flag;
    }

    /// Local disconnected-line mask for a global line state
    ///
    /// Bit `i` is set when the `i`-th local line slot carries a line whose
    /// global bit in `lines` is clear.
    pub fn disconnected_mask(&self, lines: &LineMask) -> u32 {
        self.local_line_indices()
            .iter()
            .enumerate()
            .filter(|&(_, &position)| {
                self.elements
                    .get(position)
                    .and_then(Element::line_id)
                    .is_some_and(|line| !lines.is_on(line))
            })
            .fold(0, |mask, (ordinal, _)| mask | (1_u32 << ordinal))
    }

    /// Test if the current flag is legal under a line state
    pub fn is_valid(&mut self, lines: &LineMask) -> bool {
        self.is_flag_valid(self.current, lines)
    }

    /// Test if an arbitrary flag is legal under a line state
    pub fn is_flag_valid(&mut self, flag: u32, lines: &LineMask) -> bool {
        let disconnected = self.disconnected_mask(lines);
        self.cache.is_valid(flag, disconnected)
    }

    /// Every legal flag under a line state, highest first
    pub fn enumerate_valid_assignments(&mut self, lines: &LineMask) -> Vec<u32> {
        let disconnected = self.disconnected_mask(lines);
        self.cache
            .admissible_flags()
            .into_iter()
            .filter(|&flag| self.cache.is_valid(flag, disconnected))
            .collect()
    }

    /// Switch to a new flag and re-wire the network graph to match
    ///
    /// The flag is validated against the adjacency model's current line state.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidAssignment`] if the flag is illegal, or
    /// [`GridError::InvalidParameter`] if the graph does not place this
    /// substation's elements here; neither the substation nor the graph is
    /// modified in either case
    pub fn apply(&mut self, flag: u32, adjacency: &mut AdjacencyModel) -> Result<()> {
        if !self.is_flag_valid(flag, adjacency.line_mask()) {
            return Err(GridError::InvalidAssignment {
                substation: self.id,
                flag,
                width: self.elements.len(),
            });
        }

        let (on_one, on_zero): (Vec<(usize, Element)>, Vec<(usize, Element)>) = self
            .elements
            .iter()
            .copied()
            .enumerate()
            .partition(|&(position, _)| bit_is_set(flag, position));
        let on_one: Vec<Element> = on_one.into_iter().map(|(_, element)| element).collect();
        let on_zero: Vec<Element> = on_zero.into_iter().map(|(_, element)| element).collect();

        // Both halves are checked before either is moved
        adjacency.check_elements_at(self.id, &on_one)?;
        adjacency.check_elements_at(self.id, &on_zero)?;
        adjacency.assign_elements_to_bus(self.id, Bus::One, &on_one)?;
        adjacency.assign_elements_to_bus(self.id, Bus::Zero, &on_zero)?;

        log::debug!(
            "substation {}: 0b{:0width$b} -> 0b{flag:0width$b}",
            self.id,
            self.current,
            width = self.elements.len()
        );
        self.current = flag;
        Ok(())
    }

    /// Hit and miss counts of the validity cache
    pub const fn cache_stats(&self) -> &CacheStats {
        &self.cache.stats
    }

    /// Test if the validity table was precomputed
    pub const fn has_dense_cache(&self) -> bool {
        self.cache.is_dense()
    }
}
