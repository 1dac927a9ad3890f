//! All substations of a grid plus the shared network graph

use crate::algorithm::adjacency::AdjacencyModel;
use crate::algorithm::bitset::LineMask;
use crate::algorithm::connectivity::ComponentReport;
use crate::algorithm::substation::Substation;
use crate::io::error::{GridError, Result};
use crate::topology::grid::GridDescription;

/// Substation models and the graph they re-wire
///
/// The graph is only mutated through `&mut self`, so bus reassignments and
/// line switching are serialized by the borrow checker.
#[derive(Debug)]
pub struct Network {
    description: GridDescription,
    substations: Vec<Substation>,
    adjacency: AdjacencyModel,
}

impl Network {
    /// Build every substation and the nominal network graph
    ///
    /// # Errors
    ///
    /// Returns an error if the description has colliding or empty slots,
    /// oversized substations, or references to unknown substations or lines
    pub fn new(description: GridDescription) -> Result<Self> {
        let substations = description
            .element_layout()?
            .into_iter()
            .enumerate()
            .map(|(id, elements)| Substation::new(id, elements))
            .collect::<Result<Vec<_>>>()?;
        let adjacency = AdjacencyModel::new(&description)?;

        log::info!(
            "network: {} substations, {} lines, {} generators, {} loads",
            description.substation_count(),
            description.line_count(),
            description.generator_count(),
            description.load_count()
        );

        Ok(Self {
            description,
            substations,
            adjacency,
        })
    }

    /// Topology the network was built from
    pub const fn description(&self) -> &GridDescription {
        &self.description
    }

    /// All substations, indexed by id
    pub fn substations(&self) -> &[Substation] {
        &self.substations
    }

    /// Mutable access to all substations
    pub fn substations_mut(&mut self) -> &mut [Substation] {
        &mut self.substations
    }

    /// One substation
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownSubstation`] for an unknown id
    pub fn substation(&self, id: usize) -> Result<&Substation> {
        self.substations.get(id).ok_or(GridError::UnknownSubstation {
            substation: id,
            substations: self.substations.len(),
        })
    }

    /// Network graph
    pub const fn adjacency(&self) -> &AdjacencyModel {
        &self.adjacency
    }

    /// Current line state
    pub const fn line_mask(&self) -> &LineMask {
        self.adjacency.line_mask()
    }

    /// Apply a bus flag to one substation and re-wire the graph
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownSubstation`] for an unknown id and
    /// [`GridError::InvalidAssignment`] if the flag is rejected, in which case
    /// nothing changes
    pub fn apply(&mut self, substation: usize, flag: u32) -> Result<()> {
        let substations = self.substations.len();
        let target = self
            .substations
            .get_mut(substation)
            .ok_or(GridError::UnknownSubstation {
                substation,
                substations,
            })?;
        target.apply(flag, &mut self.adjacency)
    }

    /// Switch a line on or off
    ///
    /// Bus flags are not re-validated; see [`Network::invalid_substations`].
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidParameter`] if the line does not exist
    pub fn switch_line(&mut self, line: usize, on: bool) -> Result<()> {
        self.adjacency.switch_line(line, on)
    }

    /// Legal flags of one substation under the current line state
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownSubstation`] for an unknown id
    pub fn valid_assignments(&mut self, substation: usize) -> Result<Vec<u32>> {
        let substations = self.substations.len();
        let target = self
            .substations
            .get_mut(substation)
            .ok_or(GridError::UnknownSubstation {
                substation,
                substations,
            })?;
        Ok(target.enumerate_valid_assignments(self.adjacency.line_mask()))
    }

    /// Substations whose current flag is illegal under a line state
    pub fn invalid_substations_under(&mut self, lines: &LineMask) -> Vec<usize> {
        self.substations
            .iter_mut()
            .filter_map(|substation| (!substation.is_valid(lines)).then_some(substation.id()))
            .collect()
    }

    /// Substations whose current flag is illegal under the current line state
    pub fn invalid_substations(&mut self) -> Vec<usize> {
        let lines = self.adjacency.line_mask().clone();
        self.invalid_substations_under(&lines)
    }

    /// Connected components of the current graph
    pub fn analyze(&self) -> ComponentReport {
        self.adjacency.find_disjoint_components()
    }
}
