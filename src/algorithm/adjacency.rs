//! Whole-network graph over substation buses, generators and loads
//!
//! Every substation contributes two bus vertices: bus 1 at `2·s` and bus 0 at
//! `2·s + 1`. Generators follow the bus vertices, then loads. Edges are counted
//! rather than flagged, so parallel lines between the same pair of buses stay
//! distinct when one of them is moved.

use crate::algorithm::bitset::LineMask;
use crate::io::error::{GridError, Result, invalid_parameter};
use crate::topology::element::{Bus, Element, ElementKind};
use crate::topology::grid::{GridDescription, Placement};
use ndarray::Array2;
use serde::Serialize;
use std::fmt;

/// A vertex of the network graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Vertex {
    /// One bus of a substation
    Bus {
        /// Substation id
        substation: usize,
        /// Which of its two buses
        bus: Bus,
    },
    /// A generator
    Generator {
        /// Global generator id
        index: usize,
    },
    /// A load
    Load {
        /// Global load id
        index: usize,
    },
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus { substation, bus } => write!(f, "sub{substation}/{bus}"),
            Self::Generator { index } => write!(f, "gen{index}"),
            Self::Load { index } => write!(f, "load{index}"),
        }
    }
}

/// Current vertex of each end of a line
#[derive(Clone, Copy, Debug)]
struct LineEnds {
    origin_substation: usize,
    extremity_substation: usize,
    origin_vertex: usize,
    extremity_vertex: usize,
}

/// Network graph that follows bus reassignments and line switching
#[derive(Clone, Debug)]
pub struct AdjacencyModel {
    substation_count: usize,
    lines: Vec<LineEnds>,
    generator_substations: Vec<usize>,
    generator_buses: Vec<usize>,
    load_substations: Vec<usize>,
    load_buses: Vec<usize>,
    line_mask: LineMask,
    edges: Array2<u16>,
}

impl AdjacencyModel {
    /// Build the nominal graph with the description's initial line state
    ///
    /// # Errors
    ///
    /// Returns an error if a placement names an unknown substation or
    /// `lines_off` names an unknown line
    pub fn new(description: &GridDescription) -> Result<Self> {
        Self::with_line_mask(description, &description.initial_line_mask()?)
    }

    /// Build the nominal graph with the given lines energised
    ///
    /// Every element starts on bus 1 of its substation.
    ///
    /// # Errors
    ///
    /// Returns an error if a placement names an unknown substation or the
    /// mask width differs from the line count
    pub fn with_line_mask(description: &GridDescription, line_mask: &LineMask) -> Result<Self> {
        let substation_count = description.substation_count();
        if line_mask.len() != description.line_count() {
            return Err(invalid_parameter(
                "line_mask",
                &line_mask.len(),
                &format!("grid has {} lines", description.line_count()),
            ));
        }

        let checked = |placement: &Placement| -> Result<usize> {
            if placement.substation < substation_count {
                Ok(placement.substation)
            } else {
                Err(GridError::UnknownSubstation {
                    substation: placement.substation,
                    substations: substation_count,
                })
            }
        };

        let lines = description
            .lines
            .iter()
            .map(|line| {
                let origin_substation = checked(&line.origin)?;
                let extremity_substation = checked(&line.extremity)?;
                Ok(LineEnds {
                    origin_substation,
                    extremity_substation,
                    origin_vertex: 2 * origin_substation,
                    extremity_vertex: 2 * extremity_substation,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let generator_substations = description
            .generators
            .iter()
            .map(checked)
            .collect::<Result<Vec<_>>>()?;
        let load_substations = description
            .loads
            .iter()
            .map(checked)
            .collect::<Result<Vec<_>>>()?;

        let generator_buses: Vec<usize> = generator_substations.iter().map(|s| 2 * s).collect();
        let load_buses: Vec<usize> = load_substations.iter().map(|s| 2 * s).collect();

        let vertex_count =
            2 * substation_count + generator_substations.len() + load_substations.len();

        let mut model = Self {
            substation_count,
            lines,
            generator_substations,
            generator_buses,
            load_substations,
            load_buses,
            line_mask: line_mask.clone(),
            edges: Array2::zeros((vertex_count, vertex_count)),
        };

        for line in line_mask.on_lines() {
            if let Some(ends) = model.lines.get(line).copied() {
                model.add_edge(ends.origin_vertex, ends.extremity_vertex);
            }
        }
        for generator in 0..model.generator_buses.len() {
            let bus = model.generator_buses.get(generator).copied().unwrap_or(0);
            model.add_edge(model.generator_vertex(generator), bus);
        }
        for load in 0..model.load_buses.len() {
            let bus = model.load_buses.get(load).copied().unwrap_or(0);
            model.add_edge(model.load_vertex(load), bus);
        }

        Ok(model)
    }

    /// Number of substations
    pub const fn substation_count(&self) -> usize {
        self.substation_count
    }

    /// Number of graph vertices
    pub fn vertex_count(&self) -> usize {
        self.edges.nrows()
    }

    /// Current line state
    pub const fn line_mask(&self) -> &LineMask {
        &self.line_mask
    }

    /// Matrix index of a bus vertex
    pub const fn bus_vertex(substation: usize, bus: Bus) -> usize {
        2 * substation + bus.vertex_offset()
    }

    const fn generator_vertex(&self, generator: usize) -> usize {
        2 * self.substation_count + generator
    }

    fn load_vertex(&self, load: usize) -> usize {
        2 * self.substation_count + self.generator_substations.len() + load
    }

    /// Matrix index of a vertex, if it exists in this graph
    pub fn vertex_index(&self, vertex: Vertex) -> Option<usize> {
        let index = match vertex {
            Vertex::Bus { substation, bus } => {
                (substation < self.substation_count).then(|| Self::bus_vertex(substation, bus))
            }
            Vertex::Generator { index } => {
                (index < self.generator_substations.len()).then(|| self.generator_vertex(index))
            }
            Vertex::Load { index } => {
                (index < self.load_substations.len()).then(|| self.load_vertex(index))
            }
        };
        index.filter(|&index| index < self.vertex_count())
    }

    /// Vertex at a matrix index
    pub fn vertex_at(&self, index: usize) -> Option<Vertex> {
        let bus_vertices = 2 * self.substation_count;
        let generators = self.generator_substations.len();
        if index < bus_vertices {
            let bus = if index % 2 == 0 { Bus::One } else { Bus::Zero };
            Some(Vertex::Bus {
                substation: index / 2,
                bus,
            })
        } else if index < bus_vertices + generators {
            Some(Vertex::Generator {
                index: index - bus_vertices,
            })
        } else if index < self.vertex_count() {
            Some(Vertex::Load {
                index: index - bus_vertices - generators,
            })
        } else {
            None
        }
    }

    /// Number of edges between two vertices
    pub fn edge_count(&self, a: Vertex, b: Vertex) -> usize {
        match (self.vertex_index(a), self.vertex_index(b)) {
            (Some(a), Some(b)) => self.edges.get([a, b]).copied().unwrap_or(0) as usize,
            _ => 0,
        }
    }

    /// Number of edge endpoints at a vertex
    pub fn degree(&self, vertex: Vertex) -> usize {
        self.vertex_index(vertex)
            .map_or(0, |index| self.degree_at(index))
    }

    pub(crate) fn degree_at(&self, index: usize) -> usize {
        if index >= self.vertex_count() {
            return 0;
        }
        self.edges
            .row(index)
            .iter()
            .map(|&count| count as usize)
            .sum()
    }

    /// Matrix indices adjacent to a matrix index
    pub(crate) fn neighbors_at(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let row = (index < self.vertex_count()).then(|| self.edges.row(index));
        row.into_iter().flat_map(|row| {
            row.into_iter()
                .enumerate()
                .filter(|&(_, &count)| count > 0)
                .map(|(neighbor, _)| neighbor)
        })
    }

    /// Vertex an element occupies or is carried by
    ///
    /// Generators and loads map to their own vertex. A line endpoint maps to
    /// the bus of its home substation that currently carries the line, or to
    /// `None` while the line is switched off.
    pub fn element_to_vertex(&self, element: &Element) -> Option<Vertex> {
        let index = match element.kind {
            ElementKind::Generator => (element.index < self.generator_substations.len())
                .then(|| self.generator_vertex(element.index)),
            ElementKind::Load => (element.index < self.load_substations.len())
                .then(|| self.load_vertex(element.index)),
            ElementKind::LineOrigin | ElementKind::LineExtremity => {
                let ends = self.lines.get(element.index)?;
                if !self.line_mask.is_on(element.index) {
                    return None;
                }
                Some(if element.kind == ElementKind::LineOrigin {
                    ends.origin_vertex
                } else {
                    ends.extremity_vertex
                })
            }
        };
        index.and_then(|index| self.vertex_at(index))
    }

    fn home_substation(&self, element: &Element) -> Option<usize> {
        match element.kind {
            ElementKind::LineOrigin => self
                .lines
                .get(element.index)
                .map(|ends| ends.origin_substation),
            ElementKind::LineExtremity => self
                .lines
                .get(element.index)
                .map(|ends| ends.extremity_substation),
            ElementKind::Generator => self.generator_substations.get(element.index).copied(),
            ElementKind::Load => self.load_substations.get(element.index).copied(),
        }
    }

    /// Check that every element is connected to `substation`
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidParameter`] naming the first element that
    /// belongs elsewhere
    pub fn check_elements_at(&self, substation: usize, elements: &[Element]) -> Result<()> {
        elements
            .iter()
            .find(|element| self.home_substation(element) != Some(substation))
            .map_or(Ok(()), |stray| {
                Err(invalid_parameter(
                    "element",
                    stray,
                    &format!("not connected to substation {substation}"),
                ))
            })
    }

    /// Move elements of one substation onto one of its buses
    ///
    /// Each element's edge is detached from the other bus of the substation
    /// and attached to `bus`. Lines that are switched off carry no edge; only
    /// their recorded bus changes, so they reattach to `bus` when switched on.
    ///
    /// # Errors
    ///
    /// Returns an error if the substation is unknown or an element is not
    /// connected to it; the graph is unchanged in that case
    pub fn assign_elements_to_bus(
        &mut self,
        substation: usize,
        bus: Bus,
        elements: &[Element],
    ) -> Result<()> {
        if substation >= self.substation_count {
            return Err(GridError::UnknownSubstation {
                substation,
                substations: self.substation_count,
            });
        }
        self.check_elements_at(substation, elements)?;

        let active = Self::bus_vertex(substation, bus);
        let inactive = Self::bus_vertex(substation, bus.other());

        for element in elements {
            match element.kind {
                ElementKind::Generator => {
                    let vertex = self.generator_vertex(element.index);
                    if let Some(current) = self.generator_buses.get_mut(element.index) {
                        let previous = std::mem::replace(current, active);
                        self.move_edge(vertex, previous, active);
                    }
                }
                ElementKind::Load => {
                    let vertex = self.load_vertex(element.index);
                    if let Some(current) = self.load_buses.get_mut(element.index) {
                        let previous = std::mem::replace(current, active);
                        self.move_edge(vertex, previous, active);
                    }
                }
                ElementKind::LineOrigin | ElementKind::LineExtremity => {
                    let energised = self.line_mask.is_on(element.index);
                    let Some(ends) = self.lines.get_mut(element.index) else {
                        continue;
                    };
                    let (current, far) = if element.kind == ElementKind::LineOrigin {
                        (&mut ends.origin_vertex, ends.extremity_vertex)
                    } else {
                        (&mut ends.extremity_vertex, ends.origin_vertex)
                    };
                    if *current != inactive && *current != active {
                        continue;
                    }
                    let previous = std::mem::replace(current, active);
                    if energised {
                        self.move_edge(far, previous, active);
                    } else {
                        // No edge to move; the line reattaches here when switched on
                        log::debug!("{element} at substation {substation} is switched off");
                    }
                }
            }
        }

        Ok(())
    }

    /// Energise or de-energise a line
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidParameter`] if the line does not exist
    pub fn switch_line(&mut self, line: usize, on: bool) -> Result<()> {
        let Some(ends) = self.lines.get(line).copied() else {
            return Err(invalid_parameter(
                "line",
                &line,
                &format!("grid has {} lines", self.lines.len()),
            ));
        };
        if self.line_mask.is_on(line) == on {
            return Ok(());
        }

        if on {
            self.add_edge(ends.origin_vertex, ends.extremity_vertex);
        } else {
            self.remove_edge(ends.origin_vertex, ends.extremity_vertex);
        }
        self.line_mask.set(line, on);
        Ok(())
    }

    /// Bus vertices with no edge at all
    pub fn find_fully_disconnected_buses(&self) -> Vec<Vertex> {
        (0..2 * self.substation_count)
            .filter(|&index| self.degree_at(index) == 0)
            .filter_map(|index| self.vertex_at(index))
            .collect()
    }

    fn move_edge(&mut self, anchor: usize, from: usize, to: usize) {
        if from != to {
            self.remove_edge(anchor, from);
            self.add_edge(anchor, to);
        }
    }

    fn add_edge(&mut self, a: usize, b: usize) {
        if let Some(count) = self.edges.get_mut([a, b]) {
            *count = count.saturating_add(1);
        }
        if a != b {
            if let Some(count) = self.edges.get_mut([b, a]) {
                *count = count.saturating_add(1);
            }
        }
    }

    fn remove_edge(&mut self, a: usize, b: usize) {
        if let Some(count) = self.edges.get_mut([a, b]) {
            *count = count.saturating_sub(1);
        }
        if a != b {
            if let Some(count) = self.edges.get_mut([b, a]) {
                *count = count.saturating_sub(1);
            }
        }
    }
}
