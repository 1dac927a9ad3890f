//! Disjoint-component analysis of the network graph

use crate::algorithm::adjacency::{AdjacencyModel, Vertex};
use crate::topology::element::Bus;
use bitvec::prelude::*;
use serde::Serialize;
use std::collections::VecDeque;

/// A maximal connected set of vertices
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Lowest-indexed vertex of the component
    pub representative: Vertex,
    /// All vertices of the component, in index order
    pub members: Vec<Vertex>,
}

/// Result of splitting the network graph into connected pieces
///
/// More than one component, or any dropped substation, means the network
/// has islanded. The report only describes the split; deciding whether it
/// is acceptable is left to the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ComponentReport {
    /// Connected components, excluding isolated buses
    pub components: Vec<Component>,
    /// Bus vertices with no edges, treated as benign singletons
    pub isolated_buses: Vec<Vertex>,
    /// Substations whose two buses are both isolated
    pub dropped_substations: Vec<usize>,
}

impl ComponentReport {
    /// Number of reported components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Test if the network has split into separate pieces
    pub fn is_islanded(&self) -> bool {
        self.components.len() > 1 || !self.dropped_substations.is_empty()
    }

    /// Component containing a vertex
    pub fn component_of(&self, vertex: Vertex) -> Option<&Component> {
        self.components
            .iter()
            .find(|component| component.members.contains(&vertex))
    }
}

impl AdjacencyModel {
    /// Split the graph into connected components
    ///
    /// Breadth-first search seeded from the lowest unvisited vertex. Buses with
    /// no edges are set aside as isolated singletons; a substation with both
    /// buses isolated is reported as dropped from the network.
    pub fn find_disjoint_components(&self) -> ComponentReport {
        let vertex_count = self.vertex_count();
        let mut visited = bitvec![0; vertex_count];

        let isolated_buses = self.find_fully_disconnected_buses();
        for &bus in &isolated_buses {
            if let Some(index) = self.vertex_index(bus) {
                visited.set(index, true);
            }
        }

        let dropped_substations: Vec<usize> = (0..self.substation_count())
            .filter(|&substation| {
                [Bus::One, Bus::Zero].iter().all(|&bus| {
                    isolated_buses.contains(&Vertex::Bus { substation, bus })
                })
            })
            .collect();

        let mut components = Vec::new();
        for start in 0..vertex_count {
            if visited.get(start).as_deref() == Some(&true) {
                continue;
            }

            let mut queue = VecDeque::new();
            queue.push_back(start);
            visited.set(start, true);
            let mut members = Vec::new();

            while let Some(index) = queue.pop_front() {
                members.push(index);
                for neighbor in self.neighbors_at(index) {
                    if visited.get(neighbor).as_deref() == Some(&false) {
                        visited.set(neighbor, true);
                        queue.push_back(neighbor);
                    }
                }
            }

            members.sort_unstable();
            let members: Vec<Vertex> = members
                .into_iter()
                .filter_map(|index| self.vertex_at(index))
                .collect();
            if let Some(&representative) = members.first() {
                components.push(Component {
                    representative,
                    members,
                });
            }
        }

        if components.len() > 1 || !dropped_substations.is_empty() {
            log::debug!(
                "network split into {} components ({} dropped substations)",
                components.len(),
                dropped_substations.len()
            );
        }

        ComponentReport {
            components,
            isolated_buses,
            dropped_substations,
        }
    }

    /// Test if the graph forms a single component
    pub fn is_connected(&self) -> bool {
        !self.find_disjoint_components().is_islanded()
    }
}
