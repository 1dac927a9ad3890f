//! Serializable description of the network and per-substation slot layout
//!
//! The description carries, for every line, generator and load, the substation it
//! connects to and the local slot it occupies there. Slot order defines bit order
//! in every bus flag, so the layout must be complete and collision-free.

use crate::algorithm::bitset::LineMask;
use crate::io::error::{GridError, Result, file_system_error, invalid_parameter};
use crate::topology::element::Element;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A substation slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Substation id
    pub substation: usize,
    /// Local slot index within the substation
    pub position: usize,
}

/// Both ends of a transmission line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDescription {
    /// Origin end
    pub origin: Placement,
    /// Extremity end
    pub extremity: Placement,
}

/// Complete topology of a network
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDescription {
    /// Number of slots at each substation
    pub substation_sizes: Vec<usize>,
    /// Lines, indexed by global line id
    #[serde(default)]
    pub lines: Vec<LineDescription>,
    /// Generators, indexed by global generator id
    #[serde(default)]
    pub generators: Vec<Placement>,
    /// Loads, indexed by global load id
    #[serde(default)]
    pub loads: Vec<Placement>,
    /// Lines switched off in the initial state
    #[serde(default)]
    pub lines_off: Vec<usize>,
}

impl GridDescription {
    /// Parse a description from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Parse`] if the text is not a valid description
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a description from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| file_system_error(path, "read", source))?;
        serde_json::from_str(&text).map_err(|source| GridError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of substations
    pub fn substation_count(&self) -> usize {
        self.substation_sizes.len()
    }

    /// Number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of generators
    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    /// Number of loads
    pub fn load_count(&self) -> usize {
        self.loads.len()
    }

    /// Line state described by `lines_off`
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidParameter`] if a listed line does not exist
    pub fn initial_line_mask(&self) -> Result<LineMask> {
        if let Some(&line) = self.lines_off.iter().find(|&&line| line >= self.line_count()) {
            return Err(invalid_parameter(
                "lines_off",
                &line,
                &format!("grid has {} lines", self.line_count()),
            ));
        }
        Ok(LineMask::with_lines_off(self.line_count(), &self.lines_off))
    }

    /// Build the ordered element list of every substation
    ///
    /// # Errors
    ///
    /// Returns an error if a placement names an unknown substation or a slot
    /// outside the substation, if two elements share a slot
    /// ([`GridError::MalformedTopology`]), or if a slot is left empty
    pub fn element_layout(&self) -> Result<Vec<Vec<Element>>> {
        let mut slots: Vec<Vec<Option<Element>>> = self
            .substation_sizes
            .iter()
            .map(|&size| vec![None; size])
            .collect();

        for (line, description) in self.lines.iter().enumerate() {
            let far = description.extremity;
            let origin =
                Element::line_origin(line).with_far_end(far.substation, far.position);
            self.place(&mut slots, description.origin, origin)?;
        }

        for (line, description) in self.lines.iter().enumerate() {
            let far = description.origin;
            let extremity =
                Element::line_extremity(line).with_far_end(far.substation, far.position);
            self.place(&mut slots, description.extremity, extremity)?;
        }

        for (load, &placement) in self.loads.iter().enumerate() {
            self.place(&mut slots, placement, Element::load(load))?;
        }

        for (generator, &placement) in self.generators.iter().enumerate() {
            self.place(&mut slots, placement, Element::generator(generator))?;
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(substation, substation_slots)| {
                substation_slots
                    .into_iter()
                    .enumerate()
                    .map(|(position, slot)| {
                        slot.ok_or(GridError::MissingElement {
                            substation,
                            position,
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }

    fn place(
        &self,
        slots: &mut [Vec<Option<Element>>],
        placement: Placement,
        element: Element,
    ) -> Result<()> {
        let substation_slots =
            slots
                .get_mut(placement.substation)
                .ok_or(GridError::UnknownSubstation {
                    substation: placement.substation,
                    substations: self.substation_count(),
                })?;
        let size = substation_slots.len();
        let slot = substation_slots.get_mut(placement.position).ok_or_else(|| {
            invalid_parameter(
                "position",
                &placement.position,
                &format!(
                    "substation {} has {size} slots ({element})",
                    placement.substation
                ),
            )
        })?;

        if let Some(existing) = *slot {
            return Err(GridError::MalformedTopology {
                substation: placement.substation,
                position: placement.position,
                existing,
                incoming: element,
            });
        }

        *slot = Some(element);
        Ok(())
    }
}
