//! Network topology as supplied by the grid description

/// Tagged element identifiers
pub mod element;
/// Grid description and substation slot layout
pub mod grid;

pub use element::{Bus, Element, ElementKind};
pub use grid::GridDescription;
