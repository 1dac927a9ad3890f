//! Bus-splitting validity and connectivity analysis for power-grid substations
//!
//! Each substation's elements are split between two buses by a bit flag. The crate
//! decides which flags are legal under a given line state, re-wires a multigraph of
//! the network when a flag is applied, finds islanded components, and screens
//! combinations of line outages for minimal infeasible sets.

#![forbid(unsafe_code)]

/// Bus validity rules, substation models, network graph and outage screening
pub mod algorithm;
/// Configuration, errors, reports and the command-line interface
pub mod io;
/// Integer bitmask helpers
pub mod math;
/// Grid description and element identifiers
pub mod topology;

pub use algorithm::network::Network;
pub use io::error::{GridError, Result};
pub use topology::grid::GridDescription;
