//! Mathematical utilities for the algorithm

/// Integer bitmask construction and bit removal
pub mod bitmask;
