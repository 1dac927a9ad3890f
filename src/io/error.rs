//! Error types for topology construction and bus reassignment

use crate::topology::element::Element;
use std::fmt;
use std::path::PathBuf;

/// Main error type for all grid operations
#[derive(Debug)]
pub enum GridError {
    /// Two elements claim the same substation slot
    MalformedTopology {
        /// Substation holding the slot
        substation: usize,
        /// Local slot index
        position: usize,
        /// Element already placed in the slot
        existing: Element,
        /// Element that tried to take the slot
        incoming: Element,
    },

    /// A substation slot was declared but nothing was placed in it
    MissingElement {
        /// Substation holding the slot
        substation: usize,
        /// Local slot index
        position: usize,
    },

    /// Reference to a substation that does not exist
    UnknownSubstation {
        /// Requested substation id
        substation: usize,
        /// Number of substations in the grid
        substations: usize,
    },

    /// Substation has more elements than a bus flag can enumerate
    SubstationTooLarge {
        /// Substation id
        substation: usize,
        /// Number of elements found
        elements: usize,
        /// Largest supported element count
        max: usize,
    },

    /// Bus flag rejected by the validity rules
    ///
    /// Non-fatal: the substation and the adjacency model keep their prior state.
    InvalidAssignment {
        /// Substation the flag was meant for
        substation: usize,
        /// Rejected flag
        flag: u32,
        /// Element count of the substation
        width: usize,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Grid description could not be parsed
    Parse {
        /// File the description came from
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedTopology {
                substation,
                position,
                existing,
                incoming,
            } => {
                write!(
                    f,
                    "Substation {substation} slot {position} is already filled by {existing} (cannot place {incoming})"
                )
            }
            Self::MissingElement {
                substation,
                position,
            } => {
                write!(f, "Substation {substation} slot {position} is empty")
            }
            Self::UnknownSubstation {
                substation,
                substations,
            } => {
                write!(
                    f,
                    "Substation {substation} does not exist (grid has {substations})"
                )
            }
            Self::SubstationTooLarge {
                substation,
                elements,
                max,
            } => {
                write!(
                    f,
                    "Substation {substation} has {elements} elements (max: {max})"
                )
            }
            Self::InvalidAssignment {
                substation,
                flag,
                width,
            } => {
                let width = *width;
                write!(
                    f,
                    "Bus assignment 0b{flag:0width$b} is not valid for substation {substation}"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse grid description '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for grid results
pub type Result<T> = std::result::Result<T, GridError>;

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl GridError {
    /// Test if the error is a rejected bus assignment rather than a fault
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidAssignment { .. })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GridError {
    GridError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to a path
pub fn file_system_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> GridError {
    GridError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
