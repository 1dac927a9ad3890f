//! Tagged identifiers for everything wired into a substation

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of object occupies a substation slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Origin end of a transmission line
    LineOrigin,
    /// Extremity end of a transmission line
    LineExtremity,
    /// Consumer connected to the substation
    Load,
    /// Generator connected to the substation
    Generator,
}

impl ElementKind {
    /// Test if this kind is one of the two line endpoints
    pub const fn is_line(self) -> bool {
        matches!(self, Self::LineOrigin | Self::LineExtremity)
    }

    /// Test if this kind is a source or sink rather than a line
    pub const fn is_external(self) -> bool {
        matches!(self, Self::Load | Self::Generator)
    }
}

/// One of the two internal buses of a substation
///
/// A set flag bit places an element on [`Bus::One`], a clear bit on [`Bus::Zero`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bus {
    /// Bus selected by a set flag bit; every element starts here
    One,
    /// Bus selected by a clear flag bit
    Zero,
}

impl Bus {
    /// Bus selected by a flag bit
    pub const fn from_flag_bit(set: bool) -> Self {
        if set { Self::One } else { Self::Zero }
    }

    /// The opposite bus
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Zero,
            Self::Zero => Self::One,
        }
    }

    /// Offset of this bus within its substation's vertex pair
    pub const fn vertex_offset(self) -> usize {
        match self {
            Self::One => 0,
            Self::Zero => 1,
        }
    }
}

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "bus 1"),
            Self::Zero => write!(f, "bus 0"),
        }
    }
}

/// Where the other end of a line lands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FarEnd {
    /// Substation at the opposite end of the line
    pub substation: usize,
    /// Slot the line occupies at that substation
    pub position: usize,
}

/// One object physically present at a substation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    /// Element kind
    pub kind: ElementKind,
    /// Index within the global list for this kind (the line id for line endpoints)
    pub index: usize,
    /// Opposite end of the line, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub far_end: Option<FarEnd>,
}

impl Element {
    /// Origin endpoint of line `line`
    pub const fn line_origin(line: usize) -> Self {
        Self {
            kind: ElementKind::LineOrigin,
            index: line,
            far_end: None,
        }
    }

    /// Extremity endpoint of line `line`
    pub const fn line_extremity(line: usize) -> Self {
        Self {
            kind: ElementKind::LineExtremity,
            index: line,
            far_end: None,
        }
    }

    /// Load number `index`
    pub const fn load(index: usize) -> Self {
        Self {
            kind: ElementKind::Load,
            index,
            far_end: None,
        }
    }

    /// Generator number `index`
    pub const fn generator(index: usize) -> Self {
        Self {
            kind: ElementKind::Generator,
            index,
            far_end: None,
        }
    }

    /// Attach the far-end record of a line endpoint
    #[must_use]
    pub const fn with_far_end(mut self, substation: usize, position: usize) -> Self {
        self.far_end = Some(FarEnd {
            substation,
            position,
        });
        self
    }

    /// Global line id, for line endpoints only
    pub const fn line_id(&self) -> Option<usize> {
        if self.kind.is_line() {
            Some(self.index)
        } else {
            None
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            ElementKind::LineOrigin => "origin",
            ElementKind::LineExtremity => "extremity",
            ElementKind::Load => "load",
            ElementKind::Generator => "gen",
        };
        write!(f, "{label}({})", self.index)
    }
}
