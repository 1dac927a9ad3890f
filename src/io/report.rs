//! JSON reports written by the command-line tool

use crate::algorithm::bitset::LineMask;
use crate::algorithm::connectivity::ComponentReport;
use crate::algorithm::contingency::{CutSet, Infeasibility, ScreenSummary};
use crate::algorithm::network::Network;
use crate::algorithm::substation::Substation;
use crate::io::error::{Result, file_system_error, invalid_parameter};
use crate::topology::element::Element;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Render a flag as a zero-padded binary literal, most significant slot first
///
/// ```
/// use busflag::io::report::format_flag;
///
/// assert_eq!(format_flag(0b101, 4), "0b0101");
/// ```
pub fn format_flag(flag: u32, width: usize) -> String {
    format!("0b{flag:0width$b}")
}

/// Parse a binary flag written as `0b1101` or `1101`
///
/// # Errors
///
/// Returns [`crate::GridError::InvalidParameter`] for empty input, non-binary
/// digits, or more than 32 digits
pub fn parse_flag(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0b")
        .or_else(|| trimmed.strip_prefix("0B"))
        .unwrap_or(trimmed)
        .replace('_', "");
    if digits.is_empty() {
        return Err(invalid_parameter("flag", &text, &"no binary digits"));
    }
    u32::from_str_radix(&digits, 2)
        .map_err(|err| invalid_parameter("flag", &text, &err))
}

/// Validity caching figures of one substation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CacheReport {
    /// Whether the table was precomputed
    pub dense: bool,
    /// Lookups answered from the table
    pub hits: usize,
    /// Lookups that ran the rules
    pub misses: usize,
}

/// State and legal assignments of one substation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubstationReport {
    /// Substation id
    pub id: usize,
    /// Elements in slot order
    pub elements: Vec<Element>,
    /// Current bus flag
    pub current_flag: String,
    /// Whether the current flag is legal under the current line state
    pub current_valid: bool,
    /// Legal flags, descending
    pub valid_assignments: Vec<String>,
    /// Validity caching figures
    pub cache: CacheReport,
}

impl SubstationReport {
    /// Collect the report for one substation under the network's line state
    pub fn collect(substation: &mut Substation, lines: &LineMask) -> Self {
        let width = substation.element_count();
        let valid_assignments = substation
            .enumerate_valid_assignments(lines)
            .into_iter()
            .map(|flag| format_flag(flag, width))
            .collect();
        let current_valid = substation.is_valid(lines);
        let stats = substation.cache_stats();

        Self {
            id: substation.id(),
            elements: substation.elements().to_vec(),
            current_flag: format_flag(substation.current_bus_config(), width),
            current_valid,
            valid_assignments,
            cache: CacheReport {
                dense: substation.has_dense_cache(),
                hits: stats.hits,
                misses: stats.misses,
            },
        }
    }
}

/// Outcome of one requested bus assignment
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssignmentOutcome {
    /// Target substation
    pub substation: usize,
    /// Requested flag
    pub flag: String,
    /// Whether the flag was applied
    pub accepted: bool,
    /// Rejection message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Substation listing for the `substations` command
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubstationsReport {
    /// Lines switched off
    pub lines_off: Vec<usize>,
    /// One entry per substation
    pub substations: Vec<SubstationReport>,
}

impl SubstationsReport {
    /// Collect every substation of a network
    pub fn collect(network: &mut Network) -> Self {
        let lines = network.line_mask().clone();
        let substations = network
            .substations_mut()
            .iter_mut()
            .map(|substation| SubstationReport::collect(substation, &lines))
            .collect();
        Self {
            lines_off: lines.off_lines().collect(),
            substations,
        }
    }
}

/// Connectivity report for the `analyze` command
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NetworkReport {
    /// Lines switched off
    pub lines_off: Vec<usize>,
    /// Requested assignments in order
    pub assignments: Vec<AssignmentOutcome>,
    /// Current bus flag per substation
    pub flags: Vec<String>,
    /// Substations whose current flag is illegal
    pub invalid_substations: Vec<usize>,
    /// Whether the network has split
    pub islanded: bool,
    /// Connected components
    pub components: ComponentReport,
}

impl NetworkReport {
    /// Collect the report after the assignments have been applied
    pub fn collect(network: &mut Network, assignments: Vec<AssignmentOutcome>) -> Self {
        let components = network.analyze();
        Self {
            lines_off: network.line_mask().off_lines().collect(),
            assignments,
            flags: network
                .substations()
                .iter()
                .map(|substation| {
                    format_flag(substation.current_bus_config(), substation.element_count())
                })
                .collect(),
            invalid_substations: network.invalid_substations(),
            islanded: components.is_islanded(),
            components,
        }
    }
}

/// Result of the `screen` command
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScreenReport {
    /// Largest outage count screened
    pub max_outages: usize,
    /// Lines already off before screening
    pub lines_off: Vec<usize>,
    /// Infeasibility of the unscreened state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Infeasibility>,
    /// Scenarios evaluated
    pub evaluated: usize,
    /// Scenarios skipped as supersets of a known cut set
    pub pruned: usize,
    /// Number of minimal cut sets
    pub infeasible: usize,
    /// Minimal cut sets in discovery order
    pub cut_sets: Vec<CutSet>,
}

impl ScreenReport {
    /// Convert a screening summary
    pub fn from_summary(max_outages: usize, summary: ScreenSummary) -> Self {
        Self {
            max_outages,
            lines_off: summary.base.off_lines().collect(),
            infeasible: summary.infeasible(),
            baseline: summary.baseline,
            evaluated: summary.evaluated,
            pruned: summary.pruned,
            cut_sets: summary.cut_sets,
        }
    }
}

/// Write a report as pretty JSON to a file, or to stdout when no path is given
///
/// # Errors
///
/// Returns [`crate::GridError::FileSystem`] if the file cannot be created or
/// the report cannot be serialized or written
pub fn write_report<T: Serialize>(report: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|err| file_system_error(path, "create", err))?;
            let mut writer = BufWriter::new(file);
            write_json(&mut writer, report).map_err(|err| file_system_error(path, "write", err))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            write_json(&mut stdout, report)
                .map_err(|err| file_system_error("<stdout>", "write", err))?;
        }
    }
    Ok(())
}

/// Pretty JSON plus a trailing newline; serializer failures surface as I/O errors
fn write_json<W: Write, T: Serialize>(writer: &mut W, report: &T) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    writer.flush()
}
