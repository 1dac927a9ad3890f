//! Command-line interface for inspecting substations and screening outages

use crate::algorithm::contingency::{ContingencyScreen, ScreenSummary, scenario_count};
use crate::algorithm::network::Network;
use crate::io::configuration::DEFAULT_MAX_OUTAGES;
use crate::io::error::{Result, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::io::report::{
    AssignmentOutcome, NetworkReport, ScreenReport, SubstationsReport, format_flag, parse_flag,
    write_report,
};
use crate::topology::grid::GridDescription;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "busflag")]
#[command(
    author,
    version,
    about = "Validate substation bus assignments and screen line outages"
)]
/// Command-line arguments for the bus assignment tool
pub struct Cli {
    /// Action to perform
    #[command(subcommand)]
    pub command: Command,

    /// Write the JSON report to a file instead of stdout
    #[arg(short, long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output and non-error logging
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter implied by `--quiet` and `-v`
    ///
    /// `RUST_LOG` still takes precedence when set.
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every substation with its legal bus assignments
    Substations(GridArgs),

    /// Apply bus assignments and report connected components
    Analyze {
        /// Grid to load
        #[command(flatten)]
        grid: GridArgs,

        /// Bus assignment to apply, in order (repeatable)
        #[arg(short, long = "assign", value_name = "SUB=FLAG", value_parser = parse_assignment)]
        assignments: Vec<Assignment>,
    },

    /// Screen combinations of line outages for infeasibility
    Screen {
        /// Grid to load
        #[command(flatten)]
        grid: GridArgs,

        /// Largest number of simultaneous outages
        #[arg(short = 'k', long, default_value_t = DEFAULT_MAX_OUTAGES)]
        max_outages: usize,
    },
}

/// Grid file plus line state overrides
#[derive(Args, Debug, Clone)]
pub struct GridArgs {
    /// Grid description JSON file
    #[arg(value_name = "GRID")]
    pub grid: PathBuf,

    /// Lines to switch off in addition to those listed in the file
    #[arg(long, value_delimiter = ',', value_name = "LINES")]
    pub lines_off: Vec<usize>,
}

impl GridArgs {
    /// Load the grid and build the network with the extra lines switched off
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// description is malformed
    pub fn load_network(&self) -> Result<Network> {
        let mut description = GridDescription::load(&self.grid)?;
        description.lines_off.extend_from_slice(&self.lines_off);
        description.lines_off.sort_unstable();
        description.lines_off.dedup();
        Network::new(description)
    }
}

/// One `SUB=FLAG` request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// Target substation
    pub substation: usize,
    /// Bus flag to apply
    pub flag: u32,
}

/// Parse `SUB=FLAG`, with the flag in binary
///
/// # Errors
///
/// Returns [`GridError::InvalidParameter`] if either side is malformed
pub fn parse_assignment(text: &str) -> Result<Assignment> {
    let (substation, flag) = text
        .split_once('=')
        .ok_or_else(|| invalid_parameter("assignment", &text, &"expected SUB=FLAG"))?;
    let substation = substation
        .trim()
        .parse()
        .map_err(|err| invalid_parameter("assignment", &text, &err))?;
    Ok(Assignment {
        substation,
        flag: parse_flag(flag)?,
    })
}

/// Runs one parsed command and writes its report
pub struct CommandRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl CommandRunner {
    /// Create a runner for parsed arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Execute the command
    ///
    /// Rejected bus assignments are reported, not returned as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the grid, running the screen or writing the
    /// report fails
    pub fn run(&mut self) -> Result<()> {
        let output = self.cli.output.clone();
        match &self.cli.command {
            Command::Substations(grid) => {
                let mut network = grid.load_network()?;
                let report = SubstationsReport::collect(&mut network);
                write_report(&report, output.as_deref())
            }
            Command::Analyze { grid, assignments } => {
                let mut network = grid.load_network()?;
                let outcomes = Self::apply_assignments(&mut network, assignments)?;
                let report = NetworkReport::collect(&mut network, outcomes);
                write_report(&report, output.as_deref())
            }
            Command::Screen { grid, max_outages } => {
                let screen = ContingencyScreen::new(*max_outages)?;
                let mut network = grid.load_network()?;
                let summary =
                    Self::screen(&mut self.progress_manager, &screen, &mut network);
                let report = ScreenReport::from_summary(screen.max_outages(), summary);
                write_report(&report, output.as_deref())
            }
        }
    }

    fn apply_assignments(
        network: &mut Network,
        assignments: &[Assignment],
    ) -> Result<Vec<AssignmentOutcome>> {
        let mut outcomes = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let width = network.substation(assignment.substation)?.element_count();
            let outcome = match network.apply(assignment.substation, assignment.flag) {
                Ok(()) => AssignmentOutcome {
                    substation: assignment.substation,
                    flag: format_flag(assignment.flag, width),
                    accepted: true,
                    reason: None,
                },
                Err(err) if err.is_rejection() => {
                    log::warn!("{err}");
                    AssignmentOutcome {
                        substation: assignment.substation,
                        flag: format_flag(assignment.flag, width),
                        accepted: false,
                        reason: Some(err.to_string()),
                    }
                }
                Err(err) => return Err(err),
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    fn screen(
        progress_manager: &mut Option<ProgressManager>,
        screen: &ContingencyScreen,
        network: &mut Network,
    ) -> ScreenSummary {
        let candidates = network.line_mask().on_count();

        if let Some(pm) = progress_manager.as_mut() {
            let per_depth: Vec<usize> = (1..=screen.max_outages().min(candidates))
                .map(|depth| {
                    scenario_count(candidates, depth) - scenario_count(candidates, depth - 1)
                })
                .collect();
            pm.initialize(&per_depth);
        }

        let summary = screen.run(network, |progress| {
            if let Some(pm) = progress_manager.as_mut() {
                pm.update(progress);
            }
        });

        if let Some(pm) = progress_manager.as_ref() {
            pm.finish();
        }

        summary
    }
}
