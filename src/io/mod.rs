/// Command-line parsing and command execution
pub mod cli;
/// Algorithm limits and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Screening progress bars
pub mod progress;
/// JSON reports and flag formatting
pub mod report;
