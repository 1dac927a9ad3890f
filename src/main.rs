//! CLI entry point for substation bus assignment checks and outage screening

use busflag::io::cli::{Cli, CommandRunner};
use clap::Parser;

fn main() -> busflag::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp(None)
        .init();

    let mut runner = CommandRunner::new(cli);
    runner.run()
}
