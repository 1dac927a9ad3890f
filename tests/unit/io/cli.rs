//! Tests for command-line parsing and command execution

#[cfg(test)]
mod tests {
    use crate::unit::RING_GRID;
    use busflag::GridError;
    use busflag::io::cli::{Assignment, Cli, Command, CommandRunner, GridArgs, parse_assignment};
    use busflag::io::configuration::DEFAULT_MAX_OUTAGES;
    use clap::Parser;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn grid_file() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ring.json");
        std::fs::write(&path, RING_GRID).expect("write grid");
        (dir, path)
    }

    fn run(args: &[&str]) -> busflag::Result<()> {
        let cli = Cli::try_parse_from(args).expect("arguments parse");
        CommandRunner::new(cli).run()
    }

    fn read_json(path: &Path) -> serde_json::Value {
        let text = std::fs::read_to_string(path).expect("report is readable");
        serde_json::from_str(&text).expect("report is JSON")
    }

    // Tests substations command parsing with comma separated lines
    // Verified by removing the value delimiter
    #[test]
    fn test_parse_substations() {
        let cli = Cli::parse_from(["busflag", "substations", "grid.json", "--lines-off", "1,4"]);
        assert!(matches!(
            cli.command,
            Command::Substations(GridArgs { ref grid, ref lines_off })
                if *grid == PathBuf::from("grid.json") && *lines_off == vec![1, 4]
        ));
        assert!(cli.output.is_none());
        assert!(!cli.quiet);
    }

    // Tests analyze command collects assignments in order
    // Verified by parsing the flag as decimal
    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from([
            "busflag", "-vv", "analyze", "grid.json", "-a", "1=0b1100", "--assign", "0=111",
        ]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Analyze { ref assignments, .. } if *assignments == vec![
                Assignment { substation: 1, flag: 0b1100 },
                Assignment { substation: 0, flag: 0b111 },
            ]
        ));
    }

    // Tests screen command defaults and global flags after the subcommand
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_parse_screen() {
        let cli = Cli::parse_from(["busflag", "screen", "grid.json"]);
        assert!(matches!(
            cli.command,
            Command::Screen { max_outages, .. } if max_outages == DEFAULT_MAX_OUTAGES
        ));

        let cli = Cli::parse_from(["busflag", "screen", "grid.json", "-k", "3", "-q", "-o", "out.json"]);
        assert!(matches!(cli.command, Command::Screen { max_outages: 3, .. }));
        assert!(cli.quiet);
        assert!(!cli.should_show_progress());
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
    }

    // Tests log filter follows verbosity and quiet flags
    // Verified by ignoring the quiet flag
    #[test]
    fn test_log_filter() {
        let filter = |args: &[&str]| Cli::parse_from(args).log_filter();
        assert_eq!(filter(&["busflag", "screen", "g.json"]), "warn");
        assert_eq!(filter(&["busflag", "-v", "screen", "g.json"]), "info");
        assert_eq!(filter(&["busflag", "screen", "g.json", "-vvv"]), "trace");
        assert_eq!(filter(&["busflag", "-vv", "-q", "screen", "g.json"]), "error");
    }

    // Tests malformed assignments are rejected
    // Verified by defaulting a missing flag to zero
    #[test]
    fn test_parse_assignment_errors() {
        for text in ["1", "x=11", "1=2", "=11"] {
            assert!(
                matches!(
                    parse_assignment(text),
                    Err(GridError::InvalidParameter { .. })
                ),
                "{text:?} should be rejected"
            );
        }
        assert!(Cli::try_parse_from(["busflag", "analyze", "g.json", "-a", "oops"]).is_err());
    }

    // Tests extra lines are merged with those in the file
    // Verified by replacing the file's list instead of extending it
    #[test]
    fn test_load_network_merges_lines_off() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ring.json");
        let grid = RING_GRID.replacen('{', r#"{"lines_off": [2],"#, 1);
        std::fs::write(&path, grid).expect("write grid");

        let args = GridArgs {
            grid: path,
            lines_off: vec![2, 0],
        };
        let network = args.load_network().expect("network builds");
        assert_eq!(network.line_mask().off_lines().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(network.description().lines_off, vec![0, 2]);
    }

    // Tests the substations command writes its report
    // Verified by writing to stdout when an output path is given
    #[test]
    fn test_run_substations() {
        let (dir, grid) = grid_file();
        let output = dir.path().join("substations.json");
        run(&[
            "busflag",
            "substations",
            grid.to_str().expect("utf-8 path"),
            "-o",
            output.to_str().expect("utf-8 path"),
        ])
        .expect("command succeeds");

        let value = read_json(&output);
        assert_eq!(value["substations"][1]["valid_assignments"][1], "0b1100");
    }

    // Tests rejected assignments are reported and not fatal
    // Verified by propagating rejections as errors
    #[test]
    fn test_run_analyze_reports_rejection() {
        let (dir, grid) = grid_file();
        let output = dir.path().join("analyze.json");
        run(&[
            "busflag",
            "analyze",
            grid.to_str().expect("utf-8 path"),
            "-a",
            "1=1010",
            "-a",
            "1=1100",
            "-o",
            output.to_str().expect("utf-8 path"),
        ])
        .expect("rejections are not fatal");

        let value = read_json(&output);
        assert_eq!(value["assignments"][0]["accepted"], false);
        assert!(value["assignments"][0]["reason"].is_string());
        assert_eq!(value["assignments"][1]["accepted"], true);
        assert_eq!(value["flags"][1], "0b1100");
        assert_eq!(value["islanded"], false);
    }

    // Tests unknown substations abort the analyze command
    // Verified by reporting unknown substations as rejections
    #[test]
    fn test_run_analyze_unknown_substation() {
        let (_dir, grid) = grid_file();
        let result = run(&[
            "busflag",
            "analyze",
            grid.to_str().expect("utf-8 path"),
            "-a",
            "7=11",
        ]);
        assert!(matches!(
            result,
            Err(GridError::UnknownSubstation { substation: 7, .. })
        ));
    }

    // Tests the screen command in quiet mode
    // Verified by ignoring the max outages argument
    #[test]
    fn test_run_screen() {
        let (dir, grid) = grid_file();
        let output = dir.path().join("screen.json");
        run(&[
            "busflag",
            "screen",
            grid.to_str().expect("utf-8 path"),
            "-k",
            "2",
            "-q",
            "-o",
            output.to_str().expect("utf-8 path"),
        ])
        .expect("screen succeeds");

        let value = read_json(&output);
        assert_eq!(value["evaluated"], 6);
        assert_eq!(value["infeasible"], 3);

        let too_deep = run(&["busflag", "screen", grid.to_str().expect("utf-8 path"), "-k", "9"]);
        assert!(matches!(too_deep, Err(GridError::InvalidParameter { .. })));
    }

    // Tests a missing grid file is a file system error
    // Verified by treating missing files as empty grids
    #[test]
    fn test_run_missing_grid() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("none.json");
        let result = run(&["busflag", "substations", missing.to_str().expect("utf-8 path")]);
        assert!(matches!(result, Err(GridError::FileSystem { .. })));
    }
}
