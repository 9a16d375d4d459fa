//! Argument parsing tests for the top-level command.

use super::*;
use crate::solve::{DistanceMode, SubtourStrategy};
use rstest::rstest;

#[rstest]
fn solve_parses_positional_instance_and_flags() {
    let cli = Cli::try_parse_from([
        "cvrp",
        "solve",
        "instance.json",
        "--distance-mode",
        "road-network",
        "--subtour-mode",
        "exhaustive",
        "--trial-timeout-secs",
        "30",
    ])
    .expect("arguments should parse");
    assert!(!cli.verbose);
    let Command::Solve(args) = cli.command;
    assert_eq!(
        args.instance_path.as_ref().map(|path| path.as_str()),
        Some("instance.json")
    );
    assert_eq!(args.distance_mode, Some(DistanceMode::RoadNetwork));
    assert_eq!(args.subtour_mode, Some(SubtourStrategy::Exhaustive));
    assert_eq!(args.trial_timeout_secs, Some(30));
    assert_eq!(args.osrm_base_url, None);
}

#[rstest]
#[case::before_subcommand(&["cvrp", "--verbose", "solve", "instance.json"])]
#[case::after_subcommand(&["cvrp", "solve", "instance.json", "-v"])]
fn verbose_is_global(#[case] argv: &[&str]) {
    let cli = Cli::try_parse_from(argv).expect("arguments should parse");
    assert!(cli.verbose);
}

#[rstest]
fn unknown_distance_modes_are_rejected() {
    let err = Cli::try_parse_from(["cvrp", "solve", "instance.json", "--distance-mode", "euclid"])
        .map_err(CliError::from)
        .expect_err("unknown mode");
    assert!(matches!(err, CliError::ArgumentParsing(_)));
}

#[rstest]
fn missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["cvrp"]).is_err());
}
