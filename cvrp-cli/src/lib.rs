//! Command-line interface for the exact CVRP solver.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing::Level;

mod error;
mod solve;

pub use error::CliError;
use solve::{SolveArgs, run_solve};

const ARG_SOLVE_INSTANCE: &str = "instance";
const ARG_SOLVE_DISTANCE_MODE: &str = "distance-mode";
const ARG_SOLVE_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_SOLVE_OSRM_PROFILE: &str = "osrm-profile";
const ARG_SOLVE_MAX_CONCURRENT_REQUESTS: &str = "max-concurrent-requests";
const ARG_SOLVE_SUBTOUR_MODE: &str = "subtour-mode";
const ARG_SOLVE_TRIAL_TIMEOUT_SECS: &str = "trial-timeout-secs";
const ENV_SOLVE_INSTANCE: &str = "CVRP_CMDS_SOLVE_INSTANCE_PATH";

/// Run the CVRP CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose);
    match cli.command {
        Command::Solve(args) => run_solve(args),
    }
}

/// Install a stderr formatter that also receives `log` records from the
/// library crates.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    // An embedding process may have installed its own subscriber already.
    let _already_set = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Parser)]
#[command(
    name = "cvrp",
    about = "Exact capacitated vehicle routing with a minimum fleet",
    version
)]
struct Cli {
    /// Log every trial and cut round.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve an instance file and print the plan as JSON.
    Solve(SolveArgs),
}

#[cfg(test)]
mod tests;
