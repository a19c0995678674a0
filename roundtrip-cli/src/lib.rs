//! Command-line interface for the Roundtrip tour planner.
//!
//! `roundtrip geocode` annotates a location file with coordinates and
//! `roundtrip solve` prints the shortest round trip it can find. Options
//! come from CLI flags, configuration files or `ROUNDTRIP_*` environment
//! variables, layered with `ortho_config`.
#![forbid(unsafe_code)]

use clap::{ArgAction, Parser, Subcommand};
use env_logger::{Env, Target};
use log::LevelFilter;

mod error;
mod geocode;
mod geocoder;
mod solve;

pub use error::CliError;

use geocode::{GeocodeArgs, run_geocode};
use solve::{SolveArgs, run_solve};

pub(crate) const ARG_INPUT: &str = "input";
pub(crate) const ARG_START: &str = "start";
pub(crate) const ENV_GEOCODE_INPUT: &str = "ROUNDTRIP_CMDS_GEOCODE_INPUT";
pub(crate) const ENV_SOLVE_INPUT: &str = "ROUNDTRIP_CMDS_SOLVE_INPUT";
pub(crate) const ENV_SOLVE_START: &str = "ROUNDTRIP_CMDS_SOLVE_START";

/// Run the Roundtrip CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns the first failure of argument parsing, configuration loading or
/// the chosen command.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose)?;
    match cli.command {
        Command::Geocode(args) => run_geocode(args),
        Command::Solve(args) => run_solve(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "roundtrip",
    about = "Plan the shortest round trip through a list of addresses",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add coordinates to a location file.
    Geocode(GeocodeArgs),
    /// Solve the round trip for a location file.
    Solve(SolveArgs),
}

/// Log level requested by repeated `-v` flags, if any.
const fn verbosity_filter(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

/// Install the stderr logger.
///
/// Explicit `-v` flags win; otherwise `RUST_LOG` applies on top of a `warn`
/// default.
fn init_logging(verbose: u8) -> Result<(), CliError> {
    let mut builder = env_logger::Builder::new();
    builder
        .target(Target::Stderr)
        .format_timestamp(None)
        .filter_level(LevelFilter::Warn);
    match verbosity_filter(verbose) {
        Some(level) => {
            builder.filter_level(level);
        }
        None => {
            builder.parse_env(Env::default());
        }
    }
    builder.try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests;
