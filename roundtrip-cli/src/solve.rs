//! Solve command implementation for the Roundtrip CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roundtrip_core::report::{NO_SOLUTION, write_text};
use roundtrip_core::{
    DistanceMatrixBuilder, EnrichError, Location, PlanError, TourPlan, TourSolver,
    UnresolvedPolicy, enrich_locations, plan_tour,
};
use roundtrip_data::store::{load_locations, save_locations};
use roundtrip_solver_insertion::{InsertionSolver, InsertionSolverConfig};
use serde::{Deserialize, Serialize};

use crate::geocode::{cache_path, require_existing};
use crate::geocoder::{
    GeoCoderBuilder, GeocoderOverrides, GeocoderSettings, NominatimGeoCoderBuilder,
};
use crate::{ARG_INPUT, ARG_START, CliError, ENV_SOLVE_INPUT, ENV_SOLVE_START};

/// Tour solver selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SolverKind {
    /// Cheapest insertion followed by 2-opt; deterministic.
    #[default]
    Insertion,
    /// The `vrp-core` metaheuristic.
    Vrp,
}

/// How the tour is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// One stop per line under a header.
    #[default]
    Text,
    /// The full tour plan as pretty-printed JSON.
    Json,
}

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "solve",
    long_about = "Build a great-circle distance matrix for the locations in \
                 a JSON file and print the shortest closed tour found from \
                 the start location. Locations must carry coordinates \
                 unless --geocode is given.",
    about = "Solve the round trip for a location file"
)]
#[ortho_config(prefix = "ROUNDTRIP")]
pub(crate) struct SolveArgs {
    /// Path to the JSON array of location records.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Name of the location the tour starts and ends at.
    #[arg(long, value_name = "name")]
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// Tour solver to run.
    #[arg(long, value_enum, value_name = "solver")]
    #[serde(default)]
    pub(crate) solver: Option<SolverKind>,
    /// Output format.
    #[arg(long, value_enum, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
    /// Geocode locations that lack coordinates before solving, caching the
    /// results in `<input>_with_coords.json`.
    #[arg(long)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) geocode: bool,
    /// Base URL of a Nominatim-compatible service, used with --geocode.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// User agent sent with geocoding requests.
    #[arg(long, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Cap on improving 2-opt moves for the insertion solver.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) max_two_opt_passes: Option<usize>,
    /// Generation limit for the vrp solver.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) max_generations: Option<usize>,
    /// Wall-clock limit in seconds for the vrp solver.
    #[arg(long, value_name = "secs")]
    #[serde(default)]
    pub(crate) max_time_secs: Option<usize>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Solver choice with its tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SolverChoice {
    Insertion(InsertionSolverConfig),
    Vrp {
        max_generations: Option<usize>,
        max_time_secs: Option<usize>,
    },
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) start: String,
    pub(crate) solver: SolverChoice,
    pub(crate) format: OutputFormat,
    /// Present when missing coordinates should be geocoded first.
    pub(crate) geocoder: Option<GeocoderSettings>,
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_SOLVE_INPUT,
        })?;
        let start = args.start.ok_or(CliError::MissingArgument {
            field: ARG_START,
            env: ENV_SOLVE_START,
        })?;
        let solver = match args.solver.unwrap_or_default() {
            SolverKind::Insertion => {
                let mut config = InsertionSolverConfig::default();
                if let Some(passes) = args.max_two_opt_passes {
                    config.max_two_opt_passes = passes;
                }
                SolverChoice::Insertion(config)
            }
            SolverKind::Vrp => SolverChoice::Vrp {
                max_generations: args.max_generations,
                max_time_secs: args.max_time_secs,
            },
        };
        let geocoder = args.geocode.then(|| {
            GeocoderSettings::from(GeocoderOverrides {
                base_url: args.nominatim_url,
                user_agent: args.user_agent,
                ..GeocoderOverrides::default()
            })
        });
        Ok(Self {
            input,
            start,
            solver,
            format: args.format.unwrap_or_default(),
            geocoder,
        })
    }
}

/// Builds a tour solver for the current solve invocation.
pub(super) trait SolveSolverBuilder {
    fn build(&self, choice: &SolverChoice) -> Result<Box<dyn TourSolver>, CliError>;
}

pub(super) struct DefaultSolveSolverBuilder;

impl SolveSolverBuilder for DefaultSolveSolverBuilder {
    fn build(&self, choice: &SolverChoice) -> Result<Box<dyn TourSolver>, CliError> {
        match *choice {
            SolverChoice::Insertion(config) => Ok(Box::new(InsertionSolver::with_config(config))),
            SolverChoice::Vrp {
                max_generations,
                max_time_secs,
            } => build_vrp(max_generations, max_time_secs),
        }
    }
}

#[cfg(feature = "solver-vrp")]
fn build_vrp(
    max_generations: Option<usize>,
    max_time_secs: Option<usize>,
) -> Result<Box<dyn TourSolver>, CliError> {
    use roundtrip_solver_vrp::{VrpTourSolver, VrpTourSolverConfig};

    let defaults = VrpTourSolverConfig::default();
    Ok(Box::new(VrpTourSolver::with_config(VrpTourSolverConfig {
        max_generations: max_generations.unwrap_or(defaults.max_generations),
        max_time_secs: max_time_secs.or(defaults.max_time_secs),
    })))
}

#[cfg(not(feature = "solver-vrp"))]
fn build_vrp(
    _max_generations: Option<usize>,
    _max_time_secs: Option<usize>,
) -> Result<Box<dyn TourSolver>, CliError> {
    Err(CliError::MissingFeature {
        feature: "solver-vrp",
        action: "--solver vrp",
    })
}

/// Collaborators for one solve run.
pub(super) struct SolveDeps<'a> {
    pub(super) solvers: &'a dyn SolveSolverBuilder,
    pub(super) geocoders: &'a dyn GeoCoderBuilder,
}

pub(super) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let deps = SolveDeps {
        solvers: &DefaultSolveSolverBuilder,
        geocoders: &NominatimGeoCoderBuilder,
    };
    run_solve_with(args, &deps, &mut stdout)
}

pub(super) fn run_solve_with(
    args: SolveArgs,
    deps: &SolveDeps<'_>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.input, ARG_INPUT)?;
    match execute_solve(&config, deps) {
        Ok(plan) => write_plan(writer, &plan, config.format),
        Err(CliError::Plan(err @ (PlanError::Solve(_) | PlanError::InvalidRoute(_)))) => {
            writeln!(writer, "{NO_SOLUTION}").map_err(CliError::WriteOutput)?;
            Err(CliError::Plan(err))
        }
        Err(err) => Err(err),
    }
}

fn execute_solve(config: &SolveConfig, deps: &SolveDeps<'_>) -> Result<TourPlan, CliError> {
    let locations = prepare_locations(config, deps.geocoders)?;
    let solver = deps.solvers.build(&config.solver)?;
    let plan = plan_tour(
        &locations,
        &config.start,
        solver.as_ref(),
        &DistanceMatrixBuilder::new(),
    )?;
    Ok(plan)
}

/// Load the input and, when asked, fill in missing coordinates.
///
/// Newly resolved coordinates are saved to the `_with_coords` cache file
/// next to the input. Locations that still lack coordinates are dropped,
/// except the start: failing to resolve it is an error.
fn prepare_locations(
    config: &SolveConfig,
    geocoders: &dyn GeoCoderBuilder,
) -> Result<Vec<Location>, CliError> {
    let locations = load_locations(&config.input)?;
    let Some(settings) = &config.geocoder else {
        return Ok(locations);
    };
    if locations.iter().all(Location::is_geocoded) {
        return Ok(locations);
    }
    let coder = geocoders.build(settings)?;
    let report = enrich_locations(&coder, locations, UnresolvedPolicy::Skip)?;
    if report.resolved > 0 {
        save_locations(&cache_path(&config.input), &report.locations)?;
    }
    if let Some(failure) = report
        .failures
        .iter()
        .find(|failure| failure.name == config.start)
    {
        return Err(CliError::Geocode(EnrichError::Unresolved {
            name: failure.name.clone(),
            source: failure.error.clone(),
        }));
    }
    Ok(report.into_geocoded())
}

fn write_plan(writer: &mut dyn Write, plan: &TourPlan, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => write_text(writer, plan).map_err(CliError::WriteOutput),
        OutputFormat::Json => {
            let payload =
                serde_json::to_string_pretty(plan).map_err(CliError::SerialiseTourPlan)?;
            writer
                .write_all(payload.as_bytes())
                .map_err(CliError::WriteOutput)?;
            writer.write_all(b"\n").map_err(CliError::WriteOutput)
        }
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
