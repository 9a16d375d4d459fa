//! Solve command implementation for the CVRP CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::{Parser, ValueEnum};
use cvrp_core::{
    DistanceProvider, HaversineDistance, Instance, InstanceSpec, MilpEngine, Plan, Solver,
};
use cvrp_data::routing::{DEFAULT_PROFILE, HttpDistanceProvider, HttpDistanceProviderConfig};
use cvrp_solver_milp::{MicrolpEngine, MilpSolver, MilpSolverConfig, SubtourMode, TimeBoxedEngine};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    ARG_SOLVE_DISTANCE_MODE, ARG_SOLVE_INSTANCE, ARG_SOLVE_MAX_CONCURRENT_REQUESTS,
    ARG_SOLVE_OSRM_BASE_URL, ARG_SOLVE_OSRM_PROFILE, ARG_SOLVE_SUBTOUR_MODE,
    ARG_SOLVE_TRIAL_TIMEOUT_SECS, CliError, ENV_SOLVE_INSTANCE,
};

/// Where pairwise travel costs come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum DistanceMode {
    /// Haversine distance on a spherical Earth.
    #[default]
    GreatCircle,
    /// Driving distance from an OSRM-compatible routing service.
    RoadNetwork,
}

/// Command-line spelling of [`SubtourMode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum SubtourStrategy {
    /// Add cuts only for subtours found in candidate solutions.
    #[default]
    Lazy,
    /// Enumerate every customer subset up front.
    Exhaustive,
}

impl From<SubtourStrategy> for SubtourMode {
    fn from(strategy: SubtourStrategy) -> Self {
        match strategy {
            SubtourStrategy::Lazy => Self::Lazy,
            SubtourStrategy::Exhaustive => Self::Exhaustive,
        }
    }
}

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Solve a capacitated vehicle routing instance exactly. The \
                 instance is a JSON file listing the depot, vehicle capacity, \
                 vehicle bound and customer cities. The minimum fleet and its \
                 shortest routes are printed as JSON.",
    about = "Solve a CVRP instance"
)]
#[ortho_config(prefix = "CVRP")]
pub(crate) struct SolveArgs {
    /// Path to a JSON instance file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) instance_path: Option<Utf8PathBuf>,
    /// How travel costs between nodes are measured.
    #[arg(long = ARG_SOLVE_DISTANCE_MODE, value_enum, value_name = "mode")]
    #[serde(default)]
    pub(crate) distance_mode: Option<DistanceMode>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_SOLVE_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM profile used for road distances.
    #[arg(long = ARG_SOLVE_OSRM_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) osrm_profile: Option<String>,
    /// Routing requests kept in flight at once.
    #[arg(long = ARG_SOLVE_MAX_CONCURRENT_REQUESTS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_concurrent_requests: Option<usize>,
    /// How subtour elimination constraints are generated.
    #[arg(long = ARG_SOLVE_SUBTOUR_MODE, value_enum, value_name = "mode")]
    #[serde(default)]
    pub(crate) subtour_mode: Option<SubtourStrategy>,
    /// Wall-clock budget for each vehicle-count trial, in seconds.
    #[arg(long = ARG_SOLVE_TRIAL_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) trial_timeout_secs: Option<u64>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Routing service settings for [`DistanceSource::RoadNetwork`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoadNetworkSettings {
    pub(crate) base_url: String,
    pub(crate) profile: String,
    pub(crate) max_concurrent_requests: usize,
}

/// Resolved distance source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DistanceSource {
    GreatCircle,
    RoadNetwork(RoadNetworkSettings),
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    /// Path to the JSON instance file.
    pub(crate) instance_path: Utf8PathBuf,
    pub(crate) distance: DistanceSource,
    pub(crate) subtour_mode: SubtourMode,
    /// Per-trial budget; `None` lets every trial run to completion.
    pub(crate) trial_timeout: Option<Duration>,
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let instance_path = args.instance_path.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_INSTANCE,
            env: ENV_SOLVE_INSTANCE,
        })?;

        let distance = match args.distance_mode.unwrap_or_default() {
            DistanceMode::GreatCircle => DistanceSource::GreatCircle,
            DistanceMode::RoadNetwork => DistanceSource::RoadNetwork(road_network_settings(
                args.osrm_base_url,
                args.osrm_profile,
                args.max_concurrent_requests,
            )?),
        };

        let trial_timeout = match args.trial_timeout_secs {
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_SOLVE_TRIAL_TIMEOUT_SECS,
                    reason: "the budget must be at least one second",
                });
            }
            secs => secs.map(Duration::from_secs),
        };

        Ok(Self {
            instance_path,
            distance,
            subtour_mode: args.subtour_mode.unwrap_or_default().into(),
            trial_timeout,
        })
    }
}

fn road_network_settings(
    base_url: Option<String>,
    profile: Option<String>,
    max_concurrent_requests: Option<usize>,
) -> Result<RoadNetworkSettings, CliError> {
    let defaults = HttpDistanceProviderConfig::default();
    let base_url = base_url.unwrap_or(defaults.base_url);
    if let Err(source) = url::Url::parse(&base_url) {
        return Err(CliError::InvalidOsrmBaseUrl {
            url: base_url,
            source,
        });
    }
    let max_concurrent_requests =
        max_concurrent_requests.unwrap_or(defaults.max_concurrent_requests.get());
    if max_concurrent_requests == 0 {
        return Err(CliError::InvalidArgument {
            field: ARG_SOLVE_MAX_CONCURRENT_REQUESTS,
            reason: "at least one request must be allowed in flight",
        });
    }
    Ok(RoadNetworkSettings {
        base_url,
        profile: profile.unwrap_or_else(|| DEFAULT_PROFILE.to_owned()),
        max_concurrent_requests,
    })
}

/// Builds a solver instance for the current solve invocation.
pub(super) trait SolveSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Solver>, CliError>;
}

pub(super) struct DefaultSolveSolverBuilder;

impl DefaultSolveSolverBuilder {
    fn provider(
        source: &DistanceSource,
    ) -> Result<Box<dyn DistanceProvider + Send + Sync>, CliError> {
        match source {
            DistanceSource::GreatCircle => Ok(Box::new(HaversineDistance)),
            DistanceSource::RoadNetwork(settings) => {
                let config = HttpDistanceProviderConfig::new(settings.base_url.clone())
                    .with_profile(settings.profile.clone())
                    .with_max_concurrent_requests(settings.max_concurrent_requests);
                let provider = HttpDistanceProvider::with_config(config).map_err(|source| {
                    CliError::BuildDistanceProvider {
                        base_url: settings.base_url.clone(),
                        source,
                    }
                })?;
                Ok(Box::new(provider))
            }
        }
    }
}

impl SolveSolverBuilder for DefaultSolveSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Solver>, CliError> {
        let provider = Self::provider(&config.distance)?;
        let engine: Box<dyn MilpEngine> = match config.trial_timeout {
            Some(budget) => Box::new(TimeBoxedEngine::new(MicrolpEngine, budget)),
            None => Box::new(MicrolpEngine),
        };
        let solver_config = MilpSolverConfig::default().with_subtour_mode(config.subtour_mode);
        Ok(Box::new(MilpSolver::with_engine(
            provider,
            engine,
            solver_config,
        )))
    }
}

pub(super) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultSolveSolverBuilder;
    run_solve_with(args, &builder, &mut stdout)
}

pub(super) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolveSolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let plan = execute_solve(args, builder)?;
    write_plan(writer, &plan)
}

fn execute_solve(args: SolveArgs, builder: &dyn SolveSolverBuilder) -> Result<Plan, CliError> {
    let config = args.into_config()?;
    debug!(?config, "resolved solve configuration");
    let instance = load_instance(&config.instance_path)?;
    let solver = builder.build(&config)?;
    let plan = solver
        .solve(&instance)
        .map_err(|source| CliError::Solve { source })?;
    info!(
        vehicles = plan.vehicle_count,
        total_distance_km = plan.total_distance_km,
        solve_time = ?plan.diagnostics.solve_time,
        "solved {}",
        config.instance_path
    );
    Ok(plan)
}

/// Loads and validates a JSON-encoded [`InstanceSpec`] from disk.
pub(super) fn load_instance(path: &Utf8Path) -> Result<Instance, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenInstance {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let reader = BufReader::new(file);
    let spec: InstanceSpec =
        serde_json::from_reader(reader).map_err(|source| CliError::ParseInstance {
            path: path.to_path_buf(),
            source,
        })?;
    Instance::try_from(spec).map_err(|source| CliError::InvalidInstance {
        path: path.to_path_buf(),
        source,
    })
}

fn write_plan(writer: &mut dyn Write, plan: &Plan) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(plan).map_err(CliError::SerializePlan)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteSolveOutput)?;
    writer
        .write_all(b"\n")
        .map_err(CliError::WriteSolveOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
