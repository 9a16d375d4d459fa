//! Error types emitted by the CVRP CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use cvrp_core::{InstanceError, SolveError};
use cvrp_data::routing::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the CVRP CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// An option was present but unusable.
    #[error("invalid --{field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },
    /// The routing service URL could not be parsed.
    #[error("invalid routing service URL {url:?}: {source}")]
    InvalidOsrmBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// Opening the instance file failed.
    #[error("failed to open instance at {path:?}: {source}")]
    OpenInstance {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Instance JSON could not be decoded.
    #[error("failed to parse instance JSON at {path:?}: {source}")]
    ParseInstance {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The instance payload failed validation.
    #[error("instance in {path:?} failed validation: {source}")]
    InvalidInstance {
        path: Utf8PathBuf,
        #[source]
        source: InstanceError,
    },
    /// Constructing the road distance provider failed.
    #[error("failed to build distance provider for {base_url:?}: {source}")]
    BuildDistanceProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The solver rejected the instance.
    #[error("solver failed: {source}")]
    Solve { source: SolveError },
    /// Serializing the plan failed.
    #[error("failed to serialize plan: {0}")]
    SerializePlan(#[source] serde_json::Error),
    /// Writing the solve output failed.
    #[error("failed to write solve output: {0}")]
    WriteSolveOutput(#[source] std::io::Error),
}
