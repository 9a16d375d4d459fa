//! Facade crate for the exact CVRP solver.
//!
//! This crate re-exports the core domain types and exposes the MILP solver
//! and the road-network distance provider behind feature flags.

#![forbid(unsafe_code)]

pub use cvrp_core::{
    City, CostMatrix, CostMatrixBuilder, Diagnostics, DistanceError, DistanceProvider,
    EngineError, EngineOutcome, HaversineDistance, Instance, InstanceError, MilpEngine, Node,
    Plan, Route, SolveError, Solver,
};

#[cfg(feature = "serde")]
pub use cvrp_core::{InstanceSpec, LatLon};

#[cfg(feature = "solver-milp")]
pub use cvrp_solver_milp::{MicrolpEngine, MilpSolver, MilpSolverConfig, SubtourMode, TimeBoxedEngine};

#[cfg(feature = "road-network")]
pub use cvrp_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig, ProviderBuildError};
