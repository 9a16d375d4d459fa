//! `MilpSolver` implementation backed by a [`MilpEngine`].

use std::time::Instant;

use cvrp_core::{
    CostMatrixBuilder, Diagnostics, DistanceProvider, Instance, MilpEngine, Node, Plan, Route,
    SolveError, Solver,
};
use log::info;

use crate::engine::MicrolpEngine;
use crate::formulation::SubtourMode;
use crate::reconstruct::RouteReconstructor;
use crate::search::VehicleCountSearch;

/// Configuration for [`MilpSolver`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MilpSolverConfig {
    /// How subtour elimination constraints enter each trial's model.
    pub subtour_mode: SubtourMode,
}

impl MilpSolverConfig {
    /// Set the subtour mode.
    #[must_use]
    pub const fn with_subtour_mode(mut self, subtour_mode: SubtourMode) -> Self {
        self.subtour_mode = subtour_mode;
        self
    }
}

/// Exact solver returning the minimum fleet and its least-cost routes.
///
/// The solver is generic over the engine boundaries: a distance provider
/// that prices every ordered node pair, and an engine that solves the binary
/// program for each trial vehicle count.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use cvrp_core::{City, HaversineDistance, Instance, Solver};
/// use cvrp_solver_milp::MilpSolver;
///
/// let depot = Coord { x: 2.4753, y: 48.9566 };
/// let cities = [City::new(48.96, 2.48, 1.0), City::new(48.95, 2.46, 1.0)];
/// let instance = Instance::new(depot, &cities, 2.0, 2)?;
///
/// let plan = MilpSolver::new(HaversineDistance).solve(&instance)?;
/// assert_eq!(plan.vehicle_count, 1);
/// assert_eq!(plan.coordinates[0].first(), Some(&[2.4753, 48.9566]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct MilpSolver<P, E = MicrolpEngine> {
    provider: P,
    engine: E,
    config: MilpSolverConfig,
}

impl<P: DistanceProvider> MilpSolver<P> {
    /// Construct a solver using the `microlp` engine and default
    /// configuration.
    pub fn new(provider: P) -> Self {
        Self::with_engine(provider, MicrolpEngine, MilpSolverConfig::default())
    }
}

impl<P, E> MilpSolver<P, E>
where
    P: DistanceProvider,
    E: MilpEngine,
{
    /// Construct a solver with an explicit engine and configuration.
    pub const fn with_engine(provider: P, engine: E, config: MilpSolverConfig) -> Self {
        Self {
            provider,
            engine,
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MilpSolverConfig {
        &self.config
    }
}

impl<P, E> Solver for MilpSolver<P, E>
where
    P: DistanceProvider + Send + Sync,
    E: MilpEngine,
{
    fn solve(&self, instance: &Instance) -> Result<Plan, SolveError> {
        let started_at = Instant::now();
        let matrix = CostMatrixBuilder::new(&self.provider).build(instance.nodes())?;
        let demands = instance.demands();
        let found = VehicleCountSearch::new(
            &self.engine,
            &matrix,
            &demands,
            instance.capacity(),
            instance.max_vehicles(),
            self.config.subtour_mode,
        )
        .run()?;
        let routes = RouteReconstructor::new(found.formulation.arcs()).reconstruct(&found.assignment)?;

        let plan = Plan {
            vehicle_count: found.vehicles(),
            total_distance_km: meters_to_km(found.assignment.objective()),
            coordinates: routes
                .iter()
                .map(|route| route_coordinates(route, instance.nodes()))
                .collect(),
            routes,
            diagnostics: Diagnostics {
                solve_time: started_at.elapsed(),
                trials: found.trials,
                cuts_added: found.cuts_added,
            },
        };
        info!(
            "served {} customer(s) with {} vehicle(s) over {:.3} km in {:?}",
            instance.customer_count(),
            plan.vehicle_count,
            plan.total_distance_km,
            plan.diagnostics.solve_time
        );
        Ok(plan)
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "distances are reported in kilometres"
)]
fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}

/// `[longitude, latitude]` for every stop of `route`.
fn route_coordinates(route: &Route, nodes: &[Node]) -> Vec<[f64; 2]> {
    route
        .stops()
        .iter()
        .filter_map(|&stop| nodes.get(stop))
        .map(|node| [node.longitude(), node.latitude()])
        .collect()
}

#[cfg(test)]
mod tests;
